//! Service-defined path templates.
//!
//! Entity names substitute into fixed templates; nothing here is invented by
//! the client, and nothing is percent-encoded — entity names are passed
//! through as the service defines them.

/// Path of the queue listing.
pub(crate) const LIST_QUEUES_PATH: &str = "$Resources/Queues";

/// Path of the topic listing.
pub(crate) const LIST_TOPICS_PATH: &str = "$Resources/Topics";

/// Head of a queue's message sequence.
pub(crate) fn queue_message_path(queue: &str) -> String {
    format!("{queue}/messages/head")
}

/// A subscription under a topic.
pub(crate) fn subscription_path(topic: &str, subscription: &str) -> String {
    format!("{topic}/subscriptions/{subscription}")
}

/// A topic's subscription listing.
pub(crate) fn subscriptions_path(topic: &str) -> String {
    format!("{topic}/subscriptions")
}

/// Head of a subscription's message sequence.
pub(crate) fn subscription_message_path(topic: &str, subscription: &str) -> String {
    format!("{topic}/subscriptions/{subscription}/messages/head")
}

/// A rule under a subscription.
pub(crate) fn rule_path(topic: &str, subscription: &str, rule: &str) -> String {
    format!("{topic}/subscriptions/{subscription}/rules/{rule}")
}

/// A subscription's rule listing.
pub(crate) fn rules_path(topic: &str, subscription: &str) -> String {
    format!("{topic}/subscriptions/{subscription}/rules")
}
