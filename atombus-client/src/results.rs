//! Per-operation result wrappers.
//!
//! Each wrapper holds exactly one decoded info object (or a sequence, for
//! list operations), is constructed only by parsing a raw response body, and
//! is immutable afterwards.

use bytes::Bytes;

use atombus_core::{
    AtomEntry, AtomFeed, BrokeredMessage, QueueInfo, RuleInfo, SubscriptionInfo, TopicInfo,
};

use crate::error::ClientError;

fn body_str(body: &[u8]) -> Result<&str, ClientError> {
    std::str::from_utf8(body).map_err(|e| ClientError::decode(format!("response body is not UTF-8: {e}")))
}

macro_rules! entity_result {
    ($(#[$doc:meta])* $name:ident, $info:ty, $getter:ident, $into:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            info: $info,
        }

        impl $name {
            /// Parse a response body into the result.
            pub fn parse(body: &[u8]) -> Result<Self, ClientError> {
                let entry = AtomEntry::parse(body_str(body)?)?;
                let info = <$info>::from_entry(&entry)?;
                Ok(Self { info })
            }

            /// The decoded info.
            pub fn $getter(&self) -> &$info {
                &self.info
            }

            /// Extract the decoded info.
            pub fn $into(self) -> $info {
                self.info
            }
        }
    };
}

macro_rules! list_result {
    ($(#[$doc:meta])* $name:ident, $info:ty, $getter:ident, $into:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            infos: Vec<$info>,
        }

        impl $name {
            /// Parse a feed response body into the result.
            pub fn parse(body: &[u8]) -> Result<Self, ClientError> {
                let feed = AtomFeed::parse(body_str(body)?)?;
                let infos = feed
                    .entries
                    .iter()
                    .map(<$info>::from_entry)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self { infos })
            }

            /// The decoded infos, in feed order.
            pub fn $getter(&self) -> &[$info] {
                &self.infos
            }

            /// Extract the decoded infos.
            pub fn $into(self) -> Vec<$info> {
                self.infos
            }
        }
    };
}

entity_result!(
    /// Result of creating a queue.
    CreateQueueResult,
    QueueInfo,
    queue_info,
    into_queue_info
);
entity_result!(
    /// Result of fetching a queue.
    GetQueueResult,
    QueueInfo,
    queue_info,
    into_queue_info
);
list_result!(
    /// Result of listing queues.
    ListQueuesResult,
    QueueInfo,
    queue_infos,
    into_queue_infos
);

entity_result!(
    /// Result of creating a topic.
    CreateTopicResult,
    TopicInfo,
    topic_info,
    into_topic_info
);
entity_result!(
    /// Result of fetching a topic.
    GetTopicResult,
    TopicInfo,
    topic_info,
    into_topic_info
);
list_result!(
    /// Result of listing topics.
    ListTopicsResult,
    TopicInfo,
    topic_infos,
    into_topic_infos
);

entity_result!(
    /// Result of creating a subscription.
    CreateSubscriptionResult,
    SubscriptionInfo,
    subscription_info,
    into_subscription_info
);
entity_result!(
    /// Result of fetching a subscription.
    GetSubscriptionResult,
    SubscriptionInfo,
    subscription_info,
    into_subscription_info
);
list_result!(
    /// Result of listing a topic's subscriptions.
    ListSubscriptionsResult,
    SubscriptionInfo,
    subscription_infos,
    into_subscription_infos
);

entity_result!(
    /// Result of creating a rule.
    CreateRuleResult,
    RuleInfo,
    rule_info,
    into_rule_info
);
entity_result!(
    /// Result of fetching a rule.
    GetRuleResult,
    RuleInfo,
    rule_info,
    into_rule_info
);
list_result!(
    /// Result of listing a subscription's rules.
    ListRulesResult,
    RuleInfo,
    rule_infos,
    into_rule_infos
);

/// Result of receiving a subscription message.
///
/// Unlike the plain receive path, this result is built from the response body
/// alone; no header-based reconstruction happens here.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceiveSubscriptionMessageResult {
    message: BrokeredMessage,
}

impl ReceiveSubscriptionMessageResult {
    /// Wrap a response body as the received message.
    pub fn parse(body: &[u8]) -> Result<Self, ClientError> {
        Ok(Self {
            message: BrokeredMessage::new(Bytes::copy_from_slice(body)),
        })
    }

    /// The received message.
    pub fn message(&self) -> &BrokeredMessage {
        &self.message
    }

    /// Extract the received message.
    pub fn into_message(self) -> BrokeredMessage {
        self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_body(title: &str, descriptor: &str) -> String {
        format!(
            "<entry xmlns=\"http://www.w3.org/2005/Atom\">\
             <title type=\"text\">{title}</title>\
             <content type=\"application/xml\">{descriptor}</content></entry>"
        )
    }

    #[test]
    fn test_create_queue_result_parse() {
        let body = entry_body(
            "orders",
            "<QueueDescription><LockDuration>PT1M</LockDuration><MaxDeliveryCount>10</MaxDeliveryCount></QueueDescription>",
        );
        let result = CreateQueueResult::parse(body.as_bytes()).unwrap();
        assert_eq!(result.queue_info().name(), "orders");
        assert_eq!(result.queue_info().description().max_delivery_count, Some(10));
    }

    #[test]
    fn test_get_topic_result_parse() {
        let body = entry_body(
            "events",
            "<TopicDescription><EnableBatchedOperations>true</EnableBatchedOperations></TopicDescription>",
        );
        let result = GetTopicResult::parse(body.as_bytes()).unwrap();
        assert_eq!(result.topic_info().name(), "events");
        assert_eq!(result.topic_info().description().enable_batched_operations, Some(true));
    }

    #[test]
    fn test_list_queues_result_parse() {
        let body = format!(
            "<feed xmlns=\"http://www.w3.org/2005/Atom\">{}{}</feed>",
            entry_body("first", "<QueueDescription/>"),
            entry_body("second", "<QueueDescription/>")
        );
        let result = ListQueuesResult::parse(body.as_bytes()).unwrap();
        let names: Vec<&str> = result.queue_infos().iter().map(QueueInfo::name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_list_result_empty_feed() {
        let body = "<feed xmlns=\"http://www.w3.org/2005/Atom\"></feed>";
        let result = ListRulesResult::parse(body.as_bytes()).unwrap();
        assert!(result.rule_infos().is_empty());
    }

    #[test]
    fn test_entity_result_rejects_feed_without_entry() {
        let body = "<feed xmlns=\"http://www.w3.org/2005/Atom\"></feed>";
        let err = GetQueueResult::parse(body.as_bytes()).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_entity_result_rejects_garbage() {
        let err = GetSubscriptionResult::parse(b"not xml at all <").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_receive_subscription_message_result_wraps_body() {
        let result = ReceiveSubscriptionMessageResult::parse(b"payload bytes").unwrap();
        assert_eq!(result.message().body().as_ref(), b"payload bytes");
        assert!(result.message().broker_properties().is_none());
    }
}
