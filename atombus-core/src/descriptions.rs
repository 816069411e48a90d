//! Entity descriptors for queues, topics, subscriptions and rules.
//!
//! A descriptor is the bag of service-defined settings an entity is created
//! with and reported back as. All settings are optional: unset fields are
//! omitted from the create payload and the service fills in its defaults.
//! Duration-typed settings stay ISO-8601 strings (`"PT1M"`) end to end; the
//! client passes them through without interpreting them.
//!
//! An *info* pairs an entity name with its descriptor; it is what an Atom
//! entry decodes into (entry title = name, entry content = descriptor XML).

use serde::{Deserialize, Serialize};

use crate::atom::AtomEntry;
use crate::codec::from_xml;
use crate::error::CodecError;

/// The service's descriptor schema namespace.
pub const SERVICE_NAMESPACE: &str =
    "http://schemas.microsoft.com/netservices/2010/10/servicebus/connect";

/// The XML Schema instance namespace, used for type-discriminated elements.
pub const SCHEMA_INSTANCE_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Namespace attributes required on descriptor roots in create payloads.
pub const DESCRIPTION_ATTRIBUTES: [(&str, &str); 2] = [
    ("xmlns:i", SCHEMA_INSTANCE_NAMESPACE),
    ("xmlns", SERVICE_NAMESPACE),
];

/// Settings of a queue.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size_in_megabytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_duplicate_detection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_session: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_message_time_to_live: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_lettering_on_message_expiration: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_detection_history_time_window: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_delivery_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_batched_operations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_in_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_count: Option<i64>,
}

/// Settings of a topic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_message_time_to_live: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size_in_megabytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_duplicate_detection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_detection_history_time_window: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_batched_operations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_in_bytes: Option<i64>,
}

/// Settings of a subscription.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_session: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_message_time_to_live: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_lettering_on_message_expiration: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_lettering_on_filter_evaluation_exceptions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_delivery_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_batched_operations: Option<bool>,
}

/// Settings of a subscription rule.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<RuleFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A rule filter, discriminated by the `i:type` attribute on the wire.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleFilter {
    #[serde(rename = "@i:type", skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl RuleFilter {
    /// A SQL filter over message properties.
    pub fn sql<S: Into<String>>(expression: S) -> Self {
        Self {
            filter_type: Some("SqlFilter".into()),
            sql_expression: Some(expression.into()),
            correlation_id: None,
        }
    }

    /// A correlation-id match filter.
    pub fn correlation<S: Into<String>>(correlation_id: S) -> Self {
        Self {
            filter_type: Some("CorrelationFilter".into()),
            sql_expression: None,
            correlation_id: Some(correlation_id.into()),
        }
    }

    /// The match-everything filter.
    pub fn match_all() -> Self {
        Self {
            filter_type: Some("TrueFilter".into()),
            sql_expression: Some("1=1".into()),
            correlation_id: None,
        }
    }
}

/// A rule action, discriminated by the `i:type` attribute on the wire.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleAction {
    #[serde(rename = "@i:type", skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_expression: Option<String>,
}

impl RuleAction {
    /// A SQL action applied to matched messages.
    pub fn sql<S: Into<String>>(expression: S) -> Self {
        Self {
            action_type: Some("SqlRuleAction".into()),
            sql_expression: Some(expression.into()),
        }
    }
}

macro_rules! entity_info {
    ($(#[$doc:meta])* $name:ident, $description:ty) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            name: String,
            description: $description,
        }

        impl $name {
            /// Create an info with the given entity name and default settings.
            pub fn new<S: Into<String>>(name: S) -> Self {
                Self {
                    name: name.into(),
                    description: Default::default(),
                }
            }

            /// Replace the descriptor.
            pub fn with_description(mut self, description: $description) -> Self {
                self.description = description;
                self
            }

            /// The entity name.
            pub fn name(&self) -> &str {
                &self.name
            }

            /// The entity settings.
            pub fn description(&self) -> &$description {
                &self.description
            }

            /// Mutable access to the entity settings.
            pub fn description_mut(&mut self) -> &mut $description {
                &mut self.description
            }

            /// Decode an info from an Atom entry: the entry title is the
            /// entity name, the content body is the descriptor XML.
            pub fn from_entry(entry: &AtomEntry) -> Result<Self, CodecError> {
                let content = entry.content.as_ref().ok_or(CodecError::MissingContent)?;
                let description = from_xml(&content.body)?;
                Ok(Self {
                    name: entry.title.clone().unwrap_or_default(),
                    description,
                })
            }
        }
    };
}

entity_info!(
    /// A queue name plus its settings.
    QueueInfo,
    QueueDescription
);
entity_info!(
    /// A topic name plus its settings.
    TopicInfo,
    TopicDescription
);
entity_info!(
    /// A subscription name plus its settings.
    SubscriptionInfo,
    SubscriptionDescription
);
entity_info!(
    /// A rule name plus its settings.
    RuleInfo,
    RuleDescription
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{to_xml, to_xml_with_attributes};

    #[test]
    fn test_queue_description_serializes_set_fields_only() {
        let description = QueueDescription {
            lock_duration: Some("PT1M".into()),
            max_delivery_count: Some(10),
            ..Default::default()
        };
        let xml = to_xml(&description, "QueueDescription").unwrap();
        assert_eq!(
            xml,
            "<QueueDescription><LockDuration>PT1M</LockDuration>\
             <MaxDeliveryCount>10</MaxDeliveryCount></QueueDescription>"
        );
    }

    #[test]
    fn test_queue_description_round_trip() {
        let description = QueueDescription {
            lock_duration: Some("PT30S".into()),
            max_size_in_megabytes: Some(1024),
            requires_duplicate_detection: Some(false),
            requires_session: Some(true),
            default_message_time_to_live: Some("P14D".into()),
            dead_lettering_on_message_expiration: Some(true),
            duplicate_detection_history_time_window: Some("PT10M".into()),
            max_delivery_count: Some(5),
            enable_batched_operations: Some(true),
            size_in_bytes: None,
            message_count: None,
        };
        let xml = to_xml_with_attributes(&description, "QueueDescription", &DESCRIPTION_ATTRIBUTES).unwrap();
        let parsed: QueueDescription = from_xml(&xml).unwrap();
        assert_eq!(parsed, description);
    }

    #[test]
    fn test_topic_description_round_trip() {
        let description = TopicDescription {
            default_message_time_to_live: Some("P7D".into()),
            max_size_in_megabytes: Some(2048),
            requires_duplicate_detection: Some(true),
            duplicate_detection_history_time_window: Some("PT5M".into()),
            enable_batched_operations: Some(false),
            size_in_bytes: None,
        };
        let xml = to_xml(&description, "TopicDescription").unwrap();
        let parsed: TopicDescription = from_xml(&xml).unwrap();
        assert_eq!(parsed, description);
    }

    #[test]
    fn test_rule_description_sql_filter_wire_shape() {
        let description = RuleDescription {
            filter: Some(RuleFilter::sql("Priority > 3")),
            action: Some(RuleAction::sql("SET Priority = 4")),
            name: Some("high-priority".into()),
        };
        let xml = to_xml(&description, "RuleDescription").unwrap();
        assert!(xml.contains("<Filter i:type=\"SqlFilter\">"));
        assert!(xml.contains("<SqlExpression>Priority &gt; 3</SqlExpression>"));
        assert!(xml.contains("<Action i:type=\"SqlRuleAction\">"));
        assert!(xml.contains("<Name>high-priority</Name>"));

        let parsed: RuleDescription = from_xml(&xml).unwrap();
        assert_eq!(parsed, description);
    }

    #[test]
    fn test_rule_filter_constructors() {
        assert_eq!(RuleFilter::sql("a = 1").filter_type.as_deref(), Some("SqlFilter"));
        assert_eq!(
            RuleFilter::correlation("order-7").correlation_id.as_deref(),
            Some("order-7")
        );
        assert_eq!(RuleFilter::match_all().filter_type.as_deref(), Some("TrueFilter"));
    }

    #[test]
    fn test_info_from_entry() {
        let entry = AtomEntry::new().with_content(
            "application/xml",
            "<QueueDescription><MessageCount>7</MessageCount></QueueDescription>",
        );
        let entry = AtomEntry {
            title: Some("orders".into()),
            ..entry
        };
        let info = QueueInfo::from_entry(&entry).unwrap();
        assert_eq!(info.name(), "orders");
        assert_eq!(info.description().message_count, Some(7));
    }

    #[test]
    fn test_info_from_entry_without_content_fails() {
        let entry = AtomEntry::new().with_title("orders");
        let err = QueueInfo::from_entry(&entry).unwrap_err();
        assert!(matches!(err, CodecError::MissingContent));
    }

    #[test]
    fn test_info_builder() {
        let info = SubscriptionInfo::new("audit").with_description(SubscriptionDescription {
            requires_session: Some(true),
            ..Default::default()
        });
        assert_eq!(info.name(), "audit");
        assert_eq!(info.description().requires_session, Some(true));
    }
}
