//! Brokered messages and their service-assigned metadata.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Service-assigned message metadata, carried as a single JSON object in the
/// `BrokerProperties` header.
///
/// The lock location is the exception: the service reports it in the
/// `Location` response header of a peek-lock receive, so it lives on the
/// struct but never appears in the header JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokerProperties {
    #[serde(rename = "CorrelationId", skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(rename = "SessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(rename = "DeliveryCount", skip_serializing_if = "Option::is_none")]
    pub delivery_count: Option<u32>,
    #[serde(rename = "LockedUntilUtc", skip_serializing_if = "Option::is_none")]
    pub locked_until_utc: Option<String>,
    #[serde(rename = "LockToken", skip_serializing_if = "Option::is_none")]
    pub lock_token: Option<String>,
    #[serde(rename = "MessageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(rename = "Label", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "ReplyTo", skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(rename = "ReplyToSessionId", skip_serializing_if = "Option::is_none")]
    pub reply_to_session_id: Option<String>,
    #[serde(rename = "SequenceNumber", skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<i64>,
    #[serde(rename = "TimeToLive", skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<f64>,
    #[serde(rename = "To", skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(rename = "ScheduledEnqueueTimeUtc", skip_serializing_if = "Option::is_none")]
    pub scheduled_enqueue_time_utc: Option<String>,
    #[serde(skip)]
    lock_location: Option<String>,
}

impl BrokerProperties {
    /// Render the properties as the `BrokerProperties` header value.
    pub fn to_header_value(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(|e| CodecError::BrokerProperties(e.to_string()))
    }

    /// Parse a `BrokerProperties` header value.
    pub fn from_header_value(raw: &str) -> Result<Self, CodecError> {
        serde_json::from_str(raw).map_err(|e| CodecError::BrokerProperties(e.to_string()))
    }

    /// The lock URL of a peek-locked message, if any.
    pub fn lock_location(&self) -> Option<&str> {
        self.lock_location.as_deref()
    }

    /// Record the lock URL reported by the service.
    pub fn set_lock_location<S: Into<String>>(&mut self, location: S) {
        self.lock_location = Some(location.into());
    }
}

/// An ordered mapping from header name to string value.
///
/// Receive copies every response header in here verbatim; lookups are
/// case-insensitive because HTTP header names are.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing an existing entry with the same name.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether a value exists for the name.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A unit of payload exchanged with the service.
///
/// Built by the caller for send (body plus optional content type and broker
/// properties); reconstructed by the client from response headers and body
/// for receive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrokeredMessage {
    body: Bytes,
    content_type: Option<String>,
    date: Option<String>,
    broker_properties: Option<BrokerProperties>,
    properties: Properties,
}

impl BrokeredMessage {
    /// Create a message with the given payload.
    pub fn new<B: Into<Bytes>>(body: B) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    /// Set the payload content type.
    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the broker properties.
    pub fn with_broker_properties(mut self, properties: BrokerProperties) -> Self {
        self.broker_properties = Some(properties);
        self
    }

    /// The payload bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Extract the payload bytes.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// The payload content type, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn set_content_type<S: Into<String>>(&mut self, content_type: S) {
        self.content_type = Some(content_type.into());
    }

    /// The response `Date` header, if any.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn set_date<S: Into<String>>(&mut self, date: S) {
        self.date = Some(date.into());
    }

    /// The service-assigned metadata, if any.
    pub fn broker_properties(&self) -> Option<&BrokerProperties> {
        self.broker_properties.as_ref()
    }

    pub fn set_broker_properties(&mut self, properties: BrokerProperties) {
        self.broker_properties = Some(properties);
    }

    /// The lock URL of a peek-locked message, if any.
    pub fn lock_location(&self) -> Option<&str> {
        self.broker_properties
            .as_ref()
            .and_then(|properties| properties.lock_location())
    }

    /// Headers copied verbatim from the receive response.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Mutable access to the property map.
    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}
