//! The messaging client.
//!
//! One async method per logical operation. Every method follows the same
//! shape: validate inputs, build exactly one HTTP request from the
//! service-defined path templates, send it through the injected transport,
//! check the expected status code, and decode the reply. No retries, no
//! pagination loops, no local timeouts.

use std::fmt::Write as _;
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Response, StatusCode, header};
use tracing::debug;

use atombus_core::{
    AtomEntry, BrokerProperties, BrokeredMessage, DESCRIPTION_ATTRIBUTES, ENTRY_CONTENT_TYPE,
    QueueInfo, RuleInfo, SubscriptionInfo, TopicInfo, to_xml_with_attributes,
};

use crate::error::ClientError;
use crate::options::{ListOptions, ReceiveMessageOptions, ReceiveMode};
use crate::paths;
use crate::results::{
    CreateQueueResult, CreateRuleResult, CreateSubscriptionResult, CreateTopicResult,
    GetQueueResult, GetRuleResult, GetSubscriptionResult, GetTopicResult, ListQueuesResult,
    ListRulesResult, ListSubscriptionsResult, ListTopicsResult, ReceiveSubscriptionMessageResult,
};
use crate::transport::Transport;

/// Header carrying service-assigned message metadata as a JSON object.
const BROKER_PROPERTIES_HEADER: &str = "BrokerProperties";

/// Client for the service's REST/Atom API.
///
/// Holds only immutable configuration (base URL plus a shared transport), so
/// it is cheap to clone and safe to use from concurrent tasks; each call is
/// an independent request/response exchange.
///
/// # Example
///
/// ```ignore
/// use atombus_client::{ClientBuilder, ReceiveMessageOptions};
/// use atombus_core::BrokeredMessage;
///
/// let client = ClientBuilder::new("https://example.servicebus.windows.net").build()?;
///
/// client.send_queue_message("orders", &BrokeredMessage::new("hello")).await?;
/// let message = client
///     .receive_queue_message("orders", &ReceiveMessageOptions::peek_lock())
///     .await?;
/// client.delete_message(&message).await?;
/// ```
#[derive(Clone)]
pub struct ServiceBusClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ServiceBusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBusClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ServiceBusClient {
    /// Create a client from a normalized base URL and a transport.
    ///
    /// This is called by [`ClientBuilder::build`](crate::ClientBuilder::build);
    /// prefer the builder API.
    pub(crate) fn new(base_url: String, transport: Arc<dyn Transport>) -> Self {
        Self { base_url, transport }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// Send a brokered message to `path` (a queue or topic path).
    ///
    /// The `Content-Type` and `BrokerProperties` headers are added only when
    /// the message carries the corresponding values.
    pub async fn send_message(&self, path: &str, message: &BrokeredMessage) -> Result<(), ClientError> {
        require_non_empty(path, "path")?;

        let mut builder = Request::builder().method(Method::POST).uri(self.api_url(path));
        if let Some(content_type) = message.content_type() {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(properties) = message.broker_properties() {
            let value = properties
                .to_header_value()
                .map_err(|e| ClientError::invalid_argument(e.to_string()))?;
            builder = builder.header(BROKER_PROPERTIES_HEADER, value);
        }
        let request = build(builder, message.body().clone())?;

        self.send(request, StatusCode::OK).await?;
        Ok(())
    }

    /// Send a brokered message to a queue.
    pub async fn send_queue_message(
        &self,
        queue_path: &str,
        message: &BrokeredMessage,
    ) -> Result<(), ClientError> {
        self.send_message(queue_path, message).await
    }

    /// Send a brokered message to a topic.
    pub async fn send_topic_message(
        &self,
        topic_path: &str,
        message: &BrokeredMessage,
    ) -> Result<(), ClientError> {
        self.send_message(topic_path, message).await
    }

    /// Receive a message from `path` (a message-head path).
    ///
    /// The verb follows the receive mode: DELETE for receive-and-delete,
    /// POST for peek-lock. An unset mode fails before any request is issued;
    /// the operation never picks a mode silently.
    pub async fn receive_message(
        &self,
        path: &str,
        options: &ReceiveMessageOptions,
    ) -> Result<BrokeredMessage, ClientError> {
        let method = match options.get_mode() {
            Some(ReceiveMode::ReceiveAndDelete) => Method::DELETE,
            Some(ReceiveMode::PeekLock) => Method::POST,
            None => {
                return Err(ClientError::invalid_argument(
                    "receive mode is not set; choose receive-and-delete or peek-lock",
                ));
            }
        };

        let mut url = self.api_url(path);
        if let Some(timeout) = options.get_timeout() {
            let _ = write!(url, "?timeout={}", timeout.as_secs());
        }

        let request = build(Request::builder().method(method).uri(url), Bytes::new())?;
        let response = self.send(request, StatusCode::OK).await?;
        message_from_response(response)
    }

    /// Receive a message from the head of a queue.
    pub async fn receive_queue_message(
        &self,
        queue_path: &str,
        options: &ReceiveMessageOptions,
    ) -> Result<BrokeredMessage, ClientError> {
        self.receive_message(&paths::queue_message_path(queue_path), options).await
    }

    /// Receive a message from the head of a subscription.
    ///
    /// Unlike [`receive_message`](Self::receive_message), the whole response
    /// body is decoded by the result wrapper; response headers are not
    /// consulted.
    pub async fn receive_subscription_message(
        &self,
        topic_name: &str,
        subscription_name: &str,
        _options: &ReceiveMessageOptions,
    ) -> Result<ReceiveSubscriptionMessageResult, ClientError> {
        let path = paths::subscription_message_path(topic_name, subscription_name);
        let request = build(
            Request::builder().method(Method::GET).uri(self.api_url(&path)),
            Bytes::new(),
        )?;
        let response = self.send(request, StatusCode::OK).await?;
        ReceiveSubscriptionMessageResult::parse(response.body())
    }

    /// Release the lock of a peek-locked message without deleting it.
    ///
    /// Fails before any request if the message was never lock-received.
    pub async fn unlock_message(&self, message: &BrokeredMessage) -> Result<(), ClientError> {
        let lock_location = require_lock_location(message)?;
        let request = build(
            Request::builder().method(Method::PUT).uri(lock_location),
            Bytes::new(),
        )?;
        self.send(request, StatusCode::OK).await?;
        Ok(())
    }

    /// Delete a peek-locked message.
    ///
    /// Fails before any request if the message was never lock-received.
    pub async fn delete_message(&self, message: &BrokeredMessage) -> Result<(), ClientError> {
        let lock_location = require_lock_location(message)?;
        let request = build(
            Request::builder().method(Method::DELETE).uri(lock_location),
            Bytes::new(),
        )?;
        self.send(request, StatusCode::OK).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queues
    // ------------------------------------------------------------------

    /// Create a queue.
    pub async fn create_queue(&self, queue: &QueueInfo) -> Result<CreateQueueResult, ClientError> {
        require_non_empty(queue.name(), "queue name")?;

        let descriptor = serialize_descriptor(queue.description(), "QueueDescription")?;
        let entry = AtomEntry::new().with_content("application/xml", descriptor);
        let request = build(
            Request::builder().method(Method::PUT).uri(self.api_url(queue.name())),
            Bytes::from(entry.to_xml()),
        )?;

        let response = self.send(request, StatusCode::CREATED).await?;
        CreateQueueResult::parse(response.body())
    }

    /// Delete a queue.
    pub async fn delete_queue(&self, queue_path: &str) -> Result<(), ClientError> {
        require_non_empty(queue_path, "queue path")?;
        self.delete_entity(queue_path).await
    }

    /// Fetch a queue's descriptor.
    pub async fn get_queue(&self, queue_path: &str) -> Result<GetQueueResult, ClientError> {
        require_non_empty(queue_path, "queue path")?;
        let response = self.get_entity(queue_path).await?;
        GetQueueResult::parse(response.body())
    }

    /// List queues.
    pub async fn list_queues(&self, options: &ListOptions) -> Result<ListQueuesResult, ClientError> {
        let response = self.list_entities(paths::LIST_QUEUES_PATH, options).await?;
        ListQueuesResult::parse(response.body())
    }

    // ------------------------------------------------------------------
    // Topics
    // ------------------------------------------------------------------

    /// Create a topic.
    ///
    /// The request body is an Atom entry titled with the topic name whose
    /// content wraps the descriptor XML with the service namespace
    /// attributes.
    pub async fn create_topic(&self, topic: &TopicInfo) -> Result<CreateTopicResult, ClientError> {
        require_non_empty(topic.name(), "topic name")?;

        let descriptor = serialize_descriptor(topic.description(), "TopicDescription")?;
        let entry = AtomEntry::new()
            .with_title(topic.name())
            .with_content("application/xml", descriptor);
        let request = build(
            Request::builder()
                .method(Method::PUT)
                .uri(self.api_url(topic.name()))
                .header(header::CONTENT_TYPE, ENTRY_CONTENT_TYPE),
            Bytes::from(entry.to_xml()),
        )?;

        let response = self.send(request, StatusCode::CREATED).await?;
        CreateTopicResult::parse(response.body())
    }

    /// Delete a topic.
    pub async fn delete_topic(&self, topic_path: &str) -> Result<(), ClientError> {
        require_non_empty(topic_path, "topic path")?;
        self.delete_entity(topic_path).await
    }

    /// Fetch a topic's descriptor.
    pub async fn get_topic(&self, topic_path: &str) -> Result<GetTopicResult, ClientError> {
        require_non_empty(topic_path, "topic path")?;
        let response = self.get_entity(topic_path).await?;
        GetTopicResult::parse(response.body())
    }

    /// List topics.
    pub async fn list_topics(&self, options: &ListOptions) -> Result<ListTopicsResult, ClientError> {
        let response = self.list_entities(paths::LIST_TOPICS_PATH, options).await?;
        ListTopicsResult::parse(response.body())
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Create a subscription under a topic.
    pub async fn create_subscription(
        &self,
        topic_path: &str,
        subscription: &SubscriptionInfo,
    ) -> Result<CreateSubscriptionResult, ClientError> {
        require_non_empty(topic_path, "topic path")?;
        require_non_empty(subscription.name(), "subscription name")?;

        let descriptor = serialize_descriptor(subscription.description(), "SubscriptionDescription")?;
        let entry = AtomEntry::new().with_content("application/xml", descriptor);
        let path = paths::subscription_path(topic_path, subscription.name());
        let request = build(
            Request::builder()
                .method(Method::PUT)
                .uri(self.api_url(&path))
                .header(header::CONTENT_TYPE, ENTRY_CONTENT_TYPE),
            Bytes::from(entry.to_xml()),
        )?;

        let response = self.send(request, StatusCode::CREATED).await?;
        CreateSubscriptionResult::parse(response.body())
    }

    /// Delete a subscription.
    pub async fn delete_subscription(
        &self,
        topic_path: &str,
        subscription_name: &str,
    ) -> Result<(), ClientError> {
        require_non_empty(topic_path, "topic path")?;
        require_non_empty(subscription_name, "subscription name")?;
        self.delete_entity(&paths::subscription_path(topic_path, subscription_name)).await
    }

    /// Fetch a subscription's descriptor.
    pub async fn get_subscription(
        &self,
        topic_path: &str,
        subscription_name: &str,
    ) -> Result<GetSubscriptionResult, ClientError> {
        require_non_empty(topic_path, "topic path")?;
        require_non_empty(subscription_name, "subscription name")?;
        let response = self
            .get_entity(&paths::subscription_path(topic_path, subscription_name))
            .await?;
        GetSubscriptionResult::parse(response.body())
    }

    /// List a topic's subscriptions.
    pub async fn list_subscriptions(
        &self,
        topic_path: &str,
        options: &ListOptions,
    ) -> Result<ListSubscriptionsResult, ClientError> {
        require_non_empty(topic_path, "topic path")?;
        let response = self
            .list_entities(&paths::subscriptions_path(topic_path), options)
            .await?;
        ListSubscriptionsResult::parse(response.body())
    }

    // ------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------

    /// Create a rule under a subscription.
    pub async fn create_rule(
        &self,
        topic_path: &str,
        subscription_name: &str,
        rule: &RuleInfo,
    ) -> Result<CreateRuleResult, ClientError> {
        require_non_empty(topic_path, "topic path")?;
        require_non_empty(subscription_name, "subscription name")?;
        require_non_empty(rule.name(), "rule name")?;

        let descriptor = serialize_descriptor(rule.description(), "RuleDescription")?;
        let entry = AtomEntry::new().with_content("application/xml", descriptor);
        let path = paths::rule_path(topic_path, subscription_name, rule.name());
        let request = build(
            Request::builder()
                .method(Method::PUT)
                .uri(self.api_url(&path))
                .header(header::CONTENT_TYPE, ENTRY_CONTENT_TYPE),
            Bytes::from(entry.to_xml()),
        )?;

        let response = self.send(request, StatusCode::CREATED).await?;
        CreateRuleResult::parse(response.body())
    }

    /// Delete a rule.
    pub async fn delete_rule(
        &self,
        topic_path: &str,
        subscription_name: &str,
        rule_name: &str,
    ) -> Result<(), ClientError> {
        require_non_empty(topic_path, "topic path")?;
        require_non_empty(subscription_name, "subscription name")?;
        require_non_empty(rule_name, "rule name")?;
        self.delete_entity(&paths::rule_path(topic_path, subscription_name, rule_name)).await
    }

    /// Fetch a rule's descriptor.
    pub async fn get_rule(
        &self,
        topic_path: &str,
        subscription_name: &str,
        rule_name: &str,
    ) -> Result<GetRuleResult, ClientError> {
        require_non_empty(topic_path, "topic path")?;
        require_non_empty(subscription_name, "subscription name")?;
        require_non_empty(rule_name, "rule name")?;
        let response = self
            .get_entity(&paths::rule_path(topic_path, subscription_name, rule_name))
            .await?;
        GetRuleResult::parse(response.body())
    }

    /// List a subscription's rules.
    pub async fn list_rules(
        &self,
        topic_path: &str,
        subscription_name: &str,
        options: &ListOptions,
    ) -> Result<ListRulesResult, ClientError> {
        require_non_empty(topic_path, "topic path")?;
        require_non_empty(subscription_name, "subscription name")?;
        let response = self
            .list_entities(&paths::rules_path(topic_path, subscription_name), options)
            .await?;
        ListRulesResult::parse(response.body())
    }

    // ------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn delete_entity(&self, path: &str) -> Result<(), ClientError> {
        let request = build(
            Request::builder().method(Method::DELETE).uri(self.api_url(path)),
            Bytes::new(),
        )?;
        self.send(request, StatusCode::OK).await?;
        Ok(())
    }

    async fn get_entity(&self, path: &str) -> Result<Response<Bytes>, ClientError> {
        let request = build(
            Request::builder().method(Method::GET).uri(self.api_url(path)),
            Bytes::new(),
        )?;
        self.send(request, StatusCode::OK).await
    }

    async fn list_entities(
        &self,
        path: &str,
        options: &ListOptions,
    ) -> Result<Response<Bytes>, ClientError> {
        let mut url = self.api_url(path);
        let mut separator = '?';
        if let Some(skip) = options.get_skip() {
            let _ = write!(url, "{separator}$skip={skip}");
            separator = '&';
        }
        if let Some(top) = options.get_top() {
            let _ = write!(url, "{separator}$top={top}");
        }
        let request = build(Request::builder().method(Method::GET).uri(url), Bytes::new())?;
        self.send(request, StatusCode::OK).await
    }

    /// Issue the request and enforce the expected status code.
    ///
    /// Any other status fails the operation with the status and body; no
    /// partially-decoded result escapes.
    async fn send(
        &self,
        request: Request<Bytes>,
        expected: StatusCode,
    ) -> Result<Response<Bytes>, ClientError> {
        debug!(method = %request.method(), uri = %request.uri(), "sending request");
        let response = self.transport.execute(request).await?;
        let status = response.status();
        debug!(%status, "received response");
        if status != expected {
            let body = String::from_utf8_lossy(response.body()).into_owned();
            return Err(ClientError::UnexpectedStatus { status, expected, body });
        }
        Ok(response)
    }
}

fn require_non_empty(value: &str, name: &str) -> Result<(), ClientError> {
    if value.is_empty() {
        return Err(ClientError::invalid_argument(format!("{name} must not be empty")));
    }
    Ok(())
}

fn require_lock_location(message: &BrokeredMessage) -> Result<&str, ClientError> {
    message.lock_location().ok_or_else(|| {
        ClientError::invalid_state("message has no lock location; it was not received with peek-lock")
    })
}

fn serialize_descriptor<T: serde::Serialize>(descriptor: &T, root: &str) -> Result<String, ClientError> {
    to_xml_with_attributes(descriptor, root, &DESCRIPTION_ATTRIBUTES)
        .map_err(|e| ClientError::invalid_argument(e.to_string()))
}

fn build(builder: http::request::Builder, body: Bytes) -> Result<Request<Bytes>, ClientError> {
    builder
        .body(body)
        .map_err(|e| ClientError::invalid_argument(format!("failed to build request: {e}")))
}

/// Reconstruct a brokered message from a receive response.
///
/// Broker properties come from the `BrokerProperties` header when present
/// (an unparsable header is a decode failure); the lock location from
/// `Location`; content type and date from their headers; every response
/// header is also copied verbatim into the message's property map. A
/// response carrying none of the optional headers still decodes into a
/// message with empty broker properties.
fn message_from_response(response: Response<Bytes>) -> Result<BrokeredMessage, ClientError> {
    let (parts, body) = response.into_parts();
    let headers = parts.headers;

    let mut broker_properties = match headers.get(BROKER_PROPERTIES_HEADER) {
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|e| ClientError::decode(format!("broker properties header: {e}")))?;
            BrokerProperties::from_header_value(raw)?
        }
        None => BrokerProperties::default(),
    };
    if let Some(location) = headers.get(header::LOCATION).and_then(|v| v.to_str().ok()) {
        broker_properties.set_lock_location(location);
    }

    let mut message = BrokeredMessage::new(body);
    if let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        message.set_content_type(content_type);
    }
    if let Some(date) = headers.get(header::DATE).and_then(|v| v.to_str().ok()) {
        message.set_date(date);
    }
    for (name, value) in headers.iter() {
        if let Ok(value) = value.to_str() {
            message.properties_mut().insert(name.as_str(), value);
        }
    }
    message.set_broker_properties(broker_properties);

    Ok(message)
}
