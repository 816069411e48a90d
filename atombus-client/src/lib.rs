//! REST/Atom client for a managed messaging service.
//!
//! [`ServiceBusClient`] maps each logical messaging operation — send/receive
//! message; create/get/delete/list queue, topic, subscription, rule — to
//! exactly one HTTP request/response exchange. Requests are built from the
//! service's path templates, sent through an injected [`Transport`], checked
//! against the operation's expected status code, and decoded from the
//! service's Atom/XML payloads into typed results.
//!
//! The wire-format types (descriptors, brokered messages, Atom envelopes)
//! live in `atombus-core`; client method signatures use them directly.
//!
//! # Example
//!
//! ```ignore
//! use atombus_client::{ClientBuilder, ReceiveMessageOptions};
//! use atombus_core::{BrokeredMessage, QueueInfo};
//!
//! let client = ClientBuilder::new("https://example.servicebus.windows.net").build()?;
//!
//! client.create_queue(&QueueInfo::new("orders")).await?;
//! client.send_queue_message("orders", &BrokeredMessage::new("hello")).await?;
//!
//! let message = client
//!     .receive_queue_message("orders", &ReceiveMessageOptions::peek_lock())
//!     .await?;
//! client.delete_message(&message).await?;
//! ```

mod builder;
mod client;
mod error;
mod options;
mod paths;
mod results;
mod transport;

pub use builder::ClientBuilder;
pub use client::ServiceBusClient;
pub use error::ClientError;
pub use options::{ListOptions, ReceiveMessageOptions, ReceiveMode};
pub use results::{
    CreateQueueResult, CreateRuleResult, CreateSubscriptionResult, CreateTopicResult,
    GetQueueResult, GetRuleResult, GetSubscriptionResult, GetTopicResult, ListQueuesResult,
    ListRulesResult, ListSubscriptionsResult, ListTopicsResult, ReceiveSubscriptionMessageResult,
};
pub use transport::{HyperTransport, Transport};
