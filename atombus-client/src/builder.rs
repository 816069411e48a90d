//! Client builder.
//!
//! Provides a fluent API for configuring and building a [`ServiceBusClient`].

use std::sync::Arc;

use crate::client::ServiceBusClient;
use crate::error::ClientError;
use crate::transport::{HyperTransport, Transport};

/// Builder for creating a [`ServiceBusClient`].
///
/// # Example
///
/// ```ignore
/// use atombus_client::ClientBuilder;
///
/// let client = ClientBuilder::new("https://example.servicebus.windows.net").build()?;
/// ```
pub struct ClientBuilder {
    /// Base URL of the service namespace.
    base_url: String,
    /// Injected transport; a default [`HyperTransport`] is built when unset.
    transport: Option<Arc<dyn Transport>>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

impl ClientBuilder {
    /// Create a builder with the given base URL.
    ///
    /// The base URL should include the scheme and host, e.g.
    /// `https://example.servicebus.windows.net`. A trailing slash is
    /// stripped.
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            transport: None,
        }
    }

    /// Inject a transport.
    ///
    /// Use this to supply a transport that layers authentication or local
    /// timeout policy over the HTTP exchange, or a mock in tests.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if no transport was injected and the default one
    /// cannot be constructed.
    pub fn build(self) -> Result<ServiceBusClient, ClientError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HyperTransport::new()?),
        };
        let base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(ServiceBusClient::new(base_url, transport))
    }
}
