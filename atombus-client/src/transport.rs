//! HTTP transport seam.
//!
//! The client issues every operation through the [`Transport`] trait, so the
//! HTTP stack (and anything layered on it — authentication, local timeouts,
//! connection pooling) is injectable. [`HyperTransport`] is the default
//! implementation, built on hyper_util's legacy client with a rustls
//! connector; tests substitute an in-process mock.
//!
//! Bodies are plain [`Bytes`] in both directions: the client exchanges full
//! request and response bodies, never streams.

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use crate::error::ClientError;

/// Executes one HTTP exchange on behalf of the client.
///
/// Implementations own the connection lifecycle and any authentication or
/// local timeout policy; the client only builds requests and checks status
/// codes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the full response.
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>, ClientError>;
}

type HyperClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Default transport: hyper_util legacy client over a rustls connector.
///
/// HTTPS uses the platform's native root certificates; plain HTTP is also
/// accepted for local endpoints. Connections are pooled by the underlying
/// client.
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport").finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a transport with default settings.
    pub fn new() -> Result<Self, ClientError> {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| ClientError::transport(format!("failed to load root certificates: {e}")))?
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>, ClientError> {
        let (parts, body) = request.into_parts();
        let request = Request::from_parts(parts, Full::new(body));

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| ClientError::transport(format!("request failed: {e}")))?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| ClientError::transport(format!("failed to read response body: {e}")))?
            .to_bytes();
        Ok(Response::from_parts(parts, body))
    }
}
