//! HTTP client adapter.
//!
//! The orchestrator talks to the remote voting service through the
//! [`HttpTransport`] trait so every status-code branch can be driven from
//! tests without a network. [`ReqwestTransport`] is the production
//! implementation: one pooled `reqwest::Client` for the whole process,
//! released by [`HttpTransport::close`] at shutdown.
//!
//! A reply with *any* status code resolves to `Ok(HttpResult)`. Only failures
//! to reach the server at all resolve to `Err(TransportError)`, so callers can
//! tell "got status X" apart from "never got there".

use crate::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use tracing::{debug, info};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("vote-bridge/", env!("CARGO_PKG_VERSION"));

/// Status code and body of a reply from the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResult {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResult {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A reply without a body, as HEAD requests produce.
    pub fn empty(status: u16) -> Self {
        Self::new(status, Bytes::new())
    }
}

/// Non-blocking POST/HEAD client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `body` to `url` with the given extra headers.
    async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<HttpResult, TransportError>;

    /// Sends a HEAD request to `url`.
    async fn head(&self, url: &str) -> Result<HttpResult, TransportError>;

    /// Releases pooled connections. Safe to call more than once; requests
    /// issued afterwards fail with [`TransportError::Closed`].
    fn close(&self);
}

/// [`HttpTransport`] backed by a pooled `reqwest::Client`.
pub struct ReqwestTransport {
    /// `None` once closed
    client: RwLock<Option<reqwest::Client>>,
}

impl ReqwestTransport {
    /// Builds the client and its connection pool.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self::with_client(client))
    }

    /// Wraps an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: RwLock::new(Some(client)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.client.read().is_none()
    }

    /// Clones the shared client handle so no lock is held across an await.
    fn client(&self) -> Result<reqwest::Client, TransportError> {
        self.client.read().clone().ok_or(TransportError::Closed)
    }

    async fn finish(
        request: reqwest::RequestBuilder,
        method: &'static str,
        url: &str,
    ) -> Result<HttpResult, TransportError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        debug!(method, url, status, bytes = body.len(), "HTTP request completed");
        Ok(HttpResult { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<HttpResult, TransportError> {
        let mut request = self.client()?.post(url).body(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        Self::finish(request, "POST", url).await
    }

    async fn head(&self, url: &str) -> Result<HttpResult, TransportError> {
        let request = self.client()?.head(url);
        Self::finish(request, "HEAD", url).await
    }

    fn close(&self) {
        if self.client.write().take().is_some() {
            info!("🔌 HTTP client closed");
        }
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        TransportError::InvalidUrl(error.to_string())
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closed_transport_rejects_requests() {
        let transport = ReqwestTransport::new().unwrap();
        assert!(!transport.is_closed());

        transport.close();
        transport.close();
        assert!(transport.is_closed());

        assert_eq!(
            transport.head("http://127.0.0.1:9/").await,
            Err(TransportError::Closed)
        );
        assert_eq!(
            transport.post("http://127.0.0.1:9/", Vec::new(), &[]).await,
            Err(TransportError::Closed)
        );
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_transport_error() {
        let transport = ReqwestTransport::new().unwrap();
        let result = transport.head("not a url").await;
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_empty_result() {
        let result = HttpResult::empty(204);
        assert_eq!(result.status, 204);
        assert!(result.body.is_empty());
    }
}
