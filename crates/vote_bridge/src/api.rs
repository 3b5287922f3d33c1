//! Endpoints of the remote voting service.

use crate::codec::encode_generate_request;
use crate::error::TransportError;
use crate::transport::{HttpResult, HttpTransport};
use std::sync::Arc;

/// Typed access to the two voting endpoints on top of an [`HttpTransport`].
#[derive(Clone)]
pub struct VoteApi {
    base_url: String,
    server_slug: String,
    transport: Arc<dyn HttpTransport>,
}

impl VoteApi {
    pub fn new(
        base_url: impl Into<String>,
        server_slug: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            server_slug: server_slug.into(),
            transport,
        }
    }

    /// `POST {base}/api/external-votes/{slug}`
    pub fn generate_url(&self) -> String {
        format!("{}/api/external-votes/{}", self.base_url, self.server_slug)
    }

    /// `HEAD {base}/api/external-votes?code={code}`
    pub fn validate_url(&self, code: &str) -> String {
        format!("{}/api/external-votes?code={}", self.base_url, code)
    }

    /// Asks the service for a vote link bound to `ip`.
    pub async fn generate(&self, ip: &str) -> Result<HttpResult, TransportError> {
        self.transport
            .post(
                &self.generate_url(),
                encode_generate_request(ip),
                &[("Content-Type", "application/json")],
            )
            .await
    }

    /// Asks the service whether the vote identified by `code` was cast.
    pub async fn validate(&self, code: &str) -> Result<HttpResult, TransportError> {
        self.transport.head(&self.validate_url(code)).await
    }

    pub fn close(&self) {
        self.transport.close();
    }
}
