//! Wire format of the generate-vote call.
//!
//! The remote service speaks JSON. The request is `{"ip": "<ip>"}` and a 200
//! reply is `{"url": "<vote link>", "code": "<opaque token>"}`. The validate
//! call carries no body in either direction.

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};

/// Outbound generate-vote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub ip: String,
}

impl VoteRequest {
    pub fn new(ip: impl Into<String>) -> Self {
        Self { ip: ip.into() }
    }

    /// Serializes the request as a canonical JSON object.
    pub fn encode(&self) -> Vec<u8> {
        serde_json::json!({ "ip": self.ip }).to_string().into_bytes()
    }
}

/// Reply to a successful generate-vote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    /// Link shown to the player verbatim
    pub url: String,
    /// Token used to poll the validate endpoint
    pub code: String,
}

/// Encodes the generate-vote request body for `ip`.
pub fn encode_generate_request(ip: &str) -> Vec<u8> {
    VoteRequest::new(ip).encode()
}

/// Decodes a 200 generate-vote reply.
///
/// Fails when the body is not JSON or when `url` or `code` is missing or not
/// a string. Unknown fields are ignored.
pub fn decode_generate_response(body: &[u8]) -> Result<VoteResponse, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}
