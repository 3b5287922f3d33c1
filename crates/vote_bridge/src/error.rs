//! Error types for the vote bridge.
//!
//! Every failure a vote attempt can meet ends up as a [`VoteError`] stored in
//! the attempt's terminal state. Nothing here is ever propagated out of the
//! orchestration chain; the player sees a chat message and operators see a log
//! line.

use std::fmt;

/// The two remote calls a vote attempt makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VotePhase {
    Generate,
    Validate,
}

impl fmt::Display for VotePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VotePhase::Generate => f.write_str("generate"),
            VotePhase::Validate => f.write_str("validate"),
        }
    }
}

/// The remote voting service could not be reached at all.
///
/// A response with any status code is never a transport error; see
/// [`crate::transport::HttpResult`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The HTTP client was closed during shutdown
    #[error("HTTP client has been closed")]
    Closed,
    /// The request URL could not be built
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
    /// Connection could not be established (DNS, refused, TLS)
    #[error("Connection failed: {0}")]
    Connect(String),
    /// Any other failure while sending the request or reading the reply
    #[error("Request failed: {0}")]
    Request(String),
}

/// A 200 generate-vote reply whose body was not the expected JSON.
#[derive(Debug, thiserror::Error)]
#[error("Malformed vote response: {0}")]
pub struct DecodeError(#[from] pub serde_json::Error);

/// Known non-success statuses that carry a meaning for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// 429 from generate: one vote per 24 hours
    RateLimited,
    /// 409 from generate: a vote for this player is already pending
    AlreadyInProgress,
    /// 410 or 504 from validate: the voting window closed
    Expired { status: u16 },
}

impl Rejection {
    /// HTTP status the remote service answered with.
    pub fn status(&self) -> u16 {
        match self {
            Rejection::RateLimited => 429,
            Rejection::AlreadyInProgress => 409,
            Rejection::Expired { status } => *status,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::RateLimited => f.write_str("rate limited (429)"),
            Rejection::AlreadyInProgress => f.write_str("vote already in progress (409)"),
            Rejection::Expired { status } => write!(f, "vote expired ({status})"),
        }
    }
}

/// Why a vote attempt ended without a reward.
#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    /// Could not reach the remote service
    #[error("Transport error during {phase}: {source}")]
    Transport {
        phase: VotePhase,
        #[source]
        source: TransportError,
    },
    /// The remote service answered with a known refusal
    #[error("Remote service rejected the vote: {0}")]
    RemoteRejection(Rejection),
    /// The remote service answered with an unexpected status
    #[error("Remote service answered {status} during {phase}")]
    RemoteError { phase: VotePhase, status: u16 },
    /// The 200 generate reply could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl VoteError {
    /// Whether the failure points at an outage or a bug rather than at the
    /// player, and therefore belongs in the operator's error log.
    pub fn needs_operator(&self) -> bool {
        matches!(self, VoteError::Transport { .. } | VoteError::Decode(_))
    }
}

/// A host collaborator refused a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The host could not run a command
    #[error("Command dispatch failed: {0}")]
    CommandFailed(String),
    /// The main-thread queue no longer accepts tasks
    #[error("Main thread scheduler is closed")]
    SchedulerClosed,
}

/// Invalid vote bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("server-id must be set")]
    MissingServerId,
    #[error("server-id must be a single path segment, got '{0}'")]
    InvalidServerId(String),
    #[error("Invalid api-base-url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Message '{message}' must contain the {placeholder} placeholder")]
    MissingPlaceholder {
        message: &'static str,
        placeholder: &'static str,
    },
}
