//! Player-facing chat messages.
//!
//! Every text is configurable so servers can localise them. `%url%` and
//! `%status%` are replaced with the vote link and the HTTP status code.

use serde::{Deserialize, Serialize};

pub const URL_PLACEHOLDER: &str = "%url%";
pub const STATUS_PLACEHOLDER: &str = "%status%";

/// How a message should be presented. Hosts map this onto their own colours
/// (progress in yellow, success in green, errors in red).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Info,
    Success,
    Error,
}

/// A chat line addressed to a single player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub tone: Tone,
    pub text: String,
}

impl ChatMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            text: text.into(),
        }
    }
}

/// Configurable texts for every outcome of a vote attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct VoteMessages {
    pub started: String,
    pub vote_url: String,
    pub rate_limited: String,
    pub already_in_progress: String,
    pub internal_error: String,
    pub unexpected_status: String,
    pub expired: String,
    pub not_detected: String,
    pub success: String,
}

impl Default for VoteMessages {
    fn default() -> Self {
        Self {
            started: "Vote process started...".to_string(),
            vote_url: "Your vote link: %url%".to_string(),
            rate_limited: "You can only vote once every 24 hours.".to_string(),
            already_in_progress: "You already have a vote in progress.".to_string(),
            internal_error: "An error occurred. Please contact the server administrator."
                .to_string(),
            unexpected_status: "An error occurred. Response code: %status%".to_string(),
            expired: "The time to vote has expired.".to_string(),
            not_detected: "No vote was detected, please try again later. Response code: %status%"
                .to_string(),
            success: "Thank you for voting for the server!".to_string(),
        }
    }
}

impl VoteMessages {
    pub fn started(&self) -> ChatMessage {
        ChatMessage::info(&self.started)
    }

    pub fn vote_url(&self, url: &str) -> ChatMessage {
        ChatMessage::success(self.vote_url.replace(URL_PLACEHOLDER, url))
    }

    pub fn rate_limited(&self) -> ChatMessage {
        ChatMessage::error(&self.rate_limited)
    }

    pub fn already_in_progress(&self) -> ChatMessage {
        ChatMessage::error(&self.already_in_progress)
    }

    pub fn internal_error(&self) -> ChatMessage {
        ChatMessage::error(&self.internal_error)
    }

    pub fn unexpected_status(&self, status: u16) -> ChatMessage {
        ChatMessage::error(
            self.unexpected_status
                .replace(STATUS_PLACEHOLDER, &status.to_string()),
        )
    }

    pub fn expired(&self) -> ChatMessage {
        ChatMessage::error(&self.expired)
    }

    pub fn not_detected(&self, status: u16) -> ChatMessage {
        ChatMessage::error(self.not_detected.replace(STATUS_PLACEHOLDER, &status.to_string()))
    }

    pub fn success(&self) -> ChatMessage {
        ChatMessage::success(&self.success)
    }
}
