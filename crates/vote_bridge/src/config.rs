//! Vote bridge configuration.
//!
//! Loaded once at startup by the host and read-only afterwards. Keys are
//! kebab-case so the same table reads naturally in TOML:
//!
//! ```toml
//! server-id = "my-server"
//! command-aliases = ["vote", "glosuj"]
//! reward-commands = ["give %player-name% diamond 1"]
//! ```

use crate::error::ConfigError;
use crate::messages::{VoteMessages, STATUS_PLACEHOLDER, URL_PLACEHOLDER};
use serde::{Deserialize, Serialize};

/// Base URL of the public voting service.
pub const DEFAULT_API_BASE_URL: &str = "https://api.blocklist.pl";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VoteConfig {
    /// Server slug, the last path segment of the generate endpoint
    #[serde(default)]
    pub server_id: String,
    /// Extra command names that rewrite to the vote command
    #[serde(default)]
    pub command_aliases: Vec<String>,
    /// Console commands run after a confirmed vote, in order
    #[serde(default)]
    pub reward_commands: Vec<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub messages: VoteMessages,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            server_id: String::new(),
            command_aliases: vec!["vote".to_string()],
            reward_commands: vec!["give %player-name% diamond 1".to_string()],
            api_base_url: default_api_base_url(),
            messages: VoteMessages::default(),
        }
    }
}

impl VoteConfig {
    /// Checks the settings the bridge cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let server_id = self.server_id.as_str();
        if server_id.trim().is_empty() {
            return Err(ConfigError::MissingServerId);
        }
        if server_id.contains(&['/', '?', '#'][..]) || server_id.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidServerId(self.server_id.clone()));
        }

        let url = reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            ConfigError::InvalidBaseUrl {
                url: self.api_base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.api_base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let required = [
            ("vote-url", &self.messages.vote_url, URL_PLACEHOLDER),
            ("unexpected-status", &self.messages.unexpected_status, STATUS_PLACEHOLDER),
            ("not-detected", &self.messages.not_detected, STATUS_PLACEHOLDER),
        ];
        for (message, text, placeholder) in required {
            if !text.contains(placeholder) {
                return Err(ConfigError::MissingPlaceholder {
                    message,
                    placeholder,
                });
            }
        }

        Ok(())
    }
}
