//! Console stand-in for a game server.
//!
//! Chat lines and console commands are written to the log instead of a
//! network connection. Input lines name the player who typed them:
//!
//! ```text
//! Steve 203.0.113.7 /vote
//! /say hello from the console
//! ```

use crate::game_loop::GAME_THREAD_NAME;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use tracing::{info, warn};
use vote_bridge::{
    ChatMessage, ChatSink, CommandEvent, CommandSender, CommandSink, HostError, PlayerId,
    PlayerInfo, Tone,
};

/// Chat and command sink that prints to the log.
#[derive(Debug, Default)]
pub struct ConsoleHost;

impl ConsoleHost {
    pub fn new() -> Self {
        Self
    }
}

impl ChatSink for ConsoleHost {
    fn send_message(&self, player: &PlayerInfo, message: &ChatMessage) {
        match message.tone {
            Tone::Info => info!(player = %player.name, "💬 {}", message.text),
            Tone::Success => info!(player = %player.name, "✅ {}", message.text),
            Tone::Error => warn!(player = %player.name, "❌ {}", message.text),
        }
    }
}

impl CommandSink for ConsoleHost {
    fn dispatch_command(&self, sender: &CommandSender, command: &str) -> Result<(), HostError> {
        let thread = std::thread::current();
        if thread.name() != Some(GAME_THREAD_NAME) {
            return Err(HostError::CommandFailed(format!(
                "'{command}' issued off the game-state thread ({})",
                thread.name().unwrap_or("unnamed")
            )));
        }

        info!(sender = sender.name(), "⚙️ Running command: /{}", command.trim_start_matches('/'));
        Ok(())
    }
}

/// A console line that could not be turned into a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Empty input line")]
    Empty,
    #[error("Expected '<name> <ip> <command>', got '{0}'")]
    Malformed(String),
    #[error("Invalid player address '{0}'")]
    InvalidAddress(String),
    #[error("Commands must start with '/', got '{0}'")]
    NotACommand(String),
}

/// Players seen on the console, so a name keeps its id across commands.
#[derive(Debug, Default)]
pub struct PlayerRoster {
    ids: HashMap<String, PlayerId>,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Turns an input line into a command event.
    pub fn parse_line(&mut self, line: &str) -> Result<CommandEvent, InputError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(InputError::Empty);
        }
        if line.starts_with('/') {
            return Ok(CommandEvent::new(CommandSender::Console, line));
        }

        let mut parts = line.splitn(3, char::is_whitespace);
        let (name, ip, command) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(ip), Some(command)) => (name, ip, command.trim_start()),
            _ => return Err(InputError::Malformed(line.to_string())),
        };

        let ip: IpAddr = ip
            .parse()
            .map_err(|_| InputError::InvalidAddress(ip.to_string()))?;
        if !command.starts_with('/') {
            return Err(InputError::NotACommand(command.to_string()));
        }

        let id = *self.ids.entry(name.to_string()).or_default();
        let player = PlayerInfo {
            id,
            name: name.to_string(),
            address: SocketAddr::new(ip, 0),
        };

        Ok(CommandEvent::new(CommandSender::Player(player), command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_player_line() {
        let mut roster = PlayerRoster::new();
        let event = roster.parse_line("Steve 203.0.113.7 /vote now").unwrap();

        let player = event.sender.as_player().unwrap();
        assert_eq!(player.name, "Steve");
        assert_eq!(player.ip().to_string(), "203.0.113.7");
        assert_eq!(event.message, "/vote now");
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_names_keep_their_id() {
        let mut roster = PlayerRoster::new();
        let first = roster.parse_line("Alex 10.0.0.1 /vote").unwrap();
        let second = roster.parse_line("Alex 10.0.0.2 /blvote").unwrap();
        let other = roster.parse_line("Steve 10.0.0.1 /vote").unwrap();

        let id = |e: &CommandEvent| e.sender.as_player().unwrap().id;
        assert_eq!(id(&first), id(&second));
        assert_ne!(id(&first), id(&other));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_parse_ipv6_player() {
        let mut roster = PlayerRoster::new();
        let event = roster.parse_line("Steve 2001:db8::1 /vote").unwrap();
        assert_eq!(event.sender.as_player().unwrap().ip().to_string(), "2001:db8::1");
    }

    #[test]
    fn test_console_line() {
        let mut roster = PlayerRoster::new();
        let event = roster.parse_line("  /blvote  ").unwrap();
        assert_eq!(event.sender, CommandSender::Console);
        assert_eq!(event.message, "/blvote");
        assert_eq!(roster.len(), 0);
    }

    #[test]
    fn test_rejected_lines() {
        let mut roster = PlayerRoster::new();
        assert_eq!(roster.parse_line("   "), Err(InputError::Empty));
        assert!(matches!(roster.parse_line("Steve /vote"), Err(InputError::Malformed(_))));
        assert_eq!(
            roster.parse_line("Steve localhost /vote"),
            Err(InputError::InvalidAddress("localhost".to_string()))
        );
        assert_eq!(
            roster.parse_line("Steve 10.0.0.1 vote"),
            Err(InputError::NotACommand("vote".to_string()))
        );
    }

    #[test]
    fn test_commands_only_run_on_game_thread() {
        let host = ConsoleHost::new();
        assert!(host.dispatch_command(&CommandSender::Console, "say hi").is_err());

        let result = std::thread::Builder::new()
            .name(GAME_THREAD_NAME.to_string())
            .spawn(move || host.dispatch_command(&CommandSender::Console, "say hi"))
            .unwrap()
            .join()
            .unwrap();
        assert!(result.is_ok());
    }
}
