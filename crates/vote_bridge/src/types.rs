//! Identity types shared between the bridge and its host.
//!
//! The host owns players and command senders; the bridge only ever sees the
//! small snapshot defined here, taken at the moment a command is invoked.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a player.
///
/// Wraps a UUID so player identities stay unique across sessions and can be
/// logged or compared without touching the host's player objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Creates a new random player ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of the player who invoked a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    /// Stable player identity
    pub id: PlayerId,
    /// Display name, substituted into reward commands
    pub name: String,
    /// Remote address of the player's connection
    pub address: SocketAddr,
}

impl PlayerInfo {
    /// Creates a player snapshot with a fresh identity.
    pub fn new(name: impl Into<String>, address: SocketAddr) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.into(),
            address,
        }
    }

    /// IP address the remote voting service should bind the vote to.
    pub fn ip(&self) -> IpAddr {
        self.address.ip()
    }
}

/// Whoever issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSender {
    /// A connected player
    Player(PlayerInfo),
    /// The server console
    Console,
    /// Any other non-player source (command blocks, schedulers, RCON...)
    Automated(String),
}

impl CommandSender {
    /// Returns the player behind this sender, if any.
    pub fn as_player(&self) -> Option<&PlayerInfo> {
        match self {
            CommandSender::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Human-readable sender name for logs.
    pub fn name(&self) -> &str {
        match self {
            CommandSender::Player(player) => &player.name,
            CommandSender::Console => "CONSOLE",
            CommandSender::Automated(source) => source,
        }
    }
}

/// A command line as the host received it, before normal dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEvent {
    pub sender: CommandSender,
    /// Raw command text including the leading `/`
    pub message: String,
}

impl CommandEvent {
    pub fn new(sender: CommandSender, message: impl Into<String>) -> Self {
        Self {
            sender,
            message: message.into(),
        }
    }
}
