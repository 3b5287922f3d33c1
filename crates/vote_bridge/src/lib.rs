//! # Vote Bridge
//!
//! Lets players of a game server vote for it on a remote voting service and
//! rewards them once the vote is confirmed.
//!
//! ## Flow
//!
//! 1. A player runs `/blvote` (or a configured alias, rewritten by the
//!    [`CommandRouter`]).
//! 2. The [`VoteOrchestrator`] acknowledges the command and POSTs the
//!    player's IP to the service, which answers with a vote link and a code.
//! 3. The link is shown to the player and the service is asked, with a HEAD
//!    request keyed by the code, whether the vote was cast.
//! 4. On confirmation the [`RewardDispatcher`] runs the configured console
//!    commands, on the host's main thread.
//!
//! Every status code the service can answer with maps to exactly one
//! terminal state and chat message; see [`orchestrator`].
//!
//! ## Threading
//!
//! HTTP continuations run on the tokio runtime, never on the host's
//! game-state thread. Chat messages are sent from there directly. Reward
//! commands are the one exception: they are handed to the host's
//! [`MainThreadScheduler`] and run on its next tick.
//!
//! ## Host integration
//!
//! The host implements [`ChatSink`], [`CommandSink`] and
//! [`MainThreadScheduler`] (or uses [`MainThreadQueue`]), then starts a
//! [`VoteBridge`] and passes it every command line.

pub mod api;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod messages;
pub mod orchestrator;
pub mod plugin;
pub mod rewards;
pub mod router;
pub mod transport;
pub mod types;

pub use api::VoteApi;
pub use codec::{decode_generate_response, encode_generate_request, VoteRequest, VoteResponse};
pub use config::{VoteConfig, DEFAULT_API_BASE_URL};
pub use context::VoteContext;
pub use error::{ConfigError, DecodeError, HostError, Rejection, TransportError, VoteError, VotePhase};
pub use host::{
    ChatSink, CommandSink, HostServices, MainTask, MainThreadHandle, MainThreadQueue,
    MainThreadScheduler,
};
pub use messages::{ChatMessage, Tone, VoteMessages};
pub use orchestrator::{
    on_generate_response, on_validate_response, Transition, VoteAttempt, VoteOrchestrator,
    VoteState,
};
pub use plugin::VoteBridge;
pub use rewards::{RewardDispatcher, PLAYER_NAME_PLACEHOLDER};
pub use router::{is_vote_command, CommandOutcome, CommandRouter, VoteCommand, VOTE_COMMAND};
pub use transport::{HttpResult, HttpTransport, ReqwestTransport};
pub use types::{CommandEvent, CommandSender, PlayerId, PlayerInfo};
