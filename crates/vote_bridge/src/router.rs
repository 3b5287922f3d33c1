//! Command alias rewriting and the vote command itself.

use crate::orchestrator::{VoteOrchestrator, VoteState};
use crate::types::{CommandEvent, CommandSender};
use std::borrow::Cow;
use tokio::task::JoinHandle;
use tracing::debug;

/// Name of the canonical vote command.
pub const VOTE_COMMAND: &str = "blvote";

/// What the bridge did with a command line.
#[derive(Debug)]
pub enum CommandOutcome {
    /// A vote attempt is running for the sender
    Started(JoinHandle<VoteState>),
    /// The vote command was issued by a non-player; nothing to do
    IgnoredSender,
    /// Not the vote command; the host should dispatch it normally
    NotHandled,
}

impl CommandOutcome {
    /// Whether the host should stop its own dispatch of the command.
    pub fn is_handled(&self) -> bool {
        !matches!(self, CommandOutcome::NotHandled)
    }
}

/// Rewrites configured aliases to the canonical vote command.
#[derive(Debug, Clone, Default)]
pub struct CommandRouter {
    /// Lowercased, without leading `/`
    aliases: Vec<String>,
}

impl CommandRouter {
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let aliases = aliases
            .into_iter()
            .map(|alias| alias.as_ref().trim().trim_start_matches('/').to_lowercase())
            .filter(|alias| !alias.is_empty())
            .collect();
        Self { aliases }
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Replaces an aliased first token with `/blvote`, keeping the rest of
    /// the line byte-for-byte. Anything else is returned untouched.
    pub fn rewrite<'a>(&self, message: &'a str) -> Cow<'a, str> {
        let (head, rest) = split_first_token(message);
        let Some(name) = head.strip_prefix('/') else {
            return Cow::Borrowed(message);
        };

        let name = name.to_lowercase();
        if self.aliases.iter().any(|alias| *alias == name) {
            debug!(from = head, to = VOTE_COMMAND, "Rewrote command alias");
            Cow::Owned(format!("/{VOTE_COMMAND}{rest}"))
        } else {
            Cow::Borrowed(message)
        }
    }

    /// Rewrites the event in place. Returns `true` when it changed.
    pub fn rewrite_event(&self, event: &mut CommandEvent) -> bool {
        match self.rewrite(&event.message) {
            Cow::Owned(rewritten) => {
                event.message = rewritten;
                true
            }
            Cow::Borrowed(_) => false,
        }
    }
}

/// Whether `message` invokes the canonical vote command.
pub fn is_vote_command(message: &str) -> bool {
    let (head, _) = split_first_token(message);
    head.strip_prefix('/')
        .is_some_and(|name| name.eq_ignore_ascii_case(VOTE_COMMAND))
}

/// Splits at the first whitespace character; the remainder keeps it.
fn split_first_token(message: &str) -> (&str, &str) {
    match message.find(char::is_whitespace) {
        Some(index) => message.split_at(index),
        None => (message, ""),
    }
}

/// Handler for `/blvote`. Arguments are ignored.
#[derive(Clone)]
pub struct VoteCommand {
    orchestrator: VoteOrchestrator,
}

impl VoteCommand {
    pub fn new(orchestrator: VoteOrchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn execute(&self, sender: &CommandSender) -> CommandOutcome {
        match sender.as_player() {
            Some(player) => {
                let handle = self.orchestrator.start_vote(player.clone(), player.ip());
                CommandOutcome::Started(handle)
            }
            None => {
                debug!(sender = sender.name(), "Ignoring vote command from non-player");
                CommandOutcome::IgnoredSender
            }
        }
    }
}
