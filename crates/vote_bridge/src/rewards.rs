//! Reward commands run after a confirmed vote.

use crate::host::CommandSink;
use crate::types::CommandSender;
use std::sync::Arc;
use tracing::{info, warn};

/// Token replaced with the voter's name in every reward command.
pub const PLAYER_NAME_PLACEHOLDER: &str = "%player-name%";

/// Runs the configured reward commands as the console.
///
/// [`dispatch`](Self::dispatch) must only be called on the host's game-state
/// thread; the orchestrator routes it there through the main-thread
/// scheduler.
#[derive(Clone)]
pub struct RewardDispatcher {
    templates: Arc<[String]>,
    sink: Arc<dyn CommandSink>,
}

impl RewardDispatcher {
    pub fn new(templates: Vec<String>, sink: Arc<dyn CommandSink>) -> Self {
        Self {
            templates: templates.into(),
            sink,
        }
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Reward commands for `player_name`, in configured order. The name is
    /// inserted as-is; templates are trusted configuration.
    pub fn render(&self, player_name: &str) -> Vec<String> {
        self.templates
            .iter()
            .map(|template| template.replace(PLAYER_NAME_PLACEHOLDER, player_name))
            .collect()
    }

    /// Executes every reward command and returns how many succeeded. A
    /// failing command is logged and the rest still run.
    pub fn dispatch(&self, player_name: &str) -> usize {
        let mut succeeded = 0;
        for command in self.render(player_name) {
            match self.sink.dispatch_command(&CommandSender::Console, &command) {
                Ok(()) => succeeded += 1,
                Err(e) => warn!(player = player_name, command = %command, error = %e, "Reward command failed"),
            }
        }

        info!(
            player = player_name,
            succeeded,
            total = self.templates.len(),
            "🎁 Vote rewards dispatched"
        );
        succeeded
    }
}
