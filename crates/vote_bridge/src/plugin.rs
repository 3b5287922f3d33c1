//! Lifecycle of the vote bridge inside a host server.
//!
//! The host starts the bridge once, feeds it every command line it receives
//! and shuts it down when the server stops:
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use vote_bridge::{VoteBridge, VoteConfig, ReqwestTransport, HostServices, CommandEvent};
//! # fn example(config: VoteConfig, host: HostServices, event: CommandEvent) -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(ReqwestTransport::new()?);
//! let bridge = VoteBridge::start(config, transport, host, tokio::runtime::Handle::current())?;
//!
//! if !bridge.handle_command(event).is_handled() {
//!     // not ours, continue normal dispatch
//! }
//!
//! bridge.shutdown();
//! # Ok(())
//! # }
//! ```

use crate::config::VoteConfig;
use crate::context::VoteContext;
use crate::error::ConfigError;
use crate::host::HostServices;
use crate::orchestrator::VoteOrchestrator;
use crate::router::{is_vote_command, CommandOutcome, CommandRouter, VoteCommand};
use crate::transport::HttpTransport;
use crate::types::CommandEvent;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

pub struct VoteBridge {
    context: Arc<VoteContext>,
    router: CommandRouter,
    command: VoteCommand,
}

impl VoteBridge {
    pub const NAME: &'static str = "vote_bridge";

    /// Opens the shared context and registers the vote command.
    pub fn start(
        config: VoteConfig,
        transport: Arc<dyn HttpTransport>,
        host: HostServices,
        runtime: Handle,
    ) -> Result<Self, ConfigError> {
        let router = CommandRouter::new(&config.command_aliases);
        let context = VoteContext::open(config, transport, host, runtime)?;
        let command = VoteCommand::new(VoteOrchestrator::new(context.clone()));

        info!(
            "🔌 {} v{} enabled, command /{} with aliases {:?}",
            Self::NAME,
            Self::version(),
            crate::router::VOTE_COMMAND,
            router.aliases()
        );

        Ok(Self {
            context,
            router,
            command,
        })
    }

    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn context(&self) -> &Arc<VoteContext> {
        &self.context
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    /// Rewrites aliases, then runs the vote command if the line is one.
    pub fn handle_command(&self, mut event: CommandEvent) -> CommandOutcome {
        self.router.rewrite_event(&mut event);
        if !is_vote_command(&event.message) {
            return CommandOutcome::NotHandled;
        }
        self.command.execute(&event.sender)
    }

    /// Closes the HTTP adapter. Safe to call more than once.
    pub fn shutdown(&self) {
        if !self.context.is_closed() {
            info!("🔌 {} disabled", Self::NAME);
        }
        self.context.close();
    }
}
