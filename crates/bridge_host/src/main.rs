//! Console game host running the vote bridge.
//!
//! Reads player commands from stdin, runs them through the bridge on the
//! game-state thread and logs what a real server would show its players.

mod cli;
mod config;
mod console;
mod game_loop;
mod logging;
mod signals;

use anyhow::Context;
use cli::CliArgs;
use config::AppConfig;
use console::{ConsoleHost, PlayerRoster};
use crossbeam::channel::Sender;
use game_loop::GameLoop;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use vote_bridge::{
    CommandOutcome, CommandSink, HostServices, MainThreadQueue, ReqwestTransport, VoteBridge,
};

/// Display the application banner
fn display_banner() {
    info!("🗳️ Vote Bridge Host v{}", env!("CARGO_PKG_VERSION"));
    info!("⌨️ Input format: <name> <ip> /<command>, or /<command> for the console");
}

/// Forwards stdin lines to the game loop from a detached thread, so a pending
/// read never holds up runtime shutdown. Signals `eof` when input ends.
fn spawn_stdin_reader(lines: Sender<String>, eof: oneshot::Sender<()>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if lines.send(line).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read console input: {}", e);
                        break;
                    }
                }
            }
            let _ = eof.send(());
        })?;
    Ok(())
}

pub struct Application {
    config: AppConfig,
    bridge: Arc<VoteBridge>,
    host: Arc<ConsoleHost>,
    queue: MainThreadQueue,
}

impl Application {
    pub async fn new(args: CliArgs) -> anyhow::Result<Self> {
        // Load configuration first (before logging setup)
        let mut config = AppConfig::load_from_file(&args.config_path)
            .await
            .with_context(|| format!("Failed to load {}", args.config_path.display()))?;

        // Apply CLI overrides
        if let Some(server_id) = args.server_id {
            config.vote.server_id = server_id;
        }
        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }
        if args.json_logs {
            config.logging.json_format = true;
        }

        if let Err(e) = config.validate() {
            anyhow::bail!("Configuration validation failed: {}", e);
        }

        logging::setup_logging(&config.logging)?;
        display_banner();
        info!("📂 Config: {}", args.config_path.display());

        let queue = MainThreadQueue::new();
        let host = Arc::new(ConsoleHost::new());
        let services = HostServices::new(host.clone(), host.clone(), Arc::new(queue.handle()));
        let transport = Arc::new(ReqwestTransport::new()?);

        let bridge = VoteBridge::start(
            config.vote.clone(),
            transport,
            services,
            tokio::runtime::Handle::current(),
        )?;

        Ok(Self {
            config,
            bridge: Arc::new(bridge),
            host,
            queue,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!("📋 Configuration Summary:");
        info!("  🌐 Voting service: {}", self.config.vote.api_base_url);
        info!("  🏷️ Server id: {}", self.config.vote.server_id);
        info!("  🎁 Reward commands: {}", self.config.vote.reward_commands.len());
        info!("  🕒 Tick interval: {}ms", self.config.server.tick_interval_ms);

        let (line_tx, line_rx) = crossbeam::channel::unbounded();
        let (eof_tx, eof_rx) = oneshot::channel();

        let bridge = self.bridge.clone();
        let host = self.host.clone();
        let mut roster = PlayerRoster::new();
        let game_loop = GameLoop::new(
            self.queue,
            line_rx,
            Duration::from_millis(self.config.server.tick_interval_ms),
        )
        .spawn(move |line| handle_line(&bridge, host.as_ref(), &mut roster, &line))?;

        spawn_stdin_reader(line_tx, eof_tx)?;

        info!("✅ Vote Bridge Host is now running!");
        info!("🛑 Press Ctrl+C to gracefully shutdown");

        tokio::select! {
            result = signals::wait_for_shutdown() => {
                result?;
                info!("🛑 Shutdown signal received, initiating graceful shutdown...");
            }
            _ = eof_rx => {
                info!("🛑 Console input closed, initiating graceful shutdown...");
            }
        }

        self.bridge.shutdown();
        game_loop.stop();
        let ticks = tokio::task::spawn_blocking(move || game_loop.join()).await??;

        info!("✅ Vote Bridge Host shutdown complete after {} ticks", ticks);
        Ok(())
    }
}

/// Runs one console line on the game-state thread.
fn handle_line(bridge: &VoteBridge, host: &ConsoleHost, roster: &mut PlayerRoster, line: &str) {
    let event = match roster.parse_line(line) {
        Ok(event) => event,
        Err(console::InputError::Empty) => return,
        Err(e) => {
            warn!("⚠️ {}", e);
            return;
        }
    };

    let sender = event.sender.clone();
    let command = event.message.clone();
    match bridge.handle_command(event) {
        CommandOutcome::Started(_) => {
            debug!(sender = sender.name(), players = roster.len(), "Vote attempt running");
        }
        CommandOutcome::IgnoredSender => {
            info!("The vote command can only be used by players");
        }
        CommandOutcome::NotHandled => {
            if sender.as_player().is_some() {
                warn!(sender = sender.name(), "Unknown command: {}", command);
            } else if let Err(e) = host.dispatch_command(&sender, &command) {
                error!("❌ {}", e);
            }
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                return Err(e);
            }
        }
        Err(e) => {
            eprintln!("❌ Failed to start application: {e:?}");
            return Err(e);
        }
    }

    info!("👋 Goodbye");
    Ok(())
}
