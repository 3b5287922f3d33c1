//! Process-scoped state shared by every vote attempt.
//!
//! One [`VoteContext`] is opened when the bridge starts and closed when it
//! stops. It owns the HTTP adapter, the configuration and the host services,
//! and is passed explicitly to the orchestrator and reward dispatcher.

use crate::api::VoteApi;
use crate::config::VoteConfig;
use crate::error::ConfigError;
use crate::host::HostServices;
use crate::messages::VoteMessages;
use crate::rewards::RewardDispatcher;
use crate::transport::HttpTransport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

pub struct VoteContext {
    config: VoteConfig,
    api: VoteApi,
    host: HostServices,
    rewards: RewardDispatcher,
    /// Runtime the HTTP continuations are spawned on
    runtime: Handle,
    closed: AtomicBool,
}

impl VoteContext {
    /// Validates `config` and wires the shared services together.
    pub fn open(
        config: VoteConfig,
        transport: Arc<dyn HttpTransport>,
        host: HostServices,
        runtime: Handle,
    ) -> Result<Arc<Self>, ConfigError> {
        config.validate()?;

        let api = VoteApi::new(&config.api_base_url, &config.server_id, transport);
        let rewards = RewardDispatcher::new(config.reward_commands.clone(), host.commands.clone());

        info!(
            server_id = %config.server_id,
            aliases = config.command_aliases.len(),
            rewards = config.reward_commands.len(),
            "🗳️ Vote context opened"
        );

        Ok(Arc::new(Self {
            config,
            api,
            host,
            rewards,
            runtime,
            closed: AtomicBool::new(false),
        }))
    }

    pub fn config(&self) -> &VoteConfig {
        &self.config
    }

    pub fn messages(&self) -> &VoteMessages {
        &self.config.messages
    }

    pub fn api(&self) -> &VoteApi {
        &self.api
    }

    pub fn host(&self) -> &HostServices {
        &self.host
    }

    pub fn rewards(&self) -> &RewardDispatcher {
        &self.rewards
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Releases the HTTP adapter. Only the first call has an effect; attempts
    /// still in flight fail with a transport error.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.api.close();
        info!("🗳️ Vote context closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
