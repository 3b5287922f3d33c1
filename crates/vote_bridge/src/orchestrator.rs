//! Two-phase vote orchestration.
//!
//! A vote attempt walks a small state machine:
//!
//! ```text
//! Idle -> Generating -> Validating -> Rewarded
//!              |             |-----> Rejected (410, 504)
//!              |             '-----> Failed   (transport, other status)
//!              |-------------------> Rejected (409, 429)
//!              '-------------------> Failed   (transport, other status, bad body)
//! ```
//!
//! Each phase has one pure transition function ([`on_generate_response`],
//! [`on_validate_response`]) mapping the HTTP outcome to the next state and the
//! chat messages for the player. The async driver only performs the calls,
//! applies the transitions and, on `Rewarded`, schedules the reward commands
//! onto the host's main thread. Nothing is retried and nothing escapes the
//! driver: every path ends in a terminal state.

use crate::codec::{decode_generate_response, VoteResponse};
use crate::context::VoteContext;
use crate::error::{Rejection, TransportError, VoteError, VotePhase};
use crate::host::ChatSink;
use crate::messages::{ChatMessage, VoteMessages};
use crate::transport::HttpResult;
use crate::types::PlayerInfo;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Where a vote attempt currently stands.
#[derive(Debug)]
pub enum VoteState {
    Idle,
    /// Waiting for the generate-vote reply
    Generating,
    /// Vote link shown; waiting for the validate reply
    Validating { url: String, code: String },
    Rewarded,
    Rejected(Rejection),
    Failed(VoteError),
}

impl VoteState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VoteState::Rewarded | VoteState::Rejected(_) | VoteState::Failed(_)
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            VoteState::Idle => "idle",
            VoteState::Generating => "generating",
            VoteState::Validating { .. } => "validating",
            VoteState::Rewarded => "rewarded",
            VoteState::Rejected(_) => "rejected",
            VoteState::Failed(_) => "failed",
        }
    }
}

/// Next state plus what to tell the player on the way there.
#[derive(Debug)]
pub struct Transition {
    pub next: VoteState,
    pub messages: Vec<ChatMessage>,
}

impl Transition {
    fn to(next: VoteState, message: ChatMessage) -> Self {
        Self {
            next,
            messages: vec![message],
        }
    }

    fn reject(rejection: Rejection, message: ChatMessage) -> Self {
        Self::to(VoteState::Rejected(rejection), message)
    }

    fn fail(error: VoteError, message: ChatMessage) -> Self {
        Self::to(VoteState::Failed(error), message)
    }
}

/// `Generating` → next state.
pub fn on_generate_response(
    result: Result<HttpResult, TransportError>,
    messages: &VoteMessages,
) -> Transition {
    let response = match result {
        Ok(response) => response,
        Err(source) => {
            return Transition::fail(
                VoteError::Transport {
                    phase: VotePhase::Generate,
                    source,
                },
                messages.internal_error(),
            )
        }
    };

    match response.status {
        429 => Transition::reject(Rejection::RateLimited, messages.rate_limited()),
        409 => Transition::reject(Rejection::AlreadyInProgress, messages.already_in_progress()),
        200 => match decode_generate_response(&response.body) {
            Ok(VoteResponse { url, code }) => {
                let message = messages.vote_url(&url);
                Transition::to(VoteState::Validating { url, code }, message)
            }
            Err(e) => Transition::fail(e.into(), messages.internal_error()),
        },
        status => Transition::fail(
            VoteError::RemoteError {
                phase: VotePhase::Generate,
                status,
            },
            messages.unexpected_status(status),
        ),
    }
}

/// `Validating` → next state.
pub fn on_validate_response(
    result: Result<HttpResult, TransportError>,
    messages: &VoteMessages,
) -> Transition {
    let response = match result {
        Ok(response) => response,
        Err(source) => {
            return Transition::fail(
                VoteError::Transport {
                    phase: VotePhase::Validate,
                    source,
                },
                messages.internal_error(),
            )
        }
    };

    match response.status {
        410 | 504 => Transition::reject(
            Rejection::Expired {
                status: response.status,
            },
            messages.expired(),
        ),
        200 => Transition::to(VoteState::Rewarded, messages.success()),
        status => Transition::fail(
            VoteError::RemoteError {
                phase: VotePhase::Validate,
                status,
            },
            messages.not_detected(status),
        ),
    }
}

/// One player's pass through the state machine. Never stored anywhere; it
/// lives inside the task driving it.
#[derive(Debug)]
pub struct VoteAttempt {
    player: PlayerInfo,
    ip: String,
    state: VoteState,
}

impl VoteAttempt {
    pub fn new(player: PlayerInfo, ip: IpAddr) -> Self {
        Self {
            player,
            ip: ip.to_string(),
            state: VoteState::Idle,
        }
    }

    pub fn player(&self) -> &PlayerInfo {
        &self.player
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn state(&self) -> &VoteState {
        &self.state
    }

    /// Vote code, once the generate phase produced one.
    pub fn code(&self) -> Option<&str> {
        match &self.state {
            VoteState::Validating { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn into_state(self) -> VoteState {
        self.state
    }

    fn begin(&mut self) {
        debug_assert!(matches!(self.state, VoteState::Idle));
        self.state = VoteState::Generating;
    }

    /// Tells the player what happened, logs it and moves to the next state.
    fn advance(&mut self, transition: Transition, chat: &dyn ChatSink) {
        for message in &transition.messages {
            chat.send_message(&self.player, message);
        }
        debug!(
            player = %self.player.name,
            from = self.state.label(),
            to = transition.next.label(),
            "Vote attempt transition"
        );
        log_outcome(&self.player, &transition.next);
        self.state = transition.next;
    }
}

fn log_outcome(player: &PlayerInfo, state: &VoteState) {
    let name = player.name.as_str();
    match state {
        VoteState::Validating { url, .. } => {
            info!(player = name, url = %url, "🔗 Vote link generated")
        }
        VoteState::Rewarded => info!(player = name, "✅ Vote confirmed"),
        VoteState::Rejected(rejection) => {
            info!(player = name, rejection = %rejection, "Vote rejected by remote service")
        }
        VoteState::Failed(e) if e.needs_operator() => {
            error!(player = name, player_id = %player.id, error = %e, "❌ Vote attempt failed")
        }
        VoteState::Failed(e) => warn!(player = name, error = %e, "Vote attempt failed"),
        VoteState::Idle | VoteState::Generating => {}
    }
}

/// Drives vote attempts on the context's runtime.
#[derive(Clone)]
pub struct VoteOrchestrator {
    context: Arc<VoteContext>,
}

impl VoteOrchestrator {
    pub fn new(context: Arc<VoteContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Arc<VoteContext> {
        &self.context
    }

    /// Acknowledges the command and starts the attempt in the background.
    ///
    /// Returns immediately. The handle resolves to the attempt's terminal
    /// state; hosts are free to drop it.
    pub fn start_vote(&self, player: PlayerInfo, ip: IpAddr) -> JoinHandle<VoteState> {
        let mut attempt = VoteAttempt::new(player, ip);
        attempt.begin();

        info!(player = %attempt.player().name, ip = attempt.ip(), "🗳️ Vote process started");
        self.context
            .host()
            .chat
            .send_message(attempt.player(), &self.context.messages().started());

        let context = Arc::clone(&self.context);
        self.context.runtime().spawn(run_attempt(context, attempt))
    }
}

async fn run_attempt(context: Arc<VoteContext>, mut attempt: VoteAttempt) -> VoteState {
    let generated = context.api().generate(attempt.ip()).await;
    attempt.advance(
        on_generate_response(generated, context.messages()),
        context.host().chat.as_ref(),
    );

    let code = match attempt.code() {
        Some(code) => code.to_owned(),
        None => return attempt.into_state(),
    };

    let validated = context.api().validate(&code).await;
    attempt.advance(
        on_validate_response(validated, context.messages()),
        context.host().chat.as_ref(),
    );

    if matches!(attempt.state(), VoteState::Rewarded) {
        hand_off_rewards(&context, attempt.player());
    }

    attempt.into_state()
}

/// The only step that touches game state, so the only one sent back to the
/// main thread.
fn hand_off_rewards(context: &VoteContext, player: &PlayerInfo) {
    let rewards = context.rewards().clone();
    let name = player.name.clone();

    let scheduled = context
        .host()
        .scheduler
        .schedule_on_main(Box::new(move || {
            rewards.dispatch(&name);
        }));

    if let Err(e) = scheduled {
        error!(player = %player.name, error = %e, "Failed to schedule vote rewards");
    }
}
