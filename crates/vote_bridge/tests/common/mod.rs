//! Recording fakes for the host collaborators and the HTTP adapter.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;
use vote_bridge::{
    ChatMessage, ChatSink, CommandOutcome, CommandSender, CommandSink, HostError, HostServices,
    HttpResult, HttpTransport, MainThreadQueue, PlayerId, PlayerInfo, TransportError, VoteBridge,
    VoteConfig, VoteState,
};

pub type Scripted = Result<HttpResult, TransportError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    pub url: String,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

/// Answers each call with the next scripted response for its endpoint.
#[derive(Default)]
pub struct ScriptedTransport {
    generate: Mutex<VecDeque<Scripted>>,
    validate: Mutex<VecDeque<Scripted>>,
    pub posts: Mutex<Vec<RecordedPost>>,
    pub heads: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_generate(self, response: Scripted) -> Self {
        self.generate.lock().push_back(response);
        self
    }

    pub fn on_validate(self, response: Scripted) -> Self {
        self.validate.lock().push_back(response);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn next(&self, script: &Mutex<VecDeque<Scripted>>) -> Scripted {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted response".into())))
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<HttpResult, TransportError> {
        self.posts.lock().push(RecordedPost {
            url: url.to_string(),
            body,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        self.next(&self.generate)
    }

    async fn head(&self, url: &str) -> Result<HttpResult, TransportError> {
        self.heads.lock().push(url.to_string());
        self.next(&self.validate)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingChat {
    pub sent: Mutex<Vec<(PlayerId, ChatMessage)>>,
}

impl RecordingChat {
    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, m)| m.text.clone()).collect()
    }
}

impl ChatSink for RecordingChat {
    fn send_message(&self, player: &PlayerInfo, message: &ChatMessage) {
        self.sent.lock().push((player.id, message.clone()));
    }
}

/// Records commands with the thread they ran on. Commands starting with
/// `fail` report an error after being recorded.
#[derive(Default)]
pub struct RecordingCommands {
    pub executed: Mutex<Vec<(CommandSender, String, ThreadId)>>,
}

impl RecordingCommands {
    pub fn commands(&self) -> Vec<String> {
        self.executed.lock().iter().map(|(_, c, _)| c.clone()).collect()
    }
}

impl CommandSink for RecordingCommands {
    fn dispatch_command(&self, sender: &CommandSender, command: &str) -> Result<(), HostError> {
        self.executed.lock().push((
            sender.clone(),
            command.to_string(),
            std::thread::current().id(),
        ));
        if command.starts_with("fail") {
            return Err(HostError::CommandFailed(command.to_string()));
        }
        Ok(())
    }
}

pub const BASE_URL: &str = "https://votes.test";

pub fn config() -> VoteConfig {
    VoteConfig {
        server_id: "test-server".to_string(),
        command_aliases: vec!["vote".to_string(), "glosuj".to_string()],
        reward_commands: vec![
            "give %player-name% diamond 1".to_string(),
            "say %player-name% voted".to_string(),
        ],
        api_base_url: BASE_URL.to_string(),
        ..Default::default()
    }
}

pub fn player(name: &str) -> PlayerInfo {
    PlayerInfo::new(name, "203.0.113.7:25565".parse().unwrap())
}

pub fn ok(status: u16, body: &str) -> Scripted {
    Ok(HttpResult::new(status, body.to_string()))
}

pub fn status(status: u16) -> Scripted {
    Ok(HttpResult::empty(status))
}

/// A started bridge plus every fake it talks to. The test thread plays the
/// host's main thread and drains `queue`.
pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub chat: Arc<RecordingChat>,
    pub commands: Arc<RecordingCommands>,
    pub queue: MainThreadQueue,
    pub bridge: VoteBridge,
}

impl Harness {
    /// Must be called from inside a tokio runtime.
    pub fn start(transport: ScriptedTransport) -> Self {
        Self::start_with(config(), transport)
    }

    pub fn start_with(config: VoteConfig, transport: ScriptedTransport) -> Self {
        let transport = Arc::new(transport);
        let chat = Arc::new(RecordingChat::default());
        let commands = Arc::new(RecordingCommands::default());
        let queue = MainThreadQueue::new();

        let host = HostServices::new(chat.clone(), commands.clone(), Arc::new(queue.handle()));
        let bridge = VoteBridge::start(
            config,
            transport.clone(),
            host,
            tokio::runtime::Handle::current(),
        )
        .expect("test config should be valid");

        Self {
            transport,
            chat,
            commands,
            queue,
            bridge,
        }
    }
}

/// Waits for the attempt behind `outcome` to reach its terminal state.
pub async fn finish(outcome: CommandOutcome) -> VoteState {
    match outcome {
        CommandOutcome::Started(handle) => handle.await.expect("vote task panicked"),
        other => panic!("expected a started vote, got {other:?}"),
    }
}
