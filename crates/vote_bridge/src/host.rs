//! Interfaces the bridge consumes from its host game server.
//!
//! The host runs a single-threaded game-state loop. Chat messages may be sent
//! from any thread, but console commands may only run on that loop, so the
//! bridge never calls [`CommandSink`] directly from an HTTP continuation.
//! Instead it hands a task to the [`MainThreadScheduler`], and the host runs it
//! on its next tick. [`MainThreadQueue`] is a ready-made scheduler for hosts
//! that drive their own loop.

use crate::error::HostError;
use crate::messages::ChatMessage;
use crate::types::{CommandSender, PlayerInfo};
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tracing::trace;

/// Delivers chat messages to players. Callable from any thread.
pub trait ChatSink: Send + Sync {
    fn send_message(&self, player: &PlayerInfo, message: &ChatMessage);
}

/// Runs a command line as `sender`. Must only be called on the main thread.
pub trait CommandSink: Send + Sync {
    fn dispatch_command(&self, sender: &CommandSender, command: &str) -> Result<(), HostError>;
}

/// A unit of work destined for the game-state loop.
pub type MainTask = Box<dyn FnOnce() + Send + 'static>;

/// Moves work onto the game-state loop.
pub trait MainThreadScheduler: Send + Sync {
    /// Queues `task` to run on the next tick.
    fn schedule_on_main(&self, task: MainTask) -> Result<(), HostError>;
}

/// Bundle of host collaborators handed to the bridge at startup.
#[derive(Clone)]
pub struct HostServices {
    pub chat: Arc<dyn ChatSink>,
    pub commands: Arc<dyn CommandSink>,
    pub scheduler: Arc<dyn MainThreadScheduler>,
}

impl HostServices {
    pub fn new(
        chat: Arc<dyn ChatSink>,
        commands: Arc<dyn CommandSink>,
        scheduler: Arc<dyn MainThreadScheduler>,
    ) -> Self {
        Self {
            chat,
            commands,
            scheduler,
        }
    }
}

/// Task queue owned by the game-state loop.
///
/// Other threads enqueue through a [`MainThreadHandle`]; the loop calls
/// [`run_pending`](Self::run_pending) once per tick.
pub struct MainThreadQueue {
    sender: Sender<MainTask>,
    receiver: Receiver<MainTask>,
}

impl MainThreadQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Cloneable scheduler feeding this queue.
    pub fn handle(&self) -> MainThreadHandle {
        MainThreadHandle {
            sender: self.sender.clone(),
        }
    }

    /// Number of tasks waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Runs the tasks queued before this call, in order, on the calling
    /// thread. Tasks queued while running wait for the next tick.
    pub fn run_pending(&self) -> usize {
        let queued = self.receiver.len();
        let mut ran = 0;
        for _ in 0..queued {
            match self.receiver.try_recv() {
                Ok(task) => {
                    task();
                    ran += 1;
                }
                Err(_) => break,
            }
        }
        if ran > 0 {
            trace!(ran, "Ran main thread tasks");
        }
        ran
    }
}

impl Default for MainThreadQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half of a [`MainThreadQueue`].
#[derive(Clone)]
pub struct MainThreadHandle {
    sender: Sender<MainTask>,
}

impl MainThreadScheduler for MainThreadHandle {
    fn schedule_on_main(&self, task: MainTask) -> Result<(), HostError> {
        self.sender
            .send(task)
            .map_err(|_| HostError::SchedulerClosed)
    }
}
