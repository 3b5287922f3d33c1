//! The single game-state thread.
//!
//! Every tick drains the console input received since the last tick, then
//! runs the tasks other threads scheduled onto the main thread. Console
//! commands therefore only ever run here.

use crossbeam::channel::{Receiver, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info};
use vote_bridge::MainThreadQueue;

/// Name of the thread that owns game state.
pub const GAME_THREAD_NAME: &str = "game-state";

pub struct GameLoop {
    queue: MainThreadQueue,
    input: Receiver<String>,
    tick_interval: Duration,
    running: Arc<AtomicBool>,
}

/// Controls a spawned [`GameLoop`].
pub struct GameLoopHandle {
    running: Arc<AtomicBool>,
    thread: JoinHandle<u64>,
}

impl GameLoop {
    pub fn new(queue: MainThreadQueue, input: Receiver<String>, tick_interval: Duration) -> Self {
        Self {
            queue,
            input,
            tick_interval,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Starts ticking on a dedicated thread, passing each input line to
    /// `on_line`.
    pub fn spawn<F>(self, on_line: F) -> std::io::Result<GameLoopHandle>
    where
        F: FnMut(String) + Send + 'static,
    {
        let running = self.running.clone();
        let thread = std::thread::Builder::new()
            .name(GAME_THREAD_NAME.to_string())
            .spawn(move || self.run(on_line))?;

        Ok(GameLoopHandle { running, thread })
    }

    fn run<F>(self, mut on_line: F) -> u64
    where
        F: FnMut(String),
    {
        info!("🕒 Game loop started with tick interval: {:?}", self.tick_interval);
        let mut tick_count: u64 = 0;
        let mut input_open = true;

        while self.running.load(Ordering::Acquire) {
            tick_count += 1;
            if !self.tick(&mut on_line) && input_open {
                debug!("Console input closed");
                input_open = false;
            }
            std::thread::sleep(self.tick_interval);
        }

        // Rewards confirmed just before shutdown still get their tick.
        self.tick(&mut on_line);
        info!("🛑 Game loop stopped after {} ticks", tick_count);
        tick_count
    }

    /// Returns false once the input channel has been closed.
    fn tick<F>(&self, on_line: &mut F) -> bool
    where
        F: FnMut(String),
    {
        let mut open = true;
        loop {
            match self.input.try_recv() {
                Ok(line) => on_line(line),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    open = false;
                    break;
                }
            }
        }
        self.queue.run_pending();
        open
    }
}

impl GameLoopHandle {
    /// Asks the loop to finish its current tick and exit.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Waits for the loop to exit, returning the number of ticks it ran.
    pub fn join(self) -> anyhow::Result<u64> {
        self.thread
            .join()
            .map_err(|_| anyhow::anyhow!("game loop thread panicked"))
    }
}
