//! Ticker Actor: Dedicated thread pacing one reveal.
//!
//! Each reveal owns one ticker. Every tick is stamped with the message being
//! revealed, so ticks that outlive a cancelled ticker in the channel can be
//! told apart from the current reveal's ticks.

use crate::transcript::MessageId;
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A tick event sent at regular intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Message whose reveal this tick paces.
    pub message: MessageId,
    /// Frame number (monotonically increasing).
    pub frame: u64,
    /// Time elapsed since the ticker was started.
    pub elapsed: Duration,
}

impl Tick {
    /// A tick for `message` with no timing information, for driving a
    /// reveal by hand.
    pub const fn manual(message: MessageId, frame: u64) -> Self {
        Self {
            message,
            frame,
            elapsed: Duration::ZERO,
        }
    }
}

/// Ticker actor that generates regular timing events for one reveal.
pub struct TickerActor {
    /// Message being paced.
    message: MessageId,
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Cancellation flag.
    shutdown: Arc<AtomicBool>,
}

impl TickerActor {
    /// Spawn a ticker that sends a [`Tick`] for `message` every `interval`.
    ///
    /// Ticks are sent with `try_send`: when the receiver lags, ticks are
    /// skipped rather than queued.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the ticker thread.
    pub fn spawn(message: MessageId, interval: Duration, sender: Sender<Tick>) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name(format!("flywheel-reveal-{message}"))
            .spawn(move || {
                Self::run_loop(message, &sender, &shutdown_clone, interval);
            })
            .expect("Failed to spawn ticker thread");

        Self {
            message,
            handle: Some(handle),
            shutdown,
        }
    }

    /// Message this ticker paces.
    pub const fn message(&self) -> MessageId {
        self.message
    }

    /// Signal the ticker to stop.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Stop the ticker and wait for its thread to finish.
    ///
    /// No tick is sent after this returns.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main ticker loop.
    fn run_loop(message: MessageId, tick_tx: &Sender<Tick>, shutdown: &Arc<AtomicBool>, interval: Duration) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut next_tick = start + interval;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let now = Instant::now();
            if now >= next_tick {
                let tick = Tick {
                    message,
                    frame,
                    elapsed: now - start,
                };

                // Skip the tick if the receiver is behind; a disconnected
                // receiver means nobody is revealing anymore.
                if let Err(crossbeam_channel::TrySendError::Disconnected(_)) = tick_tx.try_send(tick) {
                    break;
                }

                frame += 1;
                next_tick += interval;

                // Catch up without queuing when behind
                if next_tick < now {
                    next_tick = now + interval;
                }
            } else {
                let sleep_duration = next_tick - now;
                thread::sleep(sleep_duration.min(Duration::from_millis(1)));
            }
        }
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
