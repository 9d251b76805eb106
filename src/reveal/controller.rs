//! Reveal Controller: drives one reveal at a time from ticks.
//!
//! The controller owns the [`RevealState`] of the current reveal and, with a
//! threaded tick source, the [`TickerActor`] pacing it. Every tick names the
//! message it belongs to; ticks for anything but the current reveal are
//! ignored, so a superseded reveal can never write again.

use super::state::{RevealState, RevealUnit};
use crate::actor::{Tick, TickerActor};
use crate::transcript::MessageId;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::time::Duration;

/// Default time between reveal ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Where reveal ticks come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    /// A ticker thread per reveal, one tick every `interval`.
    Threaded {
        /// Time between ticks.
        interval: Duration,
    },
    /// The caller delivers ticks itself, through [`RevealController::on_tick`]
    /// or the channel from [`RevealController::tick_sender`].
    Manual,
}

impl Default for TickSource {
    fn default() -> Self {
        Self::Threaded {
            interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// The outcome of a tick that advanced the current reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealStep {
    /// Message being revealed.
    pub message: MessageId,
    /// Revealed prefix to commit.
    pub content: String,
    /// Whether this step committed the full reply.
    pub finished: bool,
}

struct ActiveReveal {
    message: MessageId,
    state: RevealState,
    ticker: Option<TickerActor>,
}

impl ActiveReveal {
    fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.join();
        }
    }
}

/// Runs at most one reveal at a time.
pub struct RevealController {
    source: TickSource,
    unit: RevealUnit,
    active: Option<ActiveReveal>,
    tick_tx: Sender<Tick>,
    tick_rx: Receiver<Tick>,
}

impl RevealController {
    /// Create an idle controller.
    pub fn new(source: TickSource, unit: RevealUnit) -> Self {
        // Small buffer: the ticker drops ticks rather than queueing them.
        let (tick_tx, tick_rx) = bounded(2);
        Self {
            source,
            unit,
            active: None,
            tick_tx,
            tick_rx,
        }
    }

    /// Start revealing `full_text` as `message`.
    ///
    /// Any running reveal is cancelled first and its ticker joined. Returns
    /// `false` when there is nothing to reveal: an empty reply is complete
    /// at start and gets no ticker.
    pub fn start(&mut self, message: MessageId, full_text: impl Into<String>) -> bool {
        self.cancel();

        let state = RevealState::new(full_text, self.unit);
        if !state.is_active() {
            tracing::debug!(%message, "empty reply, nothing to reveal");
            return false;
        }

        let ticker = match self.source {
            TickSource::Threaded { interval } => {
                Some(TickerActor::spawn(message, interval, self.tick_tx.clone()))
            }
            TickSource::Manual => None,
        };

        tracing::debug!(
            %message,
            units = self.unit.count(state.full_text()),
            "reveal started"
        );
        self.active = Some(ActiveReveal {
            message,
            state,
            ticker,
        });
        true
    }

    /// Stop the current reveal, if any. No tick for it is acted on again.
    pub fn cancel(&mut self) {
        if let Some(mut reveal) = self.active.take() {
            reveal.stop();
            tracing::debug!(
                message = %reveal.message,
                revealed = reveal.state.revealed_length(),
                "reveal cancelled"
            );
        }
    }

    /// Stop the current reveal and return its full text as the final step.
    pub fn finish_now(&mut self) -> Option<RevealStep> {
        let mut reveal = self.active.take()?;
        reveal.stop();
        tracing::debug!(message = %reveal.message, "reveal fast-forwarded");
        Some(RevealStep {
            message: reveal.message,
            content: reveal.state.full_text().to_owned(),
            finished: true,
        })
    }

    /// Apply one tick.
    ///
    /// Returns the new prefix when the tick belongs to the current reveal,
    /// and `None` for stale ticks or when idle. The step that reveals the
    /// last unit stops the ticker and leaves the controller idle.
    pub fn on_tick(&mut self, tick: Tick) -> Option<RevealStep> {
        let reveal = self.active.as_mut()?;
        if reveal.message != tick.message {
            tracing::trace!(stale = %tick.message, current = %reveal.message, "ignoring stale tick");
            return None;
        }

        let content = reveal.state.advance()?.to_owned();
        let finished = !reveal.state.is_active();
        let message = reveal.message;

        if finished {
            reveal.stop();
            tracing::debug!(
                %message,
                revealed = reveal.state.revealed_length(),
                frame = tick.frame,
                "reveal finished"
            );
            self.active = None;
        }

        Some(RevealStep {
            message,
            content,
            finished,
        })
    }

    /// Message currently being revealed.
    pub fn current(&self) -> Option<MessageId> {
        self.active.as_ref().map(|r| r.message)
    }

    /// Whether a reveal is running.
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Channel the ticker threads send on.
    pub fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// A sender into the tick channel, for driving reveals by hand.
    pub fn tick_sender(&self) -> Sender<Tick> {
        self.tick_tx.clone()
    }

    /// Apply every tick already waiting in the channel.
    ///
    /// Returns the last step produced, which carries the newest prefix.
    pub fn drain(&mut self) -> Option<RevealStep> {
        let mut last = None;
        while let Ok(tick) = self.tick_rx.try_recv() {
            if let Some(step) = self.on_tick(tick) {
                let finished = step.finished;
                last = Some(step);
                if finished {
                    break;
                }
            }
        }
        last
    }
}

impl Drop for RevealController {
    fn drop(&mut self) {
        self.cancel();
    }
}
