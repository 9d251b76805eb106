//! Incremental reveal of completed replies.
//!
//! A reply arrives whole and is shown one unit per tick. [`RevealState`]
//! tracks how much is showing, [`RevealController`] applies ticks to the one
//! running reveal, and [`Viewport`] decides whether new content scrolls into
//! view.

mod controller;
mod state;
mod viewport;

pub use controller::{RevealController, RevealStep, TickSource, DEFAULT_TICK_INTERVAL};
pub use state::{RevealState, RevealUnit};
pub use viewport::{Viewport, ViewportConfig, ViewportMetrics, DEFAULT_NEAR_BOTTOM_THRESHOLD};
