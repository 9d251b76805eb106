//! Actor Model: helper threads around the chat session.
//!
//! The session owns all state and runs on one thread. Helpers run on their
//! own threads and only send messages over crossbeam channels:
//! - **Input Actor**: Polls terminal events, forwards them to the session
//! - **Ticker Actor**: Paces one reveal, one tick per interval
//! - **Request Actor**: Runs one transport call, sends back the outcome
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │              │
//!                                      │ ChatSession  │
//! ┌──────────────┐        Tick         │              │
//! │Ticker Thread │ ─────────────────▶  │              │
//! └──────────────┘                     └──────────────┘
//!                                            ▲
//!                                            │ ChatEvent
//!                                      ┌──────────────┐
//!                                      │Request Thread│
//!                                      └──────────────┘
//! ```

mod input;
mod messages;
mod request;
mod ticker;

pub use input::InputActor;
pub use messages::{ChatEvent, InputEvent, KeyCode, KeyModifiers};
pub use request::RequestActor;
pub use ticker::{Tick, TickerActor};
