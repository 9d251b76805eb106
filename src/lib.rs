//! # Flywheel Chat
//!
//! Reply rendering pipeline for chat clients.
//!
//! A model reply arrives as one complete string. Flywheel Chat parses it into
//! render-ready blocks and reveals it one unit per tick, keeping the view
//! pinned to the newest content until the user scrolls away.
//!
//! ## Core Concepts
//!
//! - **Content parser**: fences, pipe tables and line classification in a
//!   single forward scan that never fails
//! - **Incremental reveal**: a growing prefix committed to the transcript on
//!   every tick, paced by a cancellable ticker thread
//! - **Auto-scroll**: coalesced scroll requests, gated on how close the
//!   viewport is to the bottom
//! - **Actor model**: input, ticker and request threads that only send
//!   messages to the session
//!
//! ## Example
//!
//! ```rust
//! use flywheel_chat::{parse, ContentBlock};
//!
//! let blocks = parse("## Result\n```sh\nls\n```");
//! assert!(matches!(&blocks[0], ContentBlock::Heading { level: 2, .. }));
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod content;
pub mod error;
pub mod reveal;
pub mod session;
pub mod transcript;
pub mod transport;

// Re-exports for convenience
pub use actor::{ChatEvent, InputEvent, Tick};
pub use content::{parse, parse_document, to_plain_text, Alignment, ContentBlock, Document};
pub use error::{AttachmentError, CapabilityError, SessionError, TranscriptError, TransportError};
pub use reveal::{RevealController, RevealState, RevealUnit, TickSource, Viewport, ViewportConfig};
pub use session::{ChatSession, InputAction, SessionConfig};
pub use transcript::{Message, MessageId, Role, Source, Transcript};
pub use transport::{Prompt, Reply, Transport};
