//! Message types for actor communication.
//!
//! Helper threads never touch session state. They only send these.

use crate::error::TransportError;
use crate::transport::Reply;

/// Key codes for keyboard input.
///
/// The subset of crossterm's `KeyCode` a chat prompt needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Up arrow, scrolls one row.
    Up,
    /// Down arrow, scrolls one row.
    Down,
    /// End key, jumps to the newest content.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Escape key.
    Esc,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Check if any modifier is active.
    pub const fn any(&self) -> bool {
        self.shift || self.control || self.alt
    }
}

/// Events from the input thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key {
        /// The key code.
        code: KeyCode,
        /// Modifiers held during keypress.
        modifiers: KeyModifiers,
    },

    /// Scroll wheel (positive = up, negative = down).
    Scroll {
        /// Rows scrolled.
        delta: i16,
    },

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Paste event (bracketed paste).
    Paste(String),

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}

impl InputEvent {
    /// A plain key press with no modifiers.
    pub const fn key(code: KeyCode) -> Self {
        Self::Key {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

/// Events from the request thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The model answered.
    ReplyArrived(Reply),
    /// The request failed.
    RequestFailed(TransportError),
}

impl From<Result<Reply, TransportError>> for ChatEvent {
    fn from(result: Result<Reply, TransportError>) -> Self {
        match result {
            Ok(reply) => Self::ReplyArrived(reply),
            Err(err) => Self::RequestFailed(err),
        }
    }
}
