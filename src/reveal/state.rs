//! Reveal state: a complete reply and how much of it is showing.
//!
//! The state is a plain value. It never touches the transcript; the caller
//! commits [`RevealState::revealed`] after each [`RevealState::advance`].

use unicode_segmentation::UnicodeSegmentation;

/// How much text one tick reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealUnit {
    /// One Unicode scalar value per tick.
    #[default]
    CodePoint,
    /// One extended grapheme cluster per tick, so combining marks and emoji
    /// sequences appear whole.
    Grapheme,
}

impl RevealUnit {
    /// Byte length of the next unit at the start of `rest`.
    fn next_len(self, rest: &str) -> usize {
        match self {
            Self::CodePoint => rest.chars().next().map_or(0, char::len_utf8),
            Self::Grapheme => rest.graphemes(true).next().map_or(0, str::len),
        }
    }

    /// Number of units in `text`.
    pub fn count(self, text: &str) -> usize {
        match self {
            Self::CodePoint => text.chars().count(),
            Self::Grapheme => text.graphemes(true).count(),
        }
    }
}

/// Progress of one reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealState {
    full_text: String,
    unit: RevealUnit,
    /// Units revealed so far.
    revealed_length: usize,
    /// Byte offset of the end of the revealed prefix.
    cursor: usize,
    active: bool,
}

impl RevealState {
    /// Start revealing `full_text` from nothing.
    ///
    /// An empty reply starts out complete.
    pub fn new(full_text: impl Into<String>, unit: RevealUnit) -> Self {
        let full_text = full_text.into();
        let active = !full_text.is_empty();
        Self {
            full_text,
            unit,
            revealed_length: 0,
            cursor: 0,
            active,
        }
    }

    /// The complete reply.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Units revealed so far.
    pub const fn revealed_length(&self) -> usize {
        self.revealed_length
    }

    /// Whether more ticks are needed.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// The prefix currently showing.
    pub fn revealed(&self) -> &str {
        &self.full_text[..self.cursor]
    }

    /// Reveal one more unit and return the new prefix.
    ///
    /// Returns `None` once the whole reply is showing. The call that reveals
    /// the last unit marks the state inactive.
    pub fn advance(&mut self) -> Option<&str> {
        if !self.active {
            return None;
        }

        let step = self.unit.next_len(&self.full_text[self.cursor..]);
        self.cursor += step;
        self.revealed_length += 1;
        if self.cursor >= self.full_text.len() {
            self.active = false;
        }

        Some(self.revealed())
    }
}
