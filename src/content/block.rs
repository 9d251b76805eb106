//! Content blocks: the typed, render-ready units of a parsed reply.

use serde::Serialize;
use std::ops::Range;

/// Language assumed for a fenced code block without a tag.
pub const DEFAULT_CODE_LANGUAGE: &str = "javascript";

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left aligned (`---` or `:--`).
    #[default]
    Left,
    /// Centered (`:-:`).
    Center,
    /// Right aligned (`--:`).
    Right,
}

impl Alignment {
    /// Derive the alignment from a trimmed alignment-row cell.
    pub fn from_marker(cell: &str) -> Self {
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Self::Center,
            (_, true) => Self::Right,
            _ => Self::Left,
        }
    }
}

/// One classified unit of reply content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A fenced code block.
    CodeBlock {
        /// Language tag from the opening fence.
        language: String,
        /// Body of the fence, trimmed.
        code: String,
    },
    /// A pipe table.
    Table {
        /// Header row cells.
        header_cells: Vec<String>,
        /// Per-column alignment from the alignment row.
        column_alignment: Vec<Alignment>,
        /// Data rows. Rows may be shorter or longer than the header.
        rows: Vec<Vec<String>>,
    },
    /// A `#`, `##` or `###` heading.
    Heading {
        /// Heading level, 1 to 3.
        level: u8,
        /// Text after the marker.
        text: String,
    },
    /// A `- ` list item.
    ListItem {
        /// Text after the marker.
        text: String,
    },
    /// A line of prose with emphasis already substituted.
    ///
    /// The text carries `<strong>`/`<em>` markup and is meant to be rendered
    /// as trusted markup, not as plain text.
    Paragraph {
        /// Inline markup text.
        html_inline_text: String,
    },
    /// An empty line.
    Blank,
}

impl ContentBlock {
    /// The text a "copy" action on this block should put on the clipboard.
    ///
    /// Only code blocks have a copy action.
    pub fn copy_text(&self) -> Option<&str> {
        match self {
            Self::CodeBlock { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Check if this block is a spacing marker.
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// A block together with the byte range of the input that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedBlock {
    /// The parsed block.
    pub block: ContentBlock,
    /// Byte range in the parsed input.
    pub source: Range<usize>,
}

impl SourcedBlock {
    /// Pair a block with its source range.
    pub const fn new(block: ContentBlock, source: Range<usize>) -> Self {
        Self { block, source }
    }
}

/// The ordered result of parsing one reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<SourcedBlock>,
}

impl Document {
    pub(crate) fn push(&mut self, block: ContentBlock, source: Range<usize>) {
        self.blocks.push(SourcedBlock::new(block, source));
    }

    /// Blocks with their source ranges, in input order.
    pub fn sourced(&self) -> &[SourcedBlock] {
        &self.blocks
    }

    /// Iterate over the blocks in input order.
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.blocks.iter().map(|b| &b.block)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if no block was produced.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Concatenate the source text behind every block.
    ///
    /// Equals `input` whenever every fence in `input` is well formed.
    pub fn reconstruct(&self, input: &str) -> String {
        self.blocks
            .iter()
            .filter_map(|b| input.get(b.source.clone()))
            .collect()
    }

    /// Drop the source ranges.
    pub fn into_blocks(self) -> Vec<ContentBlock> {
        self.blocks.into_iter().map(|b| b.block).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_markers() {
        assert_eq!(Alignment::from_marker(":--"), Alignment::Left);
        assert_eq!(Alignment::from_marker("---"), Alignment::Left);
        assert_eq!(Alignment::from_marker("--:"), Alignment::Right);
        assert_eq!(Alignment::from_marker(":-:"), Alignment::Center);
        assert_eq!(Alignment::from_marker(":"), Alignment::Center);
    }

    #[test]
    fn test_copy_text_only_for_code() {
        let code = ContentBlock::CodeBlock {
            language: "rust".into(),
            code: "fn main() {}".into(),
        };
        assert_eq!(code.copy_text(), Some("fn main() {}"));
        assert_eq!(ContentBlock::Blank.copy_text(), None);
    }
}
