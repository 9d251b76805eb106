//! Content Parser: raw reply text to ordered, render-ready blocks.
//!
//! Parsing runs in three stages over a single forward scan:
//!
//! 1. **Fences**: [`FenceScanner`] splits the reply into fenced code and text.
//! 2. **Tables**: [`extract_tables`] pulls pipe tables out of each text segment.
//! 3. **Lines**: every remaining line is classified on its own.
//!
//! Parsing never fails. Malformed regions degrade to paragraphs or are
//! dropped, so a partially revealed reply can be parsed on every tick.
//!
//! # Example
//!
//! ```rust
//! use flywheel_chat::content::{parse, ContentBlock};
//!
//! let blocks = parse("a```js\ncode()\n```b");
//! assert_eq!(blocks.len(), 3);
//! assert!(matches!(&blocks[1], ContentBlock::CodeBlock { language, .. } if language == "js"));
//! ```

mod block;
mod fence;
mod inline;
mod line;
mod plain;
mod table;

pub use block::{Alignment, ContentBlock, Document, SourcedBlock, DEFAULT_CODE_LANGUAGE};
pub use fence::{FenceScanner, Segment, FENCE};
pub use inline::emphasize;
pub use line::classify;
pub use plain::to_plain_text;
pub use table::{extract_tables, split_cells, Piece};

/// Parse a reply into blocks.
pub fn parse(text: &str) -> Vec<ContentBlock> {
    parse_document(text).into_blocks()
}

/// Parse a reply into blocks that remember the input range they came from.
pub fn parse_document(text: &str) -> Document {
    let mut doc = Document::default();

    for segment in FenceScanner::new(text) {
        match segment {
            Segment::Code {
                language,
                code,
                source,
            } => doc.push(ContentBlock::CodeBlock { language, code }, source),
            Segment::Text(range) => parse_text(text, range, &mut doc),
            Segment::Malformed(range) => {
                tracing::debug!(start = range.start, end = range.end, "dropping malformed fence");
            }
        }
    }

    doc
}

fn parse_text(text: &str, range: std::ops::Range<usize>, doc: &mut Document) {
    let base = range.start;
    for piece in extract_tables(&text[range]) {
        match piece {
            Piece::Table(table, span) => doc.push(table, base + span.start..base + span.end),
            Piece::Text(span) => line::classify_lines(text, base + span.start..base + span.end, doc),
        }
    }
}
