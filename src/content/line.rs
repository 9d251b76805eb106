//! Line classification for text outside fences and tables.
//!
//! Every line is classified on its own. A list item does not know about its
//! siblings and a paragraph never spans lines.

use super::block::{ContentBlock, Document};
use super::inline::emphasize;

/// Heading markers and their levels.
const HEADINGS: [(&str, u8); 3] = [("# ", 1), ("## ", 2), ("### ", 3)];

/// Classify a single line.
pub fn classify(line: &str) -> ContentBlock {
    for (marker, level) in HEADINGS {
        if let Some(text) = line.strip_prefix(marker) {
            return ContentBlock::Heading {
                level,
                text: text.to_string(),
            };
        }
    }

    let trimmed = line.trim();
    if trimmed.starts_with("- ") {
        // Everything after the marker, trailing whitespace included.
        let marker = line.len() - line.trim_start().len();
        return ContentBlock::ListItem {
            text: line[marker + 2..].to_string(),
        };
    }
    if trimmed.is_empty() {
        return ContentBlock::Blank;
    }

    ContentBlock::Paragraph {
        html_inline_text: emphasize(line),
    }
}

/// Classify every line of `text[range]`, recording each line's source range
/// with its terminating newline.
pub fn classify_lines(text: &str, range: std::ops::Range<usize>, doc: &mut Document) {
    let fragment = &text[range.clone()];
    let mut start = range.start;

    for line in fragment.split('\n') {
        let end = start + line.len();
        let next = if end < range.end { end + 1 } else { end };
        doc.push(classify(line), start..next);
        start = next;
    }
}
