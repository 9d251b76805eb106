//! Fence scanner: first pass over a reply, separating fenced code from text.
//!
//! The scanner walks the input once. Every step consumes at least one byte,
//! so iteration always terminates and segments come out in input order.

use super::block::DEFAULT_CODE_LANGUAGE;
use std::ops::Range;

/// Fence marker opening and closing a code block.
pub const FENCE: &str = "```";

/// A top-level piece of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A well-formed fenced code block.
    Code {
        /// Language tag, or the default when the fence has none.
        language: String,
        /// Trimmed body.
        code: String,
        /// Byte range of the whole fence, markers included.
        source: Range<usize>,
    },
    /// Text outside any fence.
    Text(Range<usize>),
    /// A fence-looking region that does not have the code block shape.
    Malformed(Range<usize>),
}

/// Iterator over the [`Segment`]s of a reply.
#[derive(Debug, Clone)]
pub struct FenceScanner<'a> {
    input: &'a str,
    pos: usize,
    /// A fence found while emitting the text in front of it.
    pending: Option<Range<usize>>,
}

impl<'a> FenceScanner<'a> {
    /// Start scanning `input` from the beginning.
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            pending: None,
        }
    }

    /// Classify the text between two fence boundaries.
    fn text_segment(&self, range: Range<usize>) -> Segment {
        // An unterminated opener leaves the rest of the reply as text that
        // begins with a marker. It is dropped rather than shown half-parsed.
        if self.input[range.clone()].starts_with(FENCE) {
            Segment::Malformed(range)
        } else {
            Segment::Text(range)
        }
    }

    fn fence_segment(&self, range: Range<usize>) -> Segment {
        match parse_fence(&self.input[range.clone()]) {
            Some((language, code)) => Segment::Code {
                language: language.unwrap_or(DEFAULT_CODE_LANGUAGE).to_string(),
                code: code.trim().to_string(),
                source: range,
            },
            None => Segment::Malformed(range),
        }
    }
}

impl Iterator for FenceScanner<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if let Some(fence) = self.pending.take() {
            self.pos = fence.end;
            return Some(self.fence_segment(fence));
        }

        if self.pos >= self.input.len() {
            return None;
        }

        let rest = &self.input[self.pos..];
        let fence = rest.find(FENCE).and_then(|open| {
            let body = open + FENCE.len();
            rest[body..]
                .find(FENCE)
                .map(|close| self.pos + open..self.pos + body + close + FENCE.len())
        });

        let Some(fence) = fence else {
            let tail = self.pos..self.input.len();
            self.pos = self.input.len();
            return Some(self.text_segment(tail));
        };

        if fence.start > self.pos {
            let text = self.pos..fence.start;
            self.pending = Some(fence);
            return Some(self.text_segment(text));
        }

        self.pos = fence.end;
        Some(self.fence_segment(fence))
    }
}

/// Match a fence against the code block shape: marker, optional word-character
/// language tag, newline, body, marker.
///
/// Any marker inside the leading backtick run may serve as the opener, so an
/// opener of four backticks still yields a block.
fn parse_fence(fence: &str) -> Option<(Option<&str>, &str)> {
    let run = fence.bytes().take_while(|&b| b == b'`').count();

    (0..=run.saturating_sub(FENCE.len())).find_map(|offset| {
        let after = &fence[offset + FENCE.len()..];
        let tag_len = after
            .bytes()
            .take_while(|&b| b.is_ascii_alphanumeric() || b == b'_')
            .count();
        let body = after[tag_len..].strip_prefix('\n')?;
        let close = body.find(FENCE)?;
        let language = (tag_len > 0).then(|| &after[..tag_len]);
        Some((language, &body[..close]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<Segment> {
        FenceScanner::new(input).collect()
    }

    #[test]
    fn test_text_around_fence() {
        let segments = collect("a```js\ncode()\n```b");
        assert_eq!(
            segments,
            vec![
                Segment::Text(0..1),
                Segment::Code {
                    language: "js".into(),
                    code: "code()".into(),
                    source: 1..17,
                },
                Segment::Text(17..18),
            ]
        );
    }

    #[test]
    fn test_default_language() {
        let segments = collect("```\nlet x = 1;\n```");
        assert!(matches!(
            &segments[..],
            [Segment::Code { language, code, .. }] if language == "javascript" && code == "let x = 1;"
        ));
    }

    #[test]
    fn test_adjacent_fences() {
        let segments = collect("```a\n1```\n```b\n2```");
        assert_eq!(segments.len(), 3);
        assert!(matches!(segments[1], Segment::Text(_)));
    }

    #[test]
    fn test_unterminated_fence_is_malformed() {
        let segments = collect("```rust\nfn main() {");
        assert_eq!(segments, vec![Segment::Malformed(0..19)]);
    }

    #[test]
    fn test_unterminated_fence_after_text_stays_text() {
        let segments = collect("intro ```rust\nfn");
        assert_eq!(segments, vec![Segment::Text(0..16)]);
    }

    #[test]
    fn test_fence_without_newline_is_malformed() {
        let segments = collect("```inline```");
        assert_eq!(segments, vec![Segment::Malformed(0..12)]);
    }

    #[test]
    fn test_tag_with_symbols_is_malformed() {
        let segments = collect("```c++\nint x;\n```");
        assert!(matches!(segments[..], [Segment::Malformed(_)]));
    }

    #[test]
    fn test_extra_backtick_in_opener() {
        let segments = collect("````\nx```");
        assert!(matches!(
            &segments[..],
            [Segment::Code { code, .. }] if code == "x"
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(collect("").is_empty());
    }
}
