//! Pipe table extraction for the text between fences.
//!
//! A table is a header row, an alignment row and at least one data row, each
//! ending in `\n`. The header starts at the first `|` on its line; whatever
//! precedes it stays text. The alignment and data rows start their lines.
//! Everything else in the fragment is handed back untouched for line
//! classification.

use super::block::{Alignment, ContentBlock};
use std::ops::Range;

/// A piece of a text fragment after table extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Text to classify line by line.
    Text(Range<usize>),
    /// A recognised table and the lines it spans.
    Table(ContentBlock, Range<usize>),
}

/// One line of the fragment.
#[derive(Debug, Clone, Copy)]
struct Line {
    /// Start of the line.
    start: usize,
    /// End of the line content, before `\n`.
    end: usize,
    /// Start of the following line.
    next: usize,
}

impl Line {
    const fn terminated(&self) -> bool {
        self.next > self.end
    }
}

fn lines(text: &str) -> Vec<Line> {
    let mut out = Vec::new();
    let mut start = 0;
    for content in text.split('\n') {
        let end = start + content.len();
        let next = if end < text.len() { end + 1 } else { end };
        out.push(Line { start, end, next });
        start = next;
    }
    out
}

/// A pipe-delimited line: `|`, at least one character, `|`, nothing around.
fn is_row(line: &str) -> bool {
    line.len() >= 3 && line.starts_with('|') && line.ends_with('|')
}

/// Offset of the header row within `line`: its first `|`, if a row runs from
/// there to the end of the line.
fn header_offset(line: &str) -> Option<usize> {
    let offset = line.find('|')?;
    is_row(&line[offset..]).then_some(offset)
}

/// `|` followed by one or more `-`/`:` runs each closed by `|`, unpadded.
fn is_alignment_row(line: &str) -> bool {
    line.strip_prefix('|')
        .and_then(|rest| rest.strip_suffix('|'))
        .is_some_and(|inner| {
            inner
                .split('|')
                .all(|cell| !cell.is_empty() && cell.chars().all(|c| c == '-' || c == ':'))
        })
}

/// Split a row on `|`, dropping the fragment before the first pipe and after
/// the last one. Interior empty cells are kept so cells stay positional.
pub fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn build_table(text: &str, header: Line, alignment: Line, rows: &[Line]) -> ContentBlock {
    let row_text = |line: Line| &text[line.start..line.end];
    ContentBlock::Table {
        header_cells: split_cells(row_text(header)),
        column_alignment: split_cells(row_text(alignment))
            .iter()
            .map(|cell| Alignment::from_marker(cell))
            .collect(),
        rows: rows.iter().map(|&line| split_cells(row_text(line))).collect(),
    }
}

/// Split `text` into tables and the text around them, in order.
pub fn extract_tables(text: &str) -> Vec<Piece> {
    let lines = lines(text);
    let line_text = |line: &Line| &text[line.start..line.end];
    let is_data_row = |line: &Line| line.terminated() && is_row(line_text(line));

    let mut pieces = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let header = header_offset(line_text(&line))
            .filter(|_| line.terminated())
            .filter(|_| {
                lines
                    .get(i + 1)
                    .is_some_and(|a| a.terminated() && is_alignment_row(line_text(a)))
            })
            .filter(|_| lines.get(i + 2).is_some_and(is_data_row))
            .map(|offset| Line {
                start: line.start + offset,
                ..line
            });

        let Some(header) = header else {
            i += 1;
            continue;
        };

        let mut end = i + 2;
        while end < lines.len() && is_data_row(&lines[end]) {
            end += 1;
        }

        if header.start > text_start {
            pieces.push(Piece::Text(text_start..header.start));
        }
        let span = header.start..lines[end - 1].next;
        let table = build_table(text, header, lines[i + 1], &lines[i + 2..end]);
        pieces.push(Piece::Table(table, span.clone()));

        // Resume strictly after the last consumed row.
        text_start = span.end;
        i = end;
    }

    if text_start < text.len() {
        pieces.push(Piece::Text(text_start..text.len()));
    }
    pieces
}
