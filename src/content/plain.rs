//! Render blocks back to Markdown source.
//!
//! Used for copying a whole reply and for checking that classification is
//! stable: re-parsing the output of [`to_plain_text`] yields the same blocks
//! for text without fences or tables.

use super::block::{Alignment, ContentBlock};
use super::inline::strip_emphasis;
use unicode_width::UnicodeWidthStr;

/// Narrowest cell a rendered table uses.
const MIN_COLUMN_WIDTH: usize = 3;

/// Render blocks as Markdown, one block per line group.
pub fn to_plain_text<'a>(blocks: impl IntoIterator<Item = &'a ContentBlock>) -> String {
    let lines: Vec<String> = blocks.into_iter().map(render_block).collect();
    lines.join("\n")
}

fn render_block(block: &ContentBlock) -> String {
    match block {
        ContentBlock::CodeBlock { language, code } => format!("```{language}\n{code}\n```"),
        ContentBlock::Table {
            header_cells,
            column_alignment,
            rows,
        } => render_table(header_cells, column_alignment, rows),
        ContentBlock::Heading { level, text } => {
            format!("{} {text}", "#".repeat(usize::from(*level)))
        }
        ContentBlock::ListItem { text } => format!("- {text}"),
        ContentBlock::Paragraph { html_inline_text } => strip_emphasis(html_inline_text),
        ContentBlock::Blank => String::new(),
    }
}

fn render_table(header: &[String], alignment: &[Alignment], rows: &[Vec<String>]) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain([header.len(), alignment.len()])
        .max()
        .unwrap_or(0);

    let mut widths = vec![MIN_COLUMN_WIDTH; columns];
    for row in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let align_at = |i: usize| alignment.get(i).copied().unwrap_or_default();
    let render_row = |cells: &[String]| {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let cell = cells.get(i).map_or("", String::as_str);
                pad(cell, width, align_at(i))
            })
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    // The rule spans the cell padding too; an alignment row takes no spaces.
    let rule: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, &width)| match align_at(i) {
            Alignment::Left => "-".repeat(width + 2),
            Alignment::Center => format!(":{}:", "-".repeat(width)),
            Alignment::Right => format!("{}:", "-".repeat(width + 1)),
        })
        .collect();

    let mut out = vec![render_row(header), format!("|{}|", rule.join("|"))];
    out.extend(rows.iter().map(|row| render_row(row.as_slice())));
    out.join("\n")
}

fn pad(cell: &str, width: usize, alignment: Alignment) -> String {
    let fill = width.saturating_sub(cell.width());
    let (left, right) = match alignment {
        Alignment::Left => (0, fill),
        Alignment::Right => (fill, 0),
        Alignment::Center => (fill / 2, fill - fill / 2),
    };
    format!("{}{cell}{}", " ".repeat(left), " ".repeat(right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lines() {
        let blocks = [
            ContentBlock::Heading {
                level: 2,
                text: "Plan".into(),
            },
            ContentBlock::ListItem {
                text: "first".into(),
            },
            ContentBlock::Blank,
            ContentBlock::Paragraph {
                html_inline_text: "<strong>done</strong>".into(),
            },
        ];
        assert_eq!(to_plain_text(&blocks), "## Plan\n- first\n\n**done**");
    }

    #[test]
    fn test_render_code_block() {
        let blocks = [ContentBlock::CodeBlock {
            language: "rust".into(),
            code: "let x = 1;".into(),
        }];
        assert_eq!(to_plain_text(&blocks), "```rust\nlet x = 1;\n```");
    }

    #[test]
    fn test_render_table_padding() {
        let blocks = [ContentBlock::Table {
            header_cells: vec!["Name".into(), "N".into()],
            column_alignment: vec![Alignment::Left, Alignment::Right],
            rows: vec![vec!["ab".into(), "7".into()]],
        }];
        assert_eq!(
            to_plain_text(&blocks),
            "| Name |   N |\n|------|----:|\n| ab   |   7 |"
        );
    }

    #[test]
    fn test_render_table_wide_chars() {
        let blocks = [ContentBlock::Table {
            header_cells: vec!["名前".into()],
            column_alignment: vec![Alignment::Center],
            rows: vec![vec!["x".into()]],
        }];
        assert_eq!(to_plain_text(&blocks), "| 名前 |\n|:----:|\n|  x   |");
    }

    #[test]
    fn test_rendered_table_parses_back() {
        let table = ContentBlock::Table {
            header_cells: vec!["k".into(), "v".into()],
            column_alignment: vec![Alignment::Center, Alignment::Right],
            rows: vec![vec!["a".into(), "1".into()], vec!["bb".into(), "22".into()]],
        };
        let rendered = to_plain_text([&table]) + "\n";
        assert_eq!(crate::content::parse(&rendered), vec![table]);
    }
}
