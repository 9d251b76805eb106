//! Property-based invariant tests for the content parser.
//!
//! 1. Parsing never panics, on any input or any prefix of a reply.
//! 2. Source ranges tile the input for text without backticks.
//! 3. Source ranges tile the input when every fence is well formed.
//! 4. Re-parsing the plain-text rendering gives the same blocks.
//! 5. Headings are always level 1 to 3.
//! 6. Table rows keep the cell count of their source line.

use flywheel_chat::content::{parse, parse_document, split_cells, to_plain_text, ContentBlock};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Lines built from Markdown-ish pieces, including pipes and backticks.
fn markdownish_strategy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just("# ".to_string()),
        Just("## ".to_string()),
        Just("### ".to_string()),
        Just("- ".to_string()),
        Just("**".to_string()),
        Just("*".to_string()),
        Just("|".to_string()),
        Just("---".to_string()),
        Just(":".to_string()),
        Just("```".to_string()),
        Just("\n".to_string()),
        Just(" ".to_string()),
        "[a-z0-9é]{1,6}",
    ];
    prop::collection::vec(piece, 0..40).prop_map(|pieces| pieces.concat())
}

/// Text with no fences and no tables.
fn plain_line_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        "(# |## |### |  - |- |\\*\\*|\\*|<strong>|</strong>|<em>|</em>|<|>|[a-z é]{0,8})",
        0..8,
    )
    .prop_map(|pieces| pieces.concat())
}

fn plain_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(plain_line_strategy(), 0..8).prop_map(|lines| lines.join("\n"))
}

fn fenced_strategy() -> impl Strategy<Value = String> {
    (markdownish_strategy(), "[a-z]{0,4}", "[a-z(){};\n ]{0,20}").prop_map(|(text, lang, body)| {
        let text = text.replace('`', "'");
        format!("{text}```{lang}\n{body}```{text}")
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Parsing never panics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn parse_never_panics(text in any::<String>()) {
        let _ = parse(&text);
    }

    #[test]
    fn parse_never_panics_on_markdown(text in markdownish_strategy()) {
        let _ = parse(&text);
    }

    #[test]
    fn every_revealed_prefix_parses(text in markdownish_strategy()) {
        for (end, _) in text.char_indices() {
            let _ = parse(&text[..end]);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2-3. Source ranges tile the input
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reconstruct_without_backticks(text in markdownish_strategy()) {
        let text = text.replace('`', "'");
        let doc = parse_document(&text);
        prop_assert_eq!(doc.reconstruct(&text), text.clone(), "lossy parse of {:?}", text);
    }

    #[test]
    fn reconstruct_with_well_formed_fence(text in fenced_strategy()) {
        let doc = parse_document(&text);
        prop_assert_eq!(doc.reconstruct(&text), text.clone(), "lossy parse of {:?}", text);
        prop_assert!(
            doc.blocks().any(|b| matches!(b, ContentBlock::CodeBlock { .. })),
            "no code block in {:?}",
            text
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Plain-text rendering is stable
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn plain_text_reparse_is_identity(text in plain_text_strategy()) {
        // A lone blank line renders as "", which parses to nothing.
        prop_assume!(text.contains('\n') || !text.trim().is_empty());
        let once = parse(&text);
        let rendered = to_plain_text(&once);
        let twice = parse(&rendered);
        prop_assert_eq!(once, twice, "rendered as {:?}", rendered);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5-6. Block shape
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn heading_levels_in_range(text in markdownish_strategy()) {
        for block in parse(&text) {
            if let ContentBlock::Heading { level, .. } = block {
                prop_assert!((1..=3).contains(&level));
            }
        }
    }

    #[test]
    fn table_rows_keep_cell_count(cells in prop::collection::vec("[a-z]{0,3}", 1..5), rows in 1usize..4) {
        let line = format!("| {} |", cells.join(" | "));
        let rule = format!("|{}|", vec!["---"; cells.len()].join("|"));
        let mut text = format!("{line}\n{rule}\n");
        for _ in 0..rows {
            text.push_str(&line);
            text.push('\n');
        }

        let blocks = parse(&text);
        let Some(ContentBlock::Table { header_cells, rows: body, .. }) = blocks.first() else {
            return Err(TestCaseError::fail(format!("no table in {text:?}")));
        };
        prop_assert_eq!(header_cells.len(), split_cells(&line).len());
        prop_assert_eq!(body.len(), rows);
        prop_assert!(body.iter().all(|row| row == header_cells));
    }
}
