//! Inline emphasis: `**bold**` and `*italic*` to inline markup.

/// Markup pair for bold text.
const STRONG: (&str, &str) = ("<strong>", "</strong>");
/// Markup pair for italic text.
const EM: (&str, &str) = ("<em>", "</em>");

/// Substitute emphasis markers in a single line.
///
/// Bold runs first so `**x**` is never read as two empty italics. Both passes
/// pair each marker with the nearest following one.
pub fn emphasize(line: &str) -> String {
    let bold = wrap_pairs(line, "**", STRONG);
    wrap_pairs(&bold, "*", EM)
}

/// Turn emphasis markup back into asterisks.
///
/// Markup that was already in the line, rather than produced by
/// [`emphasize`], is returned unchanged. Output of [`emphasize`] holds at most
/// one `*`, so it is always its own source.
pub fn strip_emphasis(markup: &str) -> String {
    let source = markup
        .replace(STRONG.0, "**")
        .replace(STRONG.1, "**")
        .replace(EM.0, "*")
        .replace(EM.1, "*");
    if emphasize(&source) == markup {
        source
    } else {
        markup.to_owned()
    }
}

fn wrap_pairs(text: &str, marker: &str, (open, close): (&str, &str)) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(marker) {
        let after = &rest[start + marker.len()..];
        let Some(end) = after.find(marker) else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(open);
        out.push_str(&after[..end]);
        out.push_str(close);
        rest = &after[end + marker.len()..];
    }

    out.push_str(rest);
    out
}
