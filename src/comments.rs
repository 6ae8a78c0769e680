use crate::lexer::{CommentSyntax, HASH_SYNTAX, LineOutcome, SLASH_SYNTAX, strip_line};
use crate::mime::Strategy;

const BLOCK_OPEN: &str = "<!--";
const BLOCK_CLOSE: &str = "-->";

/// Remove comments from a request body according to its declared MIME type.
///
/// - Empty or whitespace-only bodies are returned as-is.
/// - YAML, shell and JavaScript/TypeScript bodies are returned as-is.
/// - JSON and plain text lose `//` comments, XML loses `<!-- -->` blocks and
///   GraphQL loses `#` comments.
/// - A missing or unrecognised MIME type is treated as JSON.
///
/// Comment markers inside quoted strings are left alone, but only within a
/// single line: a string literal spanning lines is not tracked.
///
/// ```
/// use bodystrip::strip_comments_from_body;
///
/// let body = "{\n  // who\n  \"url\": \"https://example.com\" // link\n}";
/// assert_eq!(
///     strip_comments_from_body(body, Some("application/json")),
///     "{\n  \"url\": \"https://example.com\"\n}"
/// );
/// ```
pub fn strip_comments_from_body(text: &str, mime_type: Option<&str>) -> String {
    if text.trim().is_empty() {
        return text.to_owned();
    }
    strip_with_strategy(text, Strategy::classify(mime_type))
}

/// Remove `#` comments from a GraphQL document, skipping MIME classification.
pub fn strip_graphql_comments(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_owned();
    }
    strip_with_strategy(text, Strategy::GraphQl)
}

pub fn strip_with_strategy(text: &str, strategy: Strategy) -> String {
    match strategy {
        Strategy::PreserveNative => text.to_owned(),
        Strategy::Json | Strategy::PlainText => strip_line_comments(text, &SLASH_SYNTAX),
        Strategy::Xml => strip_block_comments(text),
        Strategy::GraphQl => strip_line_comments(text, &HASH_SYNTAX),
    }
}

/// Run the line lexer over every `\n`-separated line, then collapse blank runs.
pub fn strip_line_comments(text: &str, syntax: &CommentSyntax) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .filter_map(|line| match strip_line(line, syntax) {
            LineOutcome::Dropped => None,
            LineOutcome::Kept(rest) => Some(rest),
        })
        .collect();

    collapse_blank_lines(&lines)
}

/// Join `lines` with `\n`, dropping every blank line that directly follows
/// another blank line. The first line is always kept.
///
/// Adjacency is checked against the input slice, not the filtered output, so
/// this cannot tell a blank left by a removed comment from one that was there
/// for spacing.
pub fn collapse_blank_lines(lines: &[&str]) -> String {
    let is_blank = |line: &str| line.trim().is_empty();

    let kept: Vec<&str> = lines
        .iter()
        .enumerate()
        .filter(|&(idx, &line)| idx == 0 || !is_blank(line) || !is_blank(lines[idx - 1]))
        .map(|(_, &line)| line)
        .collect();

    kept.join("\n")
}

/// Delete every `<!-- ... -->` span, pairing each opener with the nearest
/// closer after it. Spans may cross lines; everything outside them, including
/// the newlines around a removed comment, is kept. An opener with no closer is
/// left in place.
pub fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(BLOCK_OPEN) {
        let after_open = &rest[start + BLOCK_OPEN.len()..];
        let Some(end) = after_open.find(BLOCK_CLOSE) else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &after_open[end + BLOCK_CLOSE.len()..];
    }

    out.push_str(rest);
    out
}
