//! Line-oriented comment lexer.
//!
//! Each line is scanned on its own: string state never carries over a line
//! break, so a literal that spans lines is not recognised as one.

/// A line-comment marker plus the characters that open and close string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    pub marker: &'static str,
    pub quotes: &'static [u8],
}

/// `//` comments, `"` and `'` strings (JSON and plain text bodies).
pub const SLASH_SYNTAX: CommentSyntax = CommentSyntax {
    marker: "//",
    quotes: b"\"'",
};

/// `#` comments, `"` strings (GraphQL documents).
pub const HASH_SYNTAX: CommentSyntax = CommentSyntax {
    marker: "#",
    quotes: b"\"",
};

/// Result of lexing a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome<'a> {
    /// The whole line was a comment.
    Dropped,
    /// What is left of the line. Empty if only whitespace preceded the comment.
    Kept(&'a str),
}

/// Strip a trailing comment from `line`.
///
/// Lines whose first non-blank characters are the marker are dropped. Otherwise
/// the line is cut at the first marker found outside a string literal and
/// right-trimmed; a line without such a marker comes back untouched, trailing
/// whitespace included. A dangling comma left before a removed comment is kept.
pub fn strip_line<'a>(line: &'a str, syntax: &CommentSyntax) -> LineOutcome<'a> {
    if line.trim().starts_with(syntax.marker) {
        return LineOutcome::Dropped;
    }

    match find_comment_start(line, syntax) {
        Some(idx) => LineOutcome::Kept(line[..idx].trim_end()),
        None => LineOutcome::Kept(line),
    }
}

/// Byte offset of the first marker that is not inside a string literal.
///
/// Markers and quotes are ASCII, so scanning bytes never splits a UTF-8
/// sequence and every returned offset is a char boundary.
pub fn find_comment_start(line: &str, syntax: &CommentSyntax) -> Option<usize> {
    let bytes = line.as_bytes();
    let marker = syntax.marker.as_bytes();

    // Set iff we are inside a string; holds the quote that opened it.
    let mut open_quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match open_quote {
            Some(quote) => {
                if b == b'\\' {
                    // Escape pair; may step past the end on a trailing backslash.
                    i += 2;
                    continue;
                }
                if b == quote {
                    open_quote = None;
                }
            }
            None => {
                if syntax.quotes.contains(&b) {
                    open_quote = Some(b);
                } else if bytes[i..].starts_with(marker) {
                    return Some(i);
                }
            }
        }
        i += 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_line_comments_are_dropped() {
        assert_eq!(strip_line("// note", &SLASH_SYNTAX), LineOutcome::Dropped);
        assert_eq!(
            strip_line("    // indented", &SLASH_SYNTAX),
            LineOutcome::Dropped
        );
        assert_eq!(strip_line("\t# query", &HASH_SYNTAX), LineOutcome::Dropped);
    }

    #[test]
    fn inline_comment_is_cut_and_right_trimmed() {
        assert_eq!(
            strip_line("  \"age\": 30 // This is the age", &SLASH_SYNTAX),
            LineOutcome::Kept("  \"age\": 30")
        );
    }

    #[test]
    fn trailing_comma_before_comment_is_left_alone() {
        assert_eq!(
            strip_line("  \"a\": 1, // first", &SLASH_SYNTAX),
            LineOutcome::Kept("  \"a\": 1,")
        );
    }

    #[test]
    fn marker_inside_double_quotes_is_ignored() {
        let line = r#"{"url": "https://example.com/path"}"#;
        assert_eq!(strip_line(line, &SLASH_SYNTAX), LineOutcome::Kept(line));
    }

    #[test]
    fn marker_inside_single_quotes_is_ignored_for_slash_syntax() {
        let line = "{'url': 'http://x.test'} // trailing";
        assert_eq!(
            strip_line(line, &SLASH_SYNTAX),
            LineOutcome::Kept("{'url': 'http://x.test'}")
        );
    }

    #[test]
    fn single_quotes_do_not_open_strings_for_hash_syntax() {
        let line = "  field(arg: 'a#b')";
        assert_eq!(
            strip_line(line, &HASH_SYNTAX),
            LineOutcome::Kept("  field(arg: 'a")
        );
    }

    #[test]
    fn other_quote_kind_does_not_close_string() {
        let line = r#"{"msg": "it's // fine"}"#;
        assert_eq!(find_comment_start(line, &SLASH_SYNTAX), None);
    }

    #[test]
    fn escaped_quote_keeps_string_open() {
        let line = r#"{"q": "say \"//hi\""} // c"#;
        let idx = find_comment_start(line, &SLASH_SYNTAX);
        assert_eq!(idx, Some(line.len() - 4));
    }

    #[test]
    fn backslash_outside_string_is_plain_text() {
        assert_eq!(find_comment_start(r"a \// b", &SLASH_SYNTAX), Some(3));
    }

    #[test]
    fn trailing_backslash_in_open_string_does_not_panic() {
        assert_eq!(find_comment_start("\"abc\\", &SLASH_SYNTAX), None);
        assert_eq!(find_comment_start("\"\\", &HASH_SYNTAX), None);
    }

    #[test]
    fn unterminated_string_hides_rest_of_line() {
        let line = r#"{"open": "never closed // still string"#;
        assert_eq!(strip_line(line, &SLASH_SYNTAX), LineOutcome::Kept(line));
    }

    #[test]
    fn line_without_comment_keeps_trailing_whitespace() {
        assert_eq!(
            strip_line("  \"k\": 1   ", &SLASH_SYNTAX),
            LineOutcome::Kept("  \"k\": 1   ")
        );
    }

    #[test]
    fn multibyte_text_before_comment() {
        assert_eq!(
            strip_line("{\"名前\": \"ジョン\"} // 名前", &SLASH_SYNTAX),
            LineOutcome::Kept("{\"名前\": \"ジョン\"}")
        );
    }
}
