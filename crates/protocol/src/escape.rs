//! JSON string escaping
//!
//! Only the characters that would break a quoted JSON string, plus `/`,
//! are escaped. Everything else, including non-ASCII text, is copied
//! through unchanged.

/// Append `value` to `out`, escaping JSON special characters
pub fn escape_into(out: &mut String, value: &str) {
    out.reserve(value.len());
    for ch in value.chars() {
        match ch {
            '\u{8}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{c}' => out.push_str("\\f"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            other => out.push(other),
        }
    }
}

/// Escape `value` into a new string
#[inline]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    escape_into(&mut out, value);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape("hello world"), "hello world");
    }

    #[test]
    fn test_escape_url_slashes() {
        assert_eq!(
            escape("http://foo.bar/?baz=qux#quux"),
            r"http:\/\/foo.bar\/?baz=qux#quux"
        );
    }

    #[test]
    fn test_escape_control_characters() {
        assert_eq!(escape("a\nb\rc\td"), r"a\nb\rc\td");
        assert_eq!(escape("\u{8}\u{c}"), r"\b\f");
    }

    #[test]
    fn test_escape_quotes_and_backslash() {
        assert_eq!(escape(r#"say "hi" \o/"#), r#"say \"hi\" \\o\/"#);
    }

    #[test]
    fn test_escape_passes_non_ascii_through() {
        assert_eq!(escape("température ✓"), "température ✓");
    }

    #[test]
    fn test_escape_leaves_other_control_bytes() {
        assert_eq!(escape("\u{1}"), "\u{1}");
    }
}
