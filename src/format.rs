//! Identifier and literal formatting.
//!
//! Every statement builder quotes identifiers and string literals through
//! these helpers so that escaping behavior stays in one place.

/// Backtick-wraps an identifier (table or column name).
///
/// The name is wrapped verbatim; embedded backticks are not escaped. This is a
/// documented limitation of the statement grammar, not something to silently
/// repair here.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name)
}

/// Escapes a string for embedding in a single-quoted SQL literal.
///
/// Any pre-escaped `\'` sequence is first unescaped to a bare quote, then
/// every bare quote is escaped with a backslash. The result always carries
/// exactly one level of escaping, whether or not the input arrived
/// pre-escaped, so feeding a formatter output back in does not double-escape.
#[must_use]
pub fn escape_literal(s: &str) -> String {
    s.replace("\\'", "'").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("id"), "`id`");
        assert_eq!(quote_ident("weird name"), "`weird name`");
    }

    #[test]
    fn test_escape_plain_quote() {
        assert_eq!(escape_literal("it's"), "it\\'s");
    }

    #[test]
    fn test_escape_is_single_level() {
        // An already-escaped input yields the same single level of escaping.
        let once = escape_literal("it's");
        assert_eq!(escape_literal(&once), once);
    }

    #[test]
    fn test_escape_no_quotes() {
        assert_eq!(escape_literal("plain comment"), "plain comment");
    }
}
