//! SEARCH tokens and quoting.

use std::borrow::Cow;

/// One argument of a SEARCH command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchToken {
    /// Keyword or value, already quoted where needed.
    Atom(String),
    /// Numeric value such as a size in bytes.
    Number(u64),
}

impl SearchToken {
    /// Creates a keyword token.
    #[must_use]
    pub fn keyword(keyword: &str) -> Self {
        Self::Atom(keyword.to_string())
    }

    /// Creates a value token, quoting it if needed.
    #[must_use]
    pub fn value(value: &str) -> Self {
        Self::Atom(quote(value))
    }

    /// Returns the atom text, if this is an atom.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Atom(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Returns true if the token carries non-ASCII text.
    #[must_use]
    pub fn is_non_ascii(&self) -> bool {
        self.as_str().is_some_and(|s| !s.is_ascii())
    }

    /// Returns the token text with any quoting removed.
    #[must_use]
    pub fn unquoted(&self) -> Cow<'_, str> {
        match self {
            Self::Atom(s) => unquote(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl std::fmt::Display for SearchToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Atom(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for SearchToken {
    fn from(keyword: &str) -> Self {
        Self::keyword(keyword)
    }
}

impl From<u64> for SearchToken {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

/// Returns true if the value must be quoted.
fn needs_quoting(c: char) -> bool {
    matches!(c, ' ' | '@' | '(' | ')' | '"' | '[' | '\\' | ']')
}

/// Quotes a search value.
///
/// Surrounding double quotes are stripped first. The value is then wrapped in
/// quotes if it is empty or contains a space or one of `@()"[\]`, with inner
/// `"` and `\` escaped.
#[must_use]
pub fn quote(value: &str) -> String {
    let value = value.trim_matches('"');
    if !value.is_empty() && !value.contains(needs_quoting) {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn unquote(s: &str) -> Cow<'_, str> {
    let Some(inner) = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_stay_bare() {
        assert_eq!(quote("12345"), "12345");
        assert_eq!(quote("1-Jan-2023"), "1-Jan-2023");
        assert_eq!(quote("テスト"), "テスト");
    }

    #[test]
    fn special_characters_are_quoted() {
        assert_eq!(quote("test@example.com"), r#""test@example.com""#);
        assert_eq!(quote("hello world"), r#""hello world""#);
        assert_eq!(quote("[urgent]"), r#""[urgent]""#);
        assert_eq!(quote("(draft)"), r#""(draft)""#);
    }

    #[test]
    fn empty_value_is_quoted() {
        assert_eq!(quote(""), r#""""#);
        assert_eq!(quote(r#""""#), r#""""#);
        assert_eq!(SearchToken::value("").unquoted(), "");
    }

    #[test]
    fn outer_quotes_are_stripped_first() {
        assert_eq!(quote(r#""already""#), "already");
        assert_eq!(quote(r#""a b""#), r#""a b""#);
    }

    #[test]
    fn inner_quotes_and_backslashes_are_escaped() {
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi""#);
        assert_eq!(quote(r"C:\mail"), r#""C:\\mail""#);
    }

    #[test]
    fn unquoted_reverses_quote() {
        for value in ["plain", "a b", r"back\slash", "with \"inner\" quotes", "Привет мир"] {
            let token = SearchToken::value(value);
            assert_eq!(token.unquoted(), value);
        }
        assert_eq!(SearchToken::Number(42).unquoted(), "42");
    }

    #[test]
    fn non_ascii_detection() {
        assert!(SearchToken::value("テスト").is_non_ascii());
        assert!(!SearchToken::value("test").is_non_ascii());
        assert!(!SearchToken::Number(7).is_non_ascii());
    }
}
