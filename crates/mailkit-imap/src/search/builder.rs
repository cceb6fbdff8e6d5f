//! Fluent SEARCH query builder.

use super::{DateValue, SearchToken, SizeValue};
use crate::{Error, Result};

/// Charset announced for non-ASCII search values.
pub const UTF8_CHARSET: &str = "UTF-8";

/// Builds the criteria of a SEARCH command.
///
/// Every method adds one search key; all keys must match (there is no OR or
/// NOT). String values are quoted as they are added. Date and size keys
/// validate their argument and return a `Result`.
///
/// # Example
///
/// ```
/// use mailkit_imap::search::QueryBuilder;
///
/// let query = QueryBuilder::new()
///     .sender("boss@example.com")
///     .unseen()
///     .since("1-Jan-2024")?
///     .larger("1MB")?
///     .query()?;
///
/// assert_eq!(
///     query.to_string(),
///     r#"FROM "boss@example.com" UNSEEN SINCE 1-Jan-2024 LARGER 1000000"#
/// );
/// # Ok::<(), mailkit_imap::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct QueryBuilder {
    tokens: Vec<SearchToken>,
}

impl QueryBuilder {
    /// Creates an empty builder.
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Returns the tokens accumulated so far, without charset handling.
    #[must_use]
    pub fn tokens(&self) -> &[SearchToken] {
        &self.tokens
    }

    fn flag(mut self, keyword: &str) -> Self {
        self.tokens.push(SearchToken::keyword(keyword));
        self
    }

    fn keyed(mut self, keyword: &str, value: &str) -> Self {
        self.tokens.push(SearchToken::keyword(keyword));
        self.tokens.push(SearchToken::value(value));
        self
    }

    fn dated(mut self, keyword: &str, date: &impl DateValue) -> Result<Self> {
        let date = date.to_search_date()?;
        self.tokens.push(SearchToken::keyword(keyword));
        self.tokens.push(SearchToken::value(&date));
        Ok(self)
    }

    fn sized(mut self, keyword: &str, size: &impl SizeValue) -> Result<Self> {
        let bytes = size.to_bytes()?;
        self.tokens.push(SearchToken::keyword(keyword));
        self.tokens.push(SearchToken::Number(bytes));
        Ok(self)
    }

    /// Messages that contain the string in the FROM field.
    pub fn sender(self, what: &str) -> Self {
        self.keyed("FROM", what)
    }

    /// Alias of [`QueryBuilder::sender`].
    pub fn from(self, what: &str) -> Self {
        self.sender(what)
    }

    /// Messages with the `\Answered` flag set.
    pub fn answered(self) -> Self {
        self.flag("ANSWERED")
    }

    /// Messages that contain the string in the BCC field.
    pub fn bcc(self, what: &str) -> Self {
        self.keyed("BCC", what)
    }

    /// Messages whose internal date is earlier than the date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongDateFormat`] if the date is not `D-Mon-YYYY`.
    pub fn before(self, date: impl DateValue) -> Result<Self> {
        self.dated("BEFORE", &date)
    }

    /// Messages that contain the string in the body.
    pub fn body(self, what: &str) -> Self {
        self.keyed("BODY", what)
    }

    /// Messages that contain the string in the CC field.
    pub fn cc(self, what: &str) -> Self {
        self.keyed("CC", what)
    }

    /// Messages with the `\Deleted` flag set.
    pub fn deleted(self) -> Self {
        self.flag("DELETED")
    }

    /// Messages with the `\Draft` flag set.
    pub fn draft(self) -> Self {
        self.flag("DRAFT")
    }

    /// Messages with the `\Flagged` flag set.
    pub fn flagged(self) -> Self {
        self.flag("FLAGGED")
    }

    /// Messages whose header field contains the string.
    pub fn header(mut self, name: &str, what: &str) -> Self {
        self.tokens.push(SearchToken::keyword("HEADER"));
        self.tokens.push(SearchToken::value(name));
        self.tokens.push(SearchToken::value(what));
        self
    }

    /// Messages with the keyword flag set.
    pub fn keyword(self, what: &str) -> Self {
        self.keyed("KEYWORD", what)
    }

    /// Messages larger than the size. Accepts bytes or strings such as `"5 MB"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeParsing`] if the size cannot be parsed.
    pub fn larger(self, size: impl SizeValue) -> Result<Self> {
        self.sized("LARGER", &size)
    }

    /// Messages with `\Recent` set but not `\Seen`.
    pub fn new_messages(self) -> Self {
        self.flag("NEW")
    }

    /// Messages without the `\Recent` flag.
    pub fn old(self) -> Self {
        self.flag("OLD")
    }

    /// Messages whose internal date is within the date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongDateFormat`] if the date is not `D-Mon-YYYY`.
    pub fn on(self, date: impl DateValue) -> Result<Self> {
        self.dated("ON", &date)
    }

    /// Messages with the `\Recent` flag set.
    pub fn recent(self) -> Self {
        self.flag("RECENT")
    }

    /// Messages with the `\Seen` flag set.
    pub fn seen(self) -> Self {
        self.flag("SEEN")
    }

    /// Messages whose Date: header is earlier than the date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongDateFormat`] if the date is not `D-Mon-YYYY`.
    pub fn sent_before(self, date: impl DateValue) -> Result<Self> {
        self.dated("SENTBEFORE", &date)
    }

    /// Messages whose Date: header is within the date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongDateFormat`] if the date is not `D-Mon-YYYY`.
    pub fn sent_on(self, date: impl DateValue) -> Result<Self> {
        self.dated("SENTON", &date)
    }

    /// Messages whose Date: header is within or later than the date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongDateFormat`] if the date is not `D-Mon-YYYY`.
    pub fn sent_since(self, date: impl DateValue) -> Result<Self> {
        self.dated("SENTSINCE", &date)
    }

    /// Messages whose internal date is within or later than the date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongDateFormat`] if the date is not `D-Mon-YYYY`.
    pub fn since(self, date: impl DateValue) -> Result<Self> {
        self.dated("SINCE", &date)
    }

    /// Messages smaller than the size. Accepts bytes or strings such as `"5 MB"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeParsing`] if the size cannot be parsed.
    pub fn smaller(self, size: impl SizeValue) -> Result<Self> {
        self.sized("SMALLER", &size)
    }

    /// Messages that contain the string in the SUBJECT field.
    pub fn subject(self, what: &str) -> Self {
        self.keyed("SUBJECT", what)
    }

    /// Messages that contain the string in the header or body.
    pub fn text(self, what: &str) -> Self {
        self.keyed("TEXT", what)
    }

    /// Messages that contain the string in the TO field.
    pub fn recipient(self, what: &str) -> Self {
        self.keyed("TO", what)
    }

    /// Alias of [`QueryBuilder::recipient`].
    pub fn to(self, what: &str) -> Self {
        self.recipient(what)
    }

    /// Messages whose UID is in the set, e.g. `"4:7,9"`.
    pub fn uid(self, set: &str) -> Self {
        self.keyed("UID", set)
    }

    /// Messages without the `\Answered` flag.
    pub fn unanswered(self) -> Self {
        self.flag("UNANSWERED")
    }

    /// Messages without the `\Deleted` flag.
    pub fn undeleted(self) -> Self {
        self.flag("UNDELETED")
    }

    /// Messages without the `\Draft` flag.
    pub fn undraft(self) -> Self {
        self.flag("UNDRAFT")
    }

    /// Messages without the `\Flagged` flag.
    pub fn unflagged(self) -> Self {
        self.flag("UNFLAGGED")
    }

    /// Messages without the keyword flag.
    pub fn unkeyword(self, what: &str) -> Self {
        self.keyed("UNKEYWORD", what)
    }

    /// Messages without the `\Seen` flag.
    pub fn unseen(self) -> Self {
        self.flag("UNSEEN")
    }

    /// Finalizes the criteria into a query.
    ///
    /// Non-ASCII values are counted afresh on every call. A single one gets a
    /// `CHARSET UTF-8` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SearchSyntaxNotSupported`] if more than one distinct
    /// value contains non-ASCII characters.
    pub fn query(&self) -> Result<SearchQuery> {
        let mut non_ascii: Vec<&str> = Vec::new();
        for value in self.tokens.iter().filter_map(SearchToken::as_str) {
            if !value.is_ascii() && !non_ascii.contains(&value) {
                non_ascii.push(value);
            }
        }

        match non_ascii.as_slice() {
            [] => Ok(SearchQuery {
                tokens: self.tokens.clone(),
                charset: None,
                non_ascii: None,
            }),
            [value] => {
                let starts_with_charset = self
                    .tokens
                    .first()
                    .and_then(SearchToken::as_str)
                    .is_some_and(|t| t.eq_ignore_ascii_case("CHARSET"));

                let mut tokens = Vec::with_capacity(self.tokens.len() + 2);
                if !starts_with_charset {
                    tokens.push(SearchToken::keyword("CHARSET"));
                    tokens.push(SearchToken::keyword(UTF8_CHARSET));
                }
                tokens.extend(self.tokens.iter().cloned());

                Ok(SearchQuery {
                    tokens,
                    charset: Some(UTF8_CHARSET.to_string()),
                    non_ascii: Some((*value).to_string()),
                })
            }
            values => Err(Error::SearchSyntaxNotSupported {
                values: values.iter().map(|v| (*v).to_string()).collect(),
            }),
        }
    }
}

/// Finalized SEARCH criteria, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    tokens: Vec<SearchToken>,
    charset: Option<String>,
    non_ascii: Option<String>,
}

impl SearchQuery {
    /// The query matching every message.
    #[must_use]
    pub fn all() -> Self {
        Self {
            tokens: vec![SearchToken::keyword("ALL")],
            charset: None,
            non_ascii: None,
        }
    }

    /// The tokens, including any `CHARSET` prefix.
    #[must_use]
    pub fn tokens(&self) -> &[SearchToken] {
        &self.tokens
    }

    /// The announced charset, if any.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// The single value containing non-ASCII characters, as stored.
    #[must_use]
    pub fn non_ascii_value(&self) -> Option<&str> {
        self.non_ascii.as_deref()
    }

    /// Returns true if the query has no criteria.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the tokens as strings.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.tokens.iter().map(ToString::to_string).collect()
    }

    /// Consumes the query, returning its tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<SearchToken> {
        self.tokens
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
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

    fn strings(builder: &QueryBuilder) -> Vec<String> {
        builder.query().unwrap().to_strings()
    }

    #[test]
    fn quoted_address() {
        let q = QueryBuilder::new().bcc("test@example.com");
        assert_eq!(strings(&q), ["BCC", r#""test@example.com""#]);
    }

    #[test]
    fn empty_value_keeps_its_slot() {
        let q = QueryBuilder::new().subject("").unseen();
        assert_eq!(strings(&q), ["SUBJECT", r#""""#, "UNSEEN"]);
        assert_eq!(q.query().unwrap().to_string(), r#"SUBJECT "" UNSEEN"#);
    }

    #[test]
    fn bare_values() {
        let q = QueryBuilder::new()
            .before("1-Jan-2023")
            .unwrap()
            .uid("12345");
        assert_eq!(strings(&q), ["BEFORE", "1-Jan-2023", "UID", "12345"]);
    }

    #[test]
    fn sizes_become_numbers() {
        let q = QueryBuilder::new().larger("1MB").unwrap().smaller(500u32).unwrap();
        assert_eq!(
            q.tokens(),
            [
                SearchToken::keyword("LARGER"),
                SearchToken::Number(1_000_000),
                SearchToken::keyword("SMALLER"),
                SearchToken::Number(500),
            ]
        );
    }

    #[test]
    fn bad_size_and_date_are_rejected() {
        assert!(matches!(
            QueryBuilder::new().larger("5.5 GB"),
            Err(Error::SizeParsing { .. })
        ));
        assert!(matches!(
            QueryBuilder::new().since("2023-01-01"),
            Err(Error::WrongDateFormat { .. })
        ));
    }

    #[test]
    fn flags_in_order() {
        let q = QueryBuilder::new()
            .answered()
            .deleted()
            .draft()
            .flagged()
            .new_messages()
            .old()
            .recent()
            .seen()
            .unanswered()
            .undeleted()
            .undraft()
            .unflagged()
            .unseen();
        assert_eq!(
            strings(&q),
            [
                "ANSWERED", "DELETED", "DRAFT", "FLAGGED", "NEW", "OLD", "RECENT", "SEEN",
                "UNANSWERED", "UNDELETED", "UNDRAFT", "UNFLAGGED", "UNSEEN"
            ]
        );
    }

    #[test]
    fn header_quotes_both_parts() {
        let q = QueryBuilder::new().header("X-Mailer", "My Client");
        assert_eq!(strings(&q), ["HEADER", "X-Mailer", r#""My Client""#]);
    }

    #[test]
    fn single_non_ascii_value_gets_charset() {
        let q = QueryBuilder::new().subject("テスト").sender("test@example.com");
        let query = q.query().unwrap();
        assert_eq!(
            query.to_strings(),
            ["CHARSET", "UTF-8", "SUBJECT", "テスト", "FROM", r#""test@example.com""#]
        );
        assert_eq!(query.charset(), Some("UTF-8"));
        assert_eq!(query.non_ascii_value(), Some("テスト"));
    }

    #[test]
    fn repeated_non_ascii_value_counts_once() {
        let q = QueryBuilder::new().subject("Привет").body("Привет");
        assert_eq!(q.query().unwrap().to_strings()[..2], ["CHARSET", "UTF-8"]);
    }

    #[test]
    fn two_non_ascii_values_are_rejected() {
        let q = QueryBuilder::new().subject("Привет").body("テスト");
        let err = q.query().unwrap_err();
        assert!(matches!(
            err,
            Error::SearchSyntaxNotSupported { ref values } if values == &["Привет", "テスト"]
        ));
    }

    #[test]
    fn query_is_recomputed_after_more_criteria() {
        let q = QueryBuilder::new().subject("Привет");
        assert!(q.query().is_ok());
        let q = q.text("テスト");
        assert!(q.query().is_err());
    }

    #[test]
    fn query_is_idempotent() {
        let q = QueryBuilder::new().subject("Привет").unseen();
        assert_eq!(q.query().unwrap(), q.query().unwrap());
    }

    #[test]
    fn ascii_query_has_no_charset() {
        let query = QueryBuilder::new().subject("hello").query().unwrap();
        assert_eq!(query.charset(), None);
        assert_eq!(query.non_ascii_value(), None);
    }

    #[test]
    fn aliases() {
        assert_eq!(
            QueryBuilder::new().from("a").to("b"),
            QueryBuilder::new().sender("a").recipient("b")
        );
    }
}
