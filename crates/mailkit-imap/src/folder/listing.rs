//! Raw LIST lines and their parser.
//!
//! A listing line has the shape
//!
//! ```text
//! (\HasChildren \Noselect) "/" "Work/Projects"
//! ```
//!
//! The attribute list may be empty or absent. The separator is a quoted single
//! character or `NIL`. The name is a quoted string, a `{n}` literal, or the bare
//! rest of the line. Names are decoded from modified UTF-7.

use crate::parser::lexer::{Lexer, Token};
use crate::types::{ListResponse, Mailbox, MailboxAttribute};
use crate::{Error, Result};

/// One folder entry as delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawListing {
    /// A complete line. May carry an inline `{n}\r\n` literal.
    Line(Vec<u8>),
    /// A line split at a literal: `prefix` ends with `{n}` (or `{n+}`) and
    /// `literal` holds exactly `n` bytes of folder name.
    Literal {
        /// Everything up to and including the `{n}` marker.
        prefix: Vec<u8>,
        /// The literal folder name bytes.
        literal: Vec<u8>,
    },
}

impl RawListing {
    /// Creates a listing from a complete line.
    #[must_use]
    pub fn line(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Line(bytes.into())
    }

    /// Creates a listing from a `{n}`-terminated prefix and its literal.
    #[must_use]
    pub fn literal(prefix: impl Into<Vec<u8>>, literal: impl Into<Vec<u8>>) -> Self {
        Self::Literal {
            prefix: prefix.into(),
            literal: literal.into(),
        }
    }

    /// Returns the listing as text for diagnostics.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Line(line) => String::from_utf8_lossy(line).into_owned(),
            Self::Literal { prefix, literal } => format!(
                "{} + {}",
                String::from_utf8_lossy(prefix),
                String::from_utf8_lossy(literal)
            ),
        }
    }

    /// Parses the listing into a [`ListResponse`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderParsing`] naming the listing if it does not
    /// match the LIST grammar or the name is not valid modified UTF-7.
    pub fn parse(&self) -> Result<ListResponse> {
        let parsed = match self {
            Self::Line(line) => parse_line(line),
            Self::Literal { prefix, literal } => parse_split_literal(prefix, literal),
        };
        parsed.map_err(|err| Error::FolderParsing {
            line: self.display(),
            reason: reason(err),
        })
    }
}

impl From<&str> for RawListing {
    fn from(line: &str) -> Self {
        Self::Line(line.as_bytes().to_vec())
    }
}

impl From<String> for RawListing {
    fn from(line: String) -> Self {
        Self::Line(line.into_bytes())
    }
}

impl From<&[u8]> for RawListing {
    fn from(line: &[u8]) -> Self {
        Self::Line(line.to_vec())
    }
}

impl From<Vec<u8>> for RawListing {
    fn from(line: Vec<u8>) -> Self {
        Self::Line(line)
    }
}

impl<P: Into<Vec<u8>>, L: Into<Vec<u8>>> From<(P, L)> for RawListing {
    fn from((prefix, literal): (P, L)) -> Self {
        Self::literal(prefix, literal)
    }
}

fn reason(err: Error) -> String {
    match err {
        Error::Parse { position, message } => format!("{message} at byte {position}"),
        other => other.to_string(),
    }
}

fn parse_line(line: &[u8]) -> Result<ListResponse> {
    let mut lexer = Lexer::new(line);
    let (attributes, delimiter) = parse_head(&mut lexer)?;

    let name = match lexer.peek() {
        Some(b'"' | b'{') => {
            let name = match lexer.next_token()? {
                Token::QuotedString(bytes) | Token::Literal(bytes) => bytes,
                token => return Err(lexer.error(&format!("Expected folder name, got {token:?}"))),
            };
            // Extended LIST data may follow the name
            if !matches!(lexer.peek(), None | Some(b' ' | b'\r' | b'\n')) {
                return Err(lexer.error("Unexpected data after folder name"));
            }
            name
        }
        Some(_) => lexer.take_rest_of_line().to_vec(),
        None => return Err(lexer.error("Missing folder name")),
    };

    finish(attributes, delimiter, &name)
}

fn parse_split_literal(prefix: &[u8], literal: &[u8]) -> Result<ListResponse> {
    let trimmed = prefix.trim_ascii_end();
    let malformed = || Error::Parse {
        position: trimmed.len(),
        message: "Listing prefix must end with a {n} literal marker".to_string(),
    };

    let open = trimmed.iter().rposition(|&b| b == b'{').ok_or_else(malformed)?;
    let marker = trimmed[open + 1..]
        .strip_suffix(b"}")
        .ok_or_else(malformed)?;
    let digits = marker.strip_suffix(b"+").unwrap_or(marker);
    let size: usize = std::str::from_utf8(digits)
        .ok()
        .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|d| d.parse().ok())
        .ok_or_else(malformed)?;

    if size != literal.len() {
        return Err(Error::Parse {
            position: open,
            message: format!(
                "Literal announces {size} bytes but {} were supplied",
                literal.len()
            ),
        });
    }

    let mut lexer = Lexer::new(&trimmed[..open]);
    let (attributes, delimiter) = parse_head(&mut lexer)?;
    if !lexer.is_eof() {
        return Err(lexer.error("Unexpected data before literal marker"));
    }

    finish(attributes, delimiter, literal)
}

/// Parses the attribute list and separator, leaving the lexer at the name.
fn parse_head(lexer: &mut Lexer<'_>) -> Result<(Vec<MailboxAttribute>, Option<char>)> {
    // Tolerate the untagged response prefix
    if lexer
        .remaining()
        .get(..7)
        .is_some_and(|p| p.eq_ignore_ascii_case(b"* LIST "))
    {
        lexer.skip(7);
    }

    let mut attributes = Vec::new();

    if lexer.peek() == Some(b'(') {
        lexer.expect(Token::LParen)?;
        loop {
            match lexer.next_token()? {
                Token::RParen => break,
                Token::Atom(s) => attributes.push(MailboxAttribute::parse(s)),
                Token::Space => {}
                token => {
                    return Err(lexer.error(&format!("Unexpected token in LIST attributes: {token:?}")));
                }
            }
        }
        lexer.expect_space()?;
    }

    let delimiter = match lexer.next_token()? {
        Token::Nil => None,
        Token::QuotedString(bytes) => {
            let s = String::from_utf8(bytes).map_err(|_| lexer.error("Separator is not UTF-8"))?;
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => return Err(lexer.error(&format!("Separator must be one character, got {s:?}"))),
            }
        }
        token => return Err(lexer.error(&format!("Expected separator, got {token:?}"))),
    };

    lexer.expect_space()?;
    Ok((attributes, delimiter))
}

fn finish(
    attributes: Vec<MailboxAttribute>,
    delimiter: Option<char>,
    name: &[u8],
) -> Result<ListResponse> {
    Ok(ListResponse {
        attributes,
        delimiter,
        mailbox: Mailbox::from_encoded(name)?,
    })
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

    fn parse(line: &str) -> Result<ListResponse> {
        RawListing::from(line).parse()
    }

    #[test]
    fn quoted_name() {
        let list = parse(r#"(\HasNoChildren) "/" "INBOX""#).unwrap();
        assert_eq!(list.attributes, vec![MailboxAttribute::HasNoChildren]);
        assert_eq!(list.delimiter, Some('/'));
        assert_eq!(list.mailbox.as_str(), "INBOX");
    }

    #[test]
    fn bare_name_with_spaces() {
        let list = parse(r#"(\HasNoChildren) "." Archive.Old Mail"#).unwrap();
        assert_eq!(list.delimiter, Some('.'));
        assert_eq!(list.mailbox.as_str(), "Archive.Old Mail");
    }

    #[test]
    fn multiple_attributes() {
        let list = parse(r#"(\HasChildren \Noselect \X-Custom) "/" "Work""#).unwrap();
        assert_eq!(
            list.attributes,
            vec![
                MailboxAttribute::HasChildren,
                MailboxAttribute::NoSelect,
                MailboxAttribute::Unknown("\\X-Custom".to_string()),
            ]
        );
    }

    #[test]
    fn empty_and_missing_attribute_list() {
        assert!(parse(r#"() "/" "INBOX""#).unwrap().attributes.is_empty());
        let list = parse(r#""/" "Sent""#).unwrap();
        assert!(list.attributes.is_empty());
        assert_eq!(list.mailbox.as_str(), "Sent");
    }

    #[test]
    fn nil_separator() {
        let list = parse(r#"(\Noinferiors) NIL "INBOX""#).unwrap();
        assert_eq!(list.delimiter, None);
    }

    #[test]
    fn escaped_backslash_separator() {
        let list = parse(r#"() "\\" "Work\\Projects""#).unwrap();
        assert_eq!(list.delimiter, Some('\\'));
        assert_eq!(list.mailbox.as_str(), "Work\\Projects");
    }

    #[test]
    fn name_is_utf7_decoded() {
        let list = parse(r#"(\HasNoChildren) "/" "&BB8EQAQ4BDIENQRC-""#).unwrap();
        assert_eq!(list.mailbox.as_str(), "Привет");
    }

    #[test]
    fn untagged_prefix_tolerated() {
        let list = parse(r#"* LIST (\HasNoChildren) "/" "INBOX""#).unwrap();
        assert_eq!(list.mailbox.as_str(), "INBOX");
    }

    #[test]
    fn extended_data_ignored() {
        let list = parse(r#"(\Subscribed) "/" "Foo" ("CHILDINFO" ("SUBSCRIBED"))"#).unwrap();
        assert_eq!(list.mailbox.as_str(), "Foo");
        assert_eq!(list.attributes, vec![MailboxAttribute::Subscribed]);
    }

    #[test]
    fn inline_literal() {
        let list = RawListing::line(&b"() \"/\" {11}\r\nWork/Report"[..])
            .parse()
            .unwrap();
        assert_eq!(list.mailbox.as_str(), "Work/Report");
    }

    #[test]
    fn split_literal() {
        let raw = RawListing::from((r#"(\HasNoChildren) "/" {11}"#, "Work/Report"));
        let list = raw.parse().unwrap();
        assert_eq!(list.mailbox.as_str(), "Work/Report");
        assert_eq!(list.attributes, vec![MailboxAttribute::HasNoChildren]);
    }

    #[test]
    fn split_literal_plus() {
        let raw = RawListing::literal(&b"() \"/\" {4+}\r\n"[..], &b"Junk"[..]);
        assert_eq!(raw.parse().unwrap().mailbox.as_str(), "Junk");
    }

    #[test]
    fn split_literal_length_mismatch() {
        let raw = RawListing::from((r#"() "/" {3}"#, "Work/Report"));
        let err = raw.parse().unwrap_err();
        assert!(matches!(err, Error::FolderParsing { ref reason, .. } if reason.contains("announces 3")));
    }

    #[test]
    fn split_literal_without_marker() {
        let raw = RawListing::from((r#"() "/" "#, "Work"));
        assert!(matches!(raw.parse(), Err(Error::FolderParsing { .. })));
    }

    #[test]
    fn invalid_lines() {
        for line in [
            "garbage",
            "",
            r#"(\HasNoChildren "/" "INBOX""#,
            r#"(\HasNoChildren) "/""#,
            r#"(\HasNoChildren) "//" "INBOX""#,
            r#"(\HasNoChildren) "/" "INBOX"junk"#,
            r#"(\HasNoChildren) "/" "&Jjo!-""#,
        ] {
            let err = parse(line).unwrap_err();
            match err {
                Error::FolderParsing { line: shown, .. } => assert_eq!(shown, line),
                other => panic!("unexpected error for {line:?}: {other:?}"),
            }
        }
    }
}
