//! IMAP response parser.
//!
//! Parses the response lines needed by folder listing, STATUS and search.

#![allow(clippy::missing_errors_doc)]

use crate::folder::RawListing;
use crate::parser::lexer::{Lexer, Token};
use crate::types::{Mailbox, MailboxStatus, StatusAttribute, Tag, Uid};
use crate::{Error, Result};

/// Response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Command completed successfully.
    Ok,
    /// Command failed (operational error).
    No,
    /// Command failed (protocol/syntax error).
    Bad,
    /// Server greeting (pre-authenticated).
    PreAuth,
    /// Server is closing connection.
    Bye,
}

impl Status {
    /// Returns true if this is a successful status.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok | Self::PreAuth)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OK" => Some(Self::Ok),
            "NO" => Some(Self::No),
            "BAD" => Some(Self::Bad),
            "PREAUTH" => Some(Self::PreAuth),
            "BYE" => Some(Self::Bye),
            _ => None,
        }
    }
}

/// A parsed IMAP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Tagged response (command completion).
    Tagged {
        /// The command tag.
        tag: Tag,
        /// Response status.
        status: Status,
        /// Human-readable text, including any response code.
        text: String,
    },
    /// Untagged response (server data).
    Untagged(UntaggedResponse),
    /// Continuation request.
    Continuation {
        /// Optional text/data.
        text: Option<String>,
    },
}

impl Response {
    /// Converts a tagged completion into a result.
    ///
    /// `NO` and `BAD` become [`Error::No`] and [`Error::Bad`]; anything that is
    /// not a tagged completion is a protocol error.
    pub fn into_completion(self) -> Result<String> {
        match self {
            Self::Tagged { status, text, .. } => match status {
                Status::No => Err(Error::No(text)),
                Status::Bad => Err(Error::Bad(text)),
                Status::Bye => Err(Error::Protocol(format!("server closed connection: {text}"))),
                Status::Ok | Status::PreAuth => Ok(text),
            },
            other => Err(Error::Protocol(format!(
                "expected tagged completion, got {other:?}"
            ))),
        }
    }
}

/// Untagged server data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedResponse {
    /// `* OK`, `* NO`, `* BAD`, `* PREAUTH` or `* BYE`.
    Status {
        /// Response status.
        status: Status,
        /// Human-readable text, including any response code.
        text: String,
    },
    /// `* LIST` data, kept raw for the folder hierarchy builder.
    List(RawListing),
    /// `* SEARCH` data.
    Search(Vec<Uid>),
    /// `* STATUS` data.
    MailboxStatus {
        /// Mailbox the counters belong to, decoded from modified UTF-7.
        mailbox: Mailbox,
        /// Reported counters.
        status: MailboxStatus,
    },
    /// Any other untagged data (`EXISTS`, `FLAGS`, `CAPABILITY`, ...).
    Other {
        /// The response keyword, upper-cased.
        keyword: String,
        /// The rest of the line.
        text: String,
    },
}

/// Response parser.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses a complete response, including any embedded literals.
    pub fn parse(input: &[u8]) -> Result<Response> {
        let mut lexer = Lexer::new(input);

        match lexer.next_token()? {
            Token::Asterisk => Self::parse_untagged(&mut lexer),
            Token::Plus => Ok(Self::parse_continuation(&mut lexer)),
            Token::Atom(tag) => Self::parse_tagged(&mut lexer, tag),
            token => Err(Error::Parse {
                position: 0,
                message: format!("Expected *, +, or tag, got {token:?}"),
            }),
        }
    }

    /// Parses a tagged response.
    fn parse_tagged(lexer: &mut Lexer<'_>, tag_str: &str) -> Result<Response> {
        lexer.expect_space()?;

        let status = Self::parse_status(lexer)?;
        let text = read_text(lexer);

        Ok(Response::Tagged {
            tag: Tag::new(tag_str),
            status,
            text,
        })
    }

    /// Parses an untagged response.
    fn parse_untagged(lexer: &mut Lexer<'_>) -> Result<Response> {
        lexer.expect_space()?;

        let untagged = match lexer.next_token()? {
            Token::Atom(s) => {
                let upper = s.to_uppercase();
                if let Some(status) = Status::parse(&upper) {
                    UntaggedResponse::Status {
                        status,
                        text: read_text(lexer),
                    }
                } else {
                    match upper.as_str() {
                        "LIST" => {
                            lexer.expect_space()?;
                            UntaggedResponse::List(RawListing::Line(
                                lexer.take_rest_of_line().to_vec(),
                            ))
                        }
                        "SEARCH" => UntaggedResponse::Search(parse_search_response(lexer)?),
                        "STATUS" => {
                            lexer.expect_space()?;
                            let (mailbox, status) = parse_status_response(lexer)?;
                            UntaggedResponse::MailboxStatus { mailbox, status }
                        }
                        _ => UntaggedResponse::Other {
                            keyword: upper,
                            text: read_text(lexer),
                        },
                    }
                }
            }
            // Message data such as "* 3 EXISTS"
            Token::Number(n) => {
                lexer.expect_space()?;
                let keyword = lexer.read_atom_string()?.to_uppercase();
                let rest = read_text(lexer);
                UntaggedResponse::Other {
                    keyword,
                    text: if rest.is_empty() {
                        n.to_string()
                    } else {
                        format!("{n} {rest}")
                    },
                }
            }
            token => {
                return Err(Error::Parse {
                    position: lexer.position(),
                    message: format!("Unexpected token in untagged response: {token:?}"),
                });
            }
        };

        Ok(Response::Untagged(untagged))
    }

    /// Parses a continuation response.
    fn parse_continuation(lexer: &mut Lexer<'_>) -> Response {
        let text = read_text(lexer);
        Response::Continuation {
            text: if text.is_empty() { None } else { Some(text) },
        }
    }

    fn parse_status(lexer: &mut Lexer<'_>) -> Result<Status> {
        let s = lexer.read_atom_string()?;
        Status::parse(s).ok_or_else(|| Error::Parse {
            position: lexer.position(),
            message: format!("Invalid status: {s}"),
        })
    }
}

/// Reads the remaining text of the line, skipping one leading space.
fn read_text(lexer: &mut Lexer<'_>) -> String {
    if lexer.peek() == Some(b' ') {
        lexer.advance();
    }
    String::from_utf8_lossy(lexer.take_rest_of_line()).into_owned()
}

/// Parses the numbers of a SEARCH response.
fn parse_search_response(lexer: &mut Lexer<'_>) -> Result<Vec<Uid>> {
    let mut uids = Vec::new();

    while lexer.peek() == Some(b' ') {
        lexer.advance();
        if let Token::Number(n) = lexer.next_token()?
            && let Some(uid) = Uid::new(n)
        {
            uids.push(uid);
        }
    }

    Ok(uids)
}

/// Parses `mailbox (NAME value ...)` of a STATUS response.
///
/// Items this crate does not know, such as `HIGHESTMODSEQ`, are skipped.
fn parse_status_response(lexer: &mut Lexer<'_>) -> Result<(Mailbox, MailboxStatus)> {
    let name = match lexer.next_token()? {
        Token::Atom(s) => s.as_bytes().to_vec(),
        Token::Number(n) => n.to_string().into_bytes(),
        Token::QuotedString(bytes) | Token::Literal(bytes) => bytes,
        token => return Err(lexer.error(&format!("Expected mailbox name, got {token:?}"))),
    };
    let mailbox = Mailbox::from_encoded(&name)?;

    lexer.expect_space()?;
    lexer.expect(Token::LParen)?;

    let mut status = MailboxStatus::default();
    loop {
        match lexer.next_token()? {
            Token::RParen => break,
            Token::Space => {}
            Token::Atom(item) => {
                lexer.expect_space()?;
                let Some(attribute) = StatusAttribute::parse(item) else {
                    // may be 64-bit, e.g. HIGHESTMODSEQ
                    while lexer.peek().is_some_and(|b| b.is_ascii_digit()) {
                        lexer.advance();
                    }
                    continue;
                };
                match lexer.next_token()? {
                    Token::Number(n) => status.set(attribute, n),
                    token => return Err(lexer.error(&format!("Expected number, got {token:?}"))),
                }
            }
            token => return Err(lexer.error(&format!("Unexpected token in STATUS: {token:?}"))),
        }
    }

    Ok((mailbox, status))
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
    fn test_parse_tagged_ok() {
        let response = ResponseParser::parse(b"A0001 OK LIST completed\r\n").unwrap();
        assert_eq!(
            response,
            Response::Tagged {
                tag: Tag::new("A0001"),
                status: Status::Ok,
                text: "LIST completed".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_tagged_with_code() {
        let response =
            ResponseParser::parse(b"A0002 OK [READ-WRITE] SELECT completed\r\n").unwrap();
        match response {
            Response::Tagged { status, text, .. } => {
                assert_eq!(status, Status::Ok);
                assert_eq!(text, "[READ-WRITE] SELECT completed");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_completion_no_is_error() {
        let response = ResponseParser::parse(b"A0003 NO [ALREADYEXISTS] Mailbox exists\r\n")
            .unwrap();
        let err = response.into_completion().unwrap_err();
        assert!(matches!(err, Error::No(ref text) if text.contains("ALREADYEXISTS")));
    }

    #[test]
    fn test_completion_bad_is_error() {
        let response = ResponseParser::parse(b"A0004 BAD Unknown command\r\n").unwrap();
        assert!(matches!(response.into_completion(), Err(Error::Bad(_))));
    }

    #[test]
    fn test_untagged_is_not_a_completion() {
        let response = ResponseParser::parse(b"* OK still here\r\n").unwrap();
        assert!(matches!(response.into_completion(), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_parse_list_keeps_raw_line() {
        let response =
            ResponseParser::parse(b"* LIST (\\HasNoChildren) \"/\" \"INBOX\"\r\n").unwrap();
        assert_eq!(
            response,
            Response::Untagged(UntaggedResponse::List(RawListing::Line(
                b"(\\HasNoChildren) \"/\" \"INBOX\"".to_vec()
            )))
        );
    }

    #[test]
    fn test_parse_list_with_literal() {
        let response =
            ResponseParser::parse(b"* LIST () \"/\" {9}\r\nWork/Q&-A\r\n").unwrap();
        assert_eq!(
            response,
            Response::Untagged(UntaggedResponse::List(RawListing::Line(
                b"() \"/\" {9}\r\nWork/Q&-A".to_vec()
            )))
        );
    }

    #[test]
    fn test_parse_search() {
        let response = ResponseParser::parse(b"* SEARCH 2 84 882\r\n").unwrap();
        let expected: Vec<Uid> = [2, 84, 882].into_iter().filter_map(Uid::new).collect();
        assert_eq!(
            response,
            Response::Untagged(UntaggedResponse::Search(expected))
        );
    }

    #[test]
    fn test_parse_empty_search() {
        let response = ResponseParser::parse(b"* SEARCH\r\n").unwrap();
        assert_eq!(
            response,
            Response::Untagged(UntaggedResponse::Search(Vec::new()))
        );
    }

    #[test]
    fn test_parse_status() {
        let response = ResponseParser::parse(
            b"* STATUS \"&BBIERQQ+BDQETwRJBDgENQ-\" (MESSAGES 231 RECENT 0 UIDNEXT 44292 UIDVALIDITY 1 UNSEEN 12)\r\n",
        )
        .unwrap();

        let (mailbox, status) = match response {
            Response::Untagged(UntaggedResponse::MailboxStatus { mailbox, status }) => {
                (mailbox, status)
            }
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(mailbox.as_str(), "Входящие");
        assert_eq!(
            status,
            MailboxStatus {
                messages: Some(231),
                recent: Some(0),
                unseen: Some(12),
                uid_next: Some(44292),
                uid_validity: Some(1),
            }
        );
    }

    #[test]
    fn test_parse_status_partial_and_unknown_items() {
        let response =
            ResponseParser::parse(b"* STATUS 2023 (HIGHESTMODSEQ 90060115205545359 unseen 4)\r\n")
                .unwrap();

        let (mailbox, status) = match response {
            Response::Untagged(UntaggedResponse::MailboxStatus { mailbox, status }) => {
                (mailbox, status)
            }
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(mailbox.as_str(), "2023");
        assert_eq!(status.unseen, Some(4));
        assert_eq!(status.messages, None);
    }

    #[test]
    fn test_parse_status_requires_item_list() {
        assert!(ResponseParser::parse(b"* STATUS INBOX MESSAGES 3\r\n").is_err());
    }

    #[test]
    fn test_parse_message_data() {
        let response = ResponseParser::parse(b"* 23 EXISTS\r\n").unwrap();
        match response {
            Response::Untagged(UntaggedResponse::Other { keyword, text }) => {
                assert_eq!(keyword, "EXISTS");
                assert_eq!(text, "23");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_continuation() {
        let response = ResponseParser::parse(b"+ Ready for literal data\r\n").unwrap();
        assert_eq!(
            response,
            Response::Continuation {
                text: Some("Ready for literal data".to_string())
            }
        );
    }

    #[test]
    fn test_parse_invalid_status() {
        assert!(ResponseParser::parse(b"A0001 MAYBE fine\r\n").is_err());
    }
}
