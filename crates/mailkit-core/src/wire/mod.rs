//! Line-oriented [`Transport`] over a blocking, already-authenticated stream.
//!
//! Each call writes one tagged command, then reads responses until the
//! matching tagged completion. Untagged LIST, STATUS and SEARCH data collected
//! on the way is returned to the caller.
//!
//! Literals are synchronizing by default: the transport sends `{n}`, waits
//! for the server's `+` and only then sends the data. Servers that announce
//! LITERAL+ can be driven with [`LiteralMode::NonSynchronizing`] to save the
//! round trip.
//!
//! # Example
//!
//! ```
//! use std::io::{self, BufRead, Cursor, Read, Write};
//!
//! use mailkit_core::{Transport, WireTransport};
//!
//! # struct Replay { input: Cursor<Vec<u8>>, sent: Vec<u8> }
//! # impl Read for Replay {
//! #     fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> { self.input.read(buf) }
//! # }
//! # impl BufRead for Replay {
//! #     fn fill_buf(&mut self) -> io::Result<&[u8]> { self.input.fill_buf() }
//! #     fn consume(&mut self, amt: usize) { self.input.consume(amt) }
//! # }
//! # impl Write for Replay {
//! #     fn write(&mut self, buf: &[u8]) -> io::Result<usize> { self.sent.write(buf) }
//! #     fn flush(&mut self) -> io::Result<()> { Ok(()) }
//! # }
//! # let stream = Replay {
//! #     input: Cursor::new(b"* LIST (\\HasNoChildren) \"/\" INBOX\r\nA0001 OK LIST done\r\n".to_vec()),
//! #     sent: Vec::new(),
//! # };
//! let mut transport = WireTransport::new(stream);
//! let listings = transport.list("", "*")?;
//! assert_eq!(listings.len(), 1);
//! # Ok::<(), mailkit_core::Error>(())
//! ```

#![allow(clippy::missing_errors_doc)]

mod framed;

use std::io::{BufRead, Write};

use mailkit_imap::{
    Command, Error as ImapError, LiteralMode, Mailbox, MailboxStatus, RawListing, Response,
    ResponseParser, SearchQuery, Status, StatusAttribute, Tag, TagGenerator, Uid,
    UntaggedResponse,
};
use tracing::trace;

use crate::{Result, Transport};

pub use framed::FramedStream;

/// Blocking IMAP transport speaking the wire protocol over `S`.
#[derive(Debug)]
pub struct WireTransport<S> {
    stream: FramedStream<S>,
    tags: TagGenerator,
    literal_mode: LiteralMode,
}

/// Where a command stands after the server's latest response.
enum Progress {
    /// The server asked for the next piece of the command.
    Continue(Option<String>),
    /// The command completed with `OK`.
    Done,
}

impl<S: BufRead + Write> WireTransport<S> {
    /// Wraps an authenticated stream, tagging commands `A0001`, `A0002`, ...
    pub fn new(stream: S) -> Self {
        Self::with_tag_prefix(stream, "A")
    }

    /// Wraps an authenticated stream with a custom tag prefix.
    pub fn with_tag_prefix(stream: S, prefix: impl Into<String>) -> Self {
        Self {
            stream: FramedStream::new(stream),
            tags: TagGenerator::new(prefix),
            literal_mode: LiteralMode::default(),
        }
    }

    /// Sets how literals are announced. Only use
    /// [`LiteralMode::NonSynchronizing`] with servers that advertise LITERAL+.
    #[must_use]
    pub fn with_literal_mode(mut self, mode: LiteralMode) -> Self {
        self.literal_mode = mode;
        self
    }

    /// Returns how literals are announced.
    pub const fn literal_mode(&self) -> LiteralMode {
        self.literal_mode
    }

    /// Gets a reference to the underlying stream.
    pub const fn get_ref(&self) -> &S {
        self.stream.get_ref()
    }

    /// Consumes the transport and returns the inner stream.
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }

    /// Sends one command and collects its untagged data.
    ///
    /// Fails on a `NO`/`BAD` completion, on an untagged `BYE`, and on any
    /// response line that cannot be parsed.
    pub fn execute(&mut self, command: &Command) -> Result<Vec<UntaggedResponse>> {
        let tag = self.tags.next_tag();
        let parts = command.serialize_parts(tag.as_str(), self.literal_mode);
        trace!(tag = %tag, command = command.name(), "C: {}", String::from_utf8_lossy(&parts.concat()).trim_end());

        let mut untagged = Vec::new();
        let Some((last, leading)) = parts.split_last() else {
            return Ok(untagged);
        };

        for part in leading {
            self.stream.write_command(part)?;
            match self.advance(&tag, &mut untagged)? {
                Progress::Continue(_) => {}
                Progress::Done => {
                    return Err(ImapError::Protocol(format!(
                        "{tag} completed before its literal was sent"
                    ))
                    .into());
                }
            }
        }

        self.stream.write_command(last)?;
        match self.advance(&tag, &mut untagged)? {
            Progress::Done => Ok(untagged),
            Progress::Continue(text) => Err(ImapError::Protocol(format!(
                "unexpected continuation request: {}",
                text.unwrap_or_default()
            ))
            .into()),
        }
    }

    /// Reads responses until a continuation request or the completion of
    /// `tag`, collecting untagged data on the way.
    fn advance(&mut self, tag: &Tag, untagged: &mut Vec<UntaggedResponse>) -> Result<Progress> {
        loop {
            let raw = self.stream.read_response()?;
            trace!("S: {}", String::from_utf8_lossy(&raw).trim_end());

            let response = ResponseParser::parse(&raw)?;
            match response {
                Response::Tagged { tag: ref done, .. } if done != tag => {
                    return Err(ImapError::Protocol(format!(
                        "unexpected completion for tag {done} while waiting for {tag}"
                    ))
                    .into());
                }
                Response::Tagged { .. } => {
                    response.into_completion()?;
                    return Ok(Progress::Done);
                }
                Response::Untagged(UntaggedResponse::Status {
                    status: Status::Bye,
                    text,
                }) => {
                    return Err(
                        ImapError::Protocol(format!("server closed connection: {text}")).into(),
                    );
                }
                Response::Untagged(data) => untagged.push(data),
                Response::Continuation { text } => return Ok(Progress::Continue(text)),
            }
        }
    }
}

impl<S: BufRead + Write> Transport for WireTransport<S> {
    fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<RawListing>> {
        let command = Command::List {
            reference: reference.to_string(),
            pattern: pattern.to_string(),
        };

        let listings = self
            .execute(&command)?
            .into_iter()
            .filter_map(|data| match data {
                UntaggedResponse::List(raw) => Some(raw),
                _ => None,
            })
            .collect();
        Ok(listings)
    }

    fn select(&mut self, mailbox: &Mailbox, read_only: bool) -> Result<()> {
        let mailbox = mailbox.clone();
        let command = if read_only {
            Command::Examine { mailbox }
        } else {
            Command::Select { mailbox }
        };
        self.execute(&command)?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.execute(&Command::Close)?;
        Ok(())
    }

    fn create(&mut self, mailbox: &Mailbox) -> Result<()> {
        self.execute(&Command::Create {
            mailbox: mailbox.clone(),
        })?;
        Ok(())
    }

    fn rename(&mut self, from: &Mailbox, to: &Mailbox) -> Result<()> {
        self.execute(&Command::Rename {
            from: from.clone(),
            to: to.clone(),
        })?;
        Ok(())
    }

    fn delete(&mut self, mailbox: &Mailbox) -> Result<()> {
        self.execute(&Command::Delete {
            mailbox: mailbox.clone(),
        })?;
        Ok(())
    }

    fn status(&mut self, mailbox: &Mailbox) -> Result<MailboxStatus> {
        let command = Command::Status {
            mailbox: mailbox.clone(),
            items: StatusAttribute::ALL.to_vec(),
        };

        let status = self
            .execute(&command)?
            .into_iter()
            .find_map(|data| match data {
                UntaggedResponse::MailboxStatus {
                    mailbox: reported,
                    status,
                } if reported == *mailbox => Some(status),
                _ => None,
            })
            .ok_or_else(|| ImapError::Protocol(format!("no STATUS data for {mailbox}")))?;
        Ok(status)
    }

    fn search(&mut self, query: &SearchQuery, uid: bool) -> Result<Vec<Uid>> {
        let command = Command::Search {
            query: query.clone(),
            uid,
        };

        let uids = self
            .execute(&command)?
            .into_iter()
            .filter_map(|data| match data {
                UntaggedResponse::Search(uids) => Some(uids),
                _ => None,
            })
            .flatten()
            .collect();
        Ok(uids)
    }
}
