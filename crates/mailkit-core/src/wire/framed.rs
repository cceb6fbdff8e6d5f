//! Framed reading of IMAP responses from a blocking stream.
//!
//! Responses are CRLF-terminated lines that may embed literals
//! (`{n}\r\n<n bytes>`); a literal is always followed by more line data.

#![allow(clippy::missing_errors_doc)]

use std::io::{self, BufRead, Read, Write};

use mailkit_imap::Error as ImapError;

use crate::Result;

/// Maximum line length to prevent memory exhaustion.
const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Maximum literal size to prevent memory exhaustion.
const MAX_LITERAL_SIZE: usize = 16 * 1024 * 1024;

/// Line-framed connection over an already-authenticated stream.
#[derive(Debug)]
pub struct FramedStream<S> {
    stream: S,
}

impl<S: BufRead + Write> FramedStream<S> {
    /// Wraps a buffered stream.
    pub const fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Reads one complete response, including any embedded literals.
    pub fn read_response(&mut self) -> Result<Vec<u8>> {
        let mut response = Vec::new();

        loop {
            let line = self.read_line()?;
            response.extend_from_slice(&line);

            let Some(literal_len) = parse_literal_length(&line) else {
                break;
            };
            if literal_len > MAX_LITERAL_SIZE {
                return Err(ImapError::Protocol(format!(
                    "literal too large: {literal_len} bytes (max {MAX_LITERAL_SIZE})"
                ))
                .into());
            }

            let start = response.len();
            response.resize(start + literal_len, 0);
            self.stream.read_exact(&mut response[start..])?;
        }

        Ok(response)
    }

    /// Reads a single line up to and including its LF.
    fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        let read = (&mut self.stream)
            .take(MAX_LINE_LENGTH as u64 + 1)
            .read_until(b'\n', &mut line)?;

        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed").into());
        }
        if !line.ends_with(b"\n") {
            if line.len() > MAX_LINE_LENGTH {
                return Err(ImapError::Protocol("line too long".to_string()).into());
            }
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed").into());
        }

        Ok(line)
    }

    /// Writes a serialized command and flushes it.
    pub fn write_command(&mut self, data: &[u8]) -> Result<()> {
        self.stream.write_all(data)?;
        self.stream.flush()?;
        Ok(())
    }

    /// Gets a reference to the underlying stream.
    pub const fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Consumes the framed stream and returns the inner stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

/// Parses a literal length from the end of a line.
///
/// Matches `{123}` or `{123+}` followed by CRLF (or a bare LF).
fn parse_literal_length(line: &[u8]) -> Option<usize> {
    let line = line.strip_suffix(b"\n")?;
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let line = line.strip_suffix(b"}")?;
    let line = line.strip_suffix(b"+").unwrap_or(line);

    let open = line.iter().rposition(|&b| b == b'{')?;
    let digits = &line[open + 1..];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    std::str::from_utf8(digits).ok()?.parse().ok()
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
    use std::io::Cursor;

    use super::*;
    use crate::Error;

    /// Read side from a fixed buffer, writes collected separately.
    struct Duplex {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl Duplex {
        fn new(input: &[u8]) -> Self {
            Self {
                input: Cursor::new(input.to_vec()),
                output: Vec::new(),
            }
        }
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl BufRead for Duplex {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            self.input.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.input.consume(amt);
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_parse_literal_length() {
        assert_eq!(parse_literal_length(b"* LIST () \"/\" {5}\r\n"), Some(5));
        assert_eq!(parse_literal_length(b"A1 SEARCH {12+}\r\n"), Some(12));
        assert_eq!(parse_literal_length(b"* LIST () \"/\" INBOX\r\n"), None);
        assert_eq!(parse_literal_length(b"* OK {}\r\n"), None);
        assert_eq!(parse_literal_length(b"* OK {x1}\r\n"), None);
        assert_eq!(parse_literal_length(b"{3}"), None);
    }

    #[test]
    fn test_read_simple_lines() {
        let mut framed = FramedStream::new(Duplex::new(b"* SEARCH 1 2\r\nA1 OK done\r\n"));
        assert_eq!(framed.read_response().unwrap(), b"* SEARCH 1 2\r\n");
        assert_eq!(framed.read_response().unwrap(), b"A1 OK done\r\n");
    }

    #[test]
    fn test_read_response_with_literal() {
        let input = b"* LIST () \"/\" {9}\r\nWork/Q&-A\r\nA1 OK\r\n";
        let mut framed = FramedStream::new(Duplex::new(input));
        assert_eq!(
            framed.read_response().unwrap(),
            b"* LIST () \"/\" {9}\r\nWork/Q&-A\r\n"
        );
        assert_eq!(framed.read_response().unwrap(), b"A1 OK\r\n");
    }

    #[test]
    fn test_eof_is_io_error() {
        let mut framed = FramedStream::new(Duplex::new(b"* OK partial"));
        let err = framed.read_response().unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_truncated_literal_is_io_error() {
        let mut framed = FramedStream::new(Duplex::new(b"* LIST () \"/\" {20}\r\nshort"));
        assert!(matches!(framed.read_response(), Err(Error::Io(_))));
    }

    #[test]
    fn test_write_command() {
        let mut framed = FramedStream::new(Duplex::new(b""));
        framed.write_command(b"A1 CLOSE\r\n").unwrap();
        assert_eq!(framed.into_inner().output, b"A1 CLOSE\r\n");
    }
}
