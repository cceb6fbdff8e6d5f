//! Command serialization helpers.

use super::LiteralMode;
use crate::search::{SearchQuery, SearchToken};
use crate::types::Mailbox;

/// Writes an astring (atom or quoted string).
pub fn write_astring(buf: &mut Vec<u8>, s: &str) {
    if s.is_empty() || s.bytes().any(needs_quoting) {
        buf.push(b'"');
        for b in s.bytes() {
            if b == b'"' || b == b'\\' {
                buf.push(b'\\');
            }
            buf.push(b);
        }
        buf.push(b'"');
    } else {
        buf.extend_from_slice(s.as_bytes());
    }
}

/// Writes a mailbox name in its modified UTF-7 form.
pub fn write_mailbox(buf: &mut Vec<u8>, mailbox: &Mailbox) {
    write_astring(buf, &mailbox.encoded());
}

/// Returns true if the byte needs quoting.
const fn needs_quoting(b: u8) -> bool {
    matches!(b, b' ' | b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*') || b < 0x20 || b == 0x7F
}

/// Writes a literal announcement followed by its data.
///
/// Returns the offset right after a synchronizing announcement: the client
/// must wait for a continuation request there before sending the data.
pub fn write_literal(buf: &mut Vec<u8>, data: &[u8], mode: LiteralMode) -> Option<usize> {
    let split = match mode {
        LiteralMode::Synchronizing => {
            buf.extend_from_slice(format!("{{{}}}\r\n", data.len()).as_bytes());
            Some(buf.len())
        }
        LiteralMode::NonSynchronizing => {
            buf.extend_from_slice(format!("{{{}+}}\r\n", data.len()).as_bytes());
            None
        }
    };
    buf.extend_from_slice(data);
    split
}

/// Writes SEARCH criteria.
///
/// Non-ASCII values go out as literals since quoted strings must be 7-bit.
/// An empty query searches `ALL`. Returns the points where the command has
/// to wait for the server (see [`write_literal`]).
pub fn write_search_query(
    buf: &mut Vec<u8>,
    query: &SearchQuery,
    mode: LiteralMode,
) -> Vec<usize> {
    let mut splits = Vec::new();
    if query.is_empty() {
        buf.extend_from_slice(b"ALL");
        return splits;
    }

    for (i, token) in query.tokens().iter().enumerate() {
        if i > 0 {
            buf.push(b' ');
        }
        match token {
            SearchToken::Atom(s) if !s.is_ascii() => {
                splits.extend(write_literal(buf, token.unquoted().as_bytes(), mode));
            }
            SearchToken::Atom(s) => buf.extend_from_slice(s.as_bytes()),
            SearchToken::Number(n) => buf.extend_from_slice(n.to_string().as_bytes()),
        }
    }
    splits
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
    use crate::search::QueryBuilder;

    fn astring(s: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        write_astring(&mut buf, s);
        buf
    }

    #[test]
    fn astring_atom_and_quoted() {
        assert_eq!(astring("INBOX"), b"INBOX");
        assert_eq!(astring(""), b"\"\"");
        assert_eq!(astring("My Folder"), b"\"My Folder\"");
        assert_eq!(astring("a\"b"), b"\"a\\\"b\"");
        assert_eq!(astring("*"), b"\"*\"");
    }

    #[test]
    fn mailbox_is_utf7_encoded() {
        let mut buf = Vec::new();
        write_mailbox(&mut buf, &Mailbox::new("Entwürfe"));
        assert_eq!(buf, b"Entw&APw-rfe");

        let mut buf = Vec::new();
        write_mailbox(&mut buf, &Mailbox::new("Q&A Archive"));
        assert_eq!(buf, b"\"Q&-A Archive\"");
    }

    #[test]
    fn search_ascii() {
        let query = QueryBuilder::new()
            .sender("a@b.com")
            .unseen()
            .query()
            .unwrap();
        let mut buf = Vec::new();
        let splits = write_search_query(&mut buf, &query, LiteralMode::Synchronizing);
        assert_eq!(buf, b"FROM \"a@b.com\" UNSEEN");
        assert!(splits.is_empty());
    }

    #[test]
    fn search_non_ascii_literal() {
        let query = QueryBuilder::new().subject("Привет мир").query().unwrap();
        let mut buf = Vec::new();
        let splits = write_search_query(&mut buf, &query, LiteralMode::NonSynchronizing);

        let mut expected = b"CHARSET UTF-8 SUBJECT {19+}\r\n".to_vec();
        expected.extend_from_slice("Привет мир".as_bytes());
        assert_eq!(buf, expected);
        assert!(splits.is_empty());
    }

    #[test]
    fn search_synchronizing_literal_marks_split() {
        let query = QueryBuilder::new()
            .subject("Café")
            .body("naïve")
            .query()
            .unwrap();
        let mut buf = Vec::new();
        let splits = write_search_query(&mut buf, &query, LiteralMode::Synchronizing);

        let header = b"CHARSET UTF-8 SUBJECT {5}\r\n".len();
        assert_eq!(splits, [header, header + "Café BODY {6}\r\n".len()]);
        assert_eq!(&buf[header - 5..header], b"{5}\r\n");
        assert!(buf.ends_with("naïve".as_bytes()));
    }

    #[test]
    fn search_empty_is_all() {
        let query = QueryBuilder::new().query().unwrap();
        let mut buf = Vec::new();
        let splits = write_search_query(&mut buf, &query, LiteralMode::Synchronizing);
        assert_eq!(buf, b"ALL");
        assert!(splits.is_empty());
    }
}
