//! IMAP command builder.
//!
//! The commands needed to list, select, manage and search folders, and their
//! wire serialization. Mailbox names are written in modified UTF-7.

mod serialize;
mod tag_generator;

use crate::search::SearchQuery;
use crate::types::{Mailbox, StatusAttribute};

pub use tag_generator::TagGenerator;

use serialize::{write_astring, write_mailbox, write_search_query};

/// How literals inside a command are announced to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LiteralMode {
    /// `{n}`: the client waits for a `+` continuation before the data.
    #[default]
    Synchronizing,
    /// `{n+}` (LITERAL+, RFC 7888): the data follows immediately.
    NonSynchronizing,
}

/// IMAP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// LIST command.
    List {
        /// Reference name.
        reference: String,
        /// Mailbox pattern.
        pattern: String,
    },
    /// SELECT command.
    Select {
        /// Mailbox to select.
        mailbox: Mailbox,
    },
    /// EXAMINE command (read-only SELECT).
    Examine {
        /// Mailbox to examine.
        mailbox: Mailbox,
    },
    /// CLOSE command.
    Close,
    /// CREATE command.
    Create {
        /// Mailbox to create.
        mailbox: Mailbox,
    },
    /// DELETE command.
    Delete {
        /// Mailbox to delete.
        mailbox: Mailbox,
    },
    /// RENAME command.
    Rename {
        /// Current name.
        from: Mailbox,
        /// New name.
        to: Mailbox,
    },
    /// STATUS command.
    Status {
        /// Mailbox to query.
        mailbox: Mailbox,
        /// Items to request.
        items: Vec<StatusAttribute>,
    },
    /// SEARCH command.
    Search {
        /// Search criteria.
        query: SearchQuery,
        /// Use UIDs.
        uid: bool,
    },
}

impl Command {
    /// Returns the command name as sent on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "LIST",
            Self::Select { .. } => "SELECT",
            Self::Examine { .. } => "EXAMINE",
            Self::Close => "CLOSE",
            Self::Create { .. } => "CREATE",
            Self::Delete { .. } => "DELETE",
            Self::Rename { .. } => "RENAME",
            Self::Status { .. } => "STATUS",
            Self::Search { uid: true, .. } => "UID SEARCH",
            Self::Search { uid: false, .. } => "SEARCH",
        }
    }

    /// Serializes the command with the given tag, including the trailing CRLF.
    ///
    /// Literals are written in their non-synchronizing form, so the result
    /// can go out in one write to a server announcing LITERAL+.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        self.encode(tag, LiteralMode::NonSynchronizing).0
    }

    /// Serializes the command into the pieces sent between continuation
    /// requests.
    ///
    /// Every piece but the last ends with a synchronizing literal
    /// announcement. With [`LiteralMode::NonSynchronizing`] there is always
    /// exactly one piece.
    #[must_use]
    pub fn serialize_parts(&self, tag: &str, mode: LiteralMode) -> Vec<Vec<u8>> {
        let (buf, splits) = self.encode(tag, mode);

        let mut parts = Vec::with_capacity(splits.len() + 1);
        let mut start = 0;
        for split in splits {
            parts.push(buf[start..split].to_vec());
            start = split;
        }
        parts.push(buf[start..].to_vec());
        parts
    }

    fn encode(&self, tag: &str, mode: LiteralMode) -> (Vec<u8>, Vec<usize>) {
        let mut splits = Vec::new();
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(tag.as_bytes());
        buf.push(b' ');

        match self {
            Self::List { reference, pattern } => {
                buf.extend_from_slice(b"LIST ");
                write_astring(&mut buf, reference);
                buf.push(b' ');
                write_astring(&mut buf, pattern);
            }

            Self::Select { mailbox } => {
                buf.extend_from_slice(b"SELECT ");
                write_mailbox(&mut buf, mailbox);
            }

            Self::Examine { mailbox } => {
                buf.extend_from_slice(b"EXAMINE ");
                write_mailbox(&mut buf, mailbox);
            }

            Self::Close => buf.extend_from_slice(b"CLOSE"),

            Self::Create { mailbox } => {
                buf.extend_from_slice(b"CREATE ");
                write_mailbox(&mut buf, mailbox);
            }

            Self::Delete { mailbox } => {
                buf.extend_from_slice(b"DELETE ");
                write_mailbox(&mut buf, mailbox);
            }

            Self::Rename { from, to } => {
                buf.extend_from_slice(b"RENAME ");
                write_mailbox(&mut buf, from);
                buf.push(b' ');
                write_mailbox(&mut buf, to);
            }

            Self::Status { mailbox, items } => {
                buf.extend_from_slice(b"STATUS ");
                write_mailbox(&mut buf, mailbox);
                buf.extend_from_slice(b" (");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        buf.push(b' ');
                    }
                    buf.extend_from_slice(item.as_str().as_bytes());
                }
                buf.push(b')');
            }

            Self::Search { query, uid } => {
                if *uid {
                    buf.extend_from_slice(b"UID ");
                }
                buf.extend_from_slice(b"SEARCH ");
                splits = write_search_query(&mut buf, query, mode);
            }
        }

        buf.extend_from_slice(b"\r\n");
        (buf, splits)
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
    use crate::search::QueryBuilder;

    #[test]
    fn test_list_command() {
        let cmd = Command::List {
            reference: String::new(),
            pattern: "*".to_string(),
        };
        // * is quoted since it's a list-wildcard; both quoted and unquoted are valid
        assert_eq!(cmd.serialize("A001"), b"A001 LIST \"\" \"*\"\r\n");
    }

    #[test]
    fn test_select_command() {
        let cmd = Command::Select {
            mailbox: Mailbox::inbox(),
        };
        assert_eq!(cmd.serialize("A001"), b"A001 SELECT INBOX\r\n");
    }

    #[test]
    fn test_examine_unicode_mailbox() {
        let cmd = Command::Examine {
            mailbox: Mailbox::new("Входящие/Отчёты"),
        };
        assert_eq!(
            cmd.serialize("A002"),
            b"A002 EXAMINE &BBIERQQ+BDQETwRJBDgENQ-/&BB4EQgRHBFEEQgRL-\r\n"
        );
    }

    #[test]
    fn test_close_command() {
        assert_eq!(Command::Close.serialize("A003"), b"A003 CLOSE\r\n");
    }

    #[test]
    fn test_create_and_delete() {
        let create = Command::Create {
            mailbox: Mailbox::new("Work/New Project"),
        };
        assert_eq!(
            create.serialize("A004"),
            b"A004 CREATE \"Work/New Project\"\r\n"
        );

        let delete = Command::Delete {
            mailbox: Mailbox::new("Trash/Old"),
        };
        assert_eq!(delete.serialize("A005"), b"A005 DELETE Trash/Old\r\n");
    }

    #[test]
    fn test_rename_command() {
        let cmd = Command::Rename {
            from: Mailbox::new("Work/Drafts"),
            to: Mailbox::new("Work/Entwürfe"),
        };
        assert_eq!(
            cmd.serialize("A006"),
            b"A006 RENAME Work/Drafts Work/Entw&APw-rfe\r\n"
        );
    }

    #[test]
    fn test_status_command() {
        let cmd = Command::Status {
            mailbox: Mailbox::new("Входящие"),
            items: StatusAttribute::ALL.to_vec(),
        };
        assert_eq!(
            cmd.serialize("A011"),
            b"A011 STATUS &BBIERQQ+BDQETwRJBDgENQ- (MESSAGES RECENT UIDNEXT UIDVALIDITY UNSEEN)\r\n"
        );
        assert_eq!(cmd.name(), "STATUS");
    }

    #[test]
    fn test_uid_search_command() {
        let cmd = Command::Search {
            query: QueryBuilder::new().unseen().query().unwrap(),
            uid: true,
        };
        assert_eq!(cmd.serialize("A007"), b"A007 UID SEARCH UNSEEN\r\n");
        assert_eq!(cmd.name(), "UID SEARCH");
    }

    #[test]
    fn test_plain_search_command() {
        let cmd = Command::Search {
            query: SearchQuery::all(),
            uid: false,
        };
        assert_eq!(cmd.serialize("A008"), b"A008 SEARCH ALL\r\n");
    }

    #[test]
    fn test_search_parts_wait_for_continuation() {
        let cmd = Command::Search {
            query: QueryBuilder::new().subject("Café").unseen().query().unwrap(),
            uid: true,
        };

        let parts = cmd.serialize_parts("A009", LiteralMode::Synchronizing);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], b"A009 UID SEARCH CHARSET UTF-8 SUBJECT {5}\r\n");
        assert_eq!(parts[1], "Café UNSEEN\r\n".as_bytes());

        let parts = cmd.serialize_parts("A009", LiteralMode::NonSynchronizing);
        assert_eq!(parts, [cmd.serialize("A009")]);
    }

    #[test]
    fn test_commands_without_literals_are_one_part() {
        let parts = Command::Close.serialize_parts("A010", LiteralMode::Synchronizing);
        assert_eq!(parts, [b"A010 CLOSE\r\n".to_vec()]);
    }
}
