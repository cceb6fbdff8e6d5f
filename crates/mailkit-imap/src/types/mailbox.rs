//! Mailbox types.

use crate::utf7;

/// Mailbox name, held as Unicode.
///
/// Use [`Mailbox::encoded`] to get the modified UTF-7 form sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mailbox(pub String);

impl Mailbox {
    /// Creates a new mailbox name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The INBOX mailbox (case-insensitive per RFC).
    #[must_use]
    pub fn inbox() -> Self {
        Self("INBOX".to_string())
    }

    /// Decodes a mailbox name received in modified UTF-7.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not valid modified UTF-7.
    pub fn from_encoded(encoded: &[u8]) -> crate::Result<Self> {
        utf7::decode(encoded).map(Self)
    }

    /// Returns the mailbox name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the modified UTF-7 wire form of the name.
    #[must_use]
    pub fn encoded(&self) -> String {
        utf7::encode_to_string(&self.0)
    }
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Mailbox {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// LIST response data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    /// Mailbox attributes.
    pub attributes: Vec<MailboxAttribute>,
    /// Hierarchy delimiter.
    pub delimiter: Option<char>,
    /// Mailbox name, decoded from modified UTF-7.
    pub mailbox: Mailbox,
}

/// Mailbox attributes from LIST response.
///
/// Servers may report attributes outside the standard set; those are kept
/// verbatim in [`MailboxAttribute::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MailboxAttribute {
    /// Mailbox cannot be selected.
    NoSelect,
    /// No child mailboxes can be created under this one.
    NoInferiors,
    /// Mailbox does not exist (RFC 5258).
    NonExistent,
    /// Mailbox has no children.
    HasNoChildren,
    /// Mailbox has children.
    HasChildren,
    /// Mailbox is marked for attention.
    Marked,
    /// Mailbox is not marked.
    Unmarked,
    // SPECIAL-USE mailbox attributes (RFC 6154)
    /// All messages (virtual mailbox).
    All,
    /// Mailbox is the archive folder.
    Archive,
    /// Mailbox is the drafts folder.
    Drafts,
    /// Flagged/starred messages (virtual mailbox).
    Flagged,
    /// Mailbox is the junk/spam folder.
    Junk,
    /// Mailbox is the sent folder.
    Sent,
    /// Mailbox is the trash folder.
    Trash,
    /// Important messages (RFC 8457).
    Important,
    // Other attributes
    /// Mailbox is subscribed.
    Subscribed,
    /// Unknown attribute, as sent by the server.
    Unknown(String),
}

impl MailboxAttribute {
    /// Parses a mailbox attribute string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "\\NOSELECT" => Self::NoSelect,
            "\\NOINFERIORS" => Self::NoInferiors,
            "\\NONEXISTENT" => Self::NonExistent,
            "\\HASNOCHILDREN" => Self::HasNoChildren,
            "\\HASCHILDREN" => Self::HasChildren,
            "\\MARKED" => Self::Marked,
            "\\UNMARKED" => Self::Unmarked,
            // RFC 6154 SPECIAL-USE
            "\\ALL" => Self::All,
            "\\ARCHIVE" => Self::Archive,
            "\\DRAFTS" => Self::Drafts,
            "\\FLAGGED" => Self::Flagged,
            "\\JUNK" => Self::Junk,
            "\\SENT" => Self::Sent,
            "\\TRASH" => Self::Trash,
            // RFC 8457
            "\\IMPORTANT" => Self::Important,
            // Other
            "\\SUBSCRIBED" => Self::Subscribed,
            _ => Self::Unknown(s.to_string()),
        }
    }

    /// Returns the attribute as sent on the wire, including the backslash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoSelect => "\\Noselect",
            Self::NoInferiors => "\\Noinferiors",
            Self::NonExistent => "\\NonExistent",
            Self::HasNoChildren => "\\HasNoChildren",
            Self::HasChildren => "\\HasChildren",
            Self::Marked => "\\Marked",
            Self::Unmarked => "\\Unmarked",
            Self::All => "\\All",
            Self::Archive => "\\Archive",
            Self::Drafts => "\\Drafts",
            Self::Flagged => "\\Flagged",
            Self::Junk => "\\Junk",
            Self::Sent => "\\Sent",
            Self::Trash => "\\Trash",
            Self::Important => "\\Important",
            Self::Subscribed => "\\Subscribed",
            Self::Unknown(s) => s,
        }
    }

    /// Returns the attribute name with leading backslashes stripped.
    #[must_use]
    pub fn name(&self) -> &str {
        self.as_str().trim_start_matches('\\')
    }
}

impl std::fmt::Display for MailboxAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
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

    mod mailbox_tests {
        use super::*;

        #[test]
        fn inbox() {
            assert_eq!(Mailbox::inbox().as_str(), "INBOX");
        }

        #[test]
        fn display() {
            let mb = Mailbox::new("Sent");
            assert_eq!(format!("{mb}"), "Sent");
        }

        #[test]
        fn encoded_ascii_unchanged() {
            assert_eq!(Mailbox::new("Work/Projects").encoded(), "Work/Projects");
        }

        #[test]
        fn encoded_non_ascii() {
            assert_eq!(Mailbox::new("Привет").encoded(), "&BB8EQAQ4BDIENQRC-");
        }

        #[test]
        fn from_encoded() {
            let mb = Mailbox::from_encoded(b"&BB8EQAQ4BDIENQRC-").unwrap();
            assert_eq!(mb.as_str(), "Привет");
        }
    }

    mod mailbox_attribute_tests {
        use super::*;

        #[test]
        fn parse_case_insensitive() {
            assert_eq!(
                MailboxAttribute::parse("\\NoSelect"),
                MailboxAttribute::NoSelect
            );
            assert_eq!(
                MailboxAttribute::parse("\\NOSELECT"),
                MailboxAttribute::NoSelect
            );
        }

        #[test]
        fn parse_children_markers() {
            assert_eq!(
                MailboxAttribute::parse("\\HasNoChildren"),
                MailboxAttribute::HasNoChildren
            );
            assert_eq!(
                MailboxAttribute::parse("\\HasChildren"),
                MailboxAttribute::HasChildren
            );
        }

        #[test]
        fn parse_nonstandard_kept_verbatim() {
            let attr = MailboxAttribute::parse("\\Spam");
            assert_eq!(attr.as_str(), "\\Spam");
        }

        #[test]
        fn parse_unknown() {
            let attr = MailboxAttribute::parse("\\Custom");
            assert_eq!(attr, MailboxAttribute::Unknown("\\Custom".to_string()));
        }

        #[test]
        fn name_strips_backslash() {
            assert_eq!(MailboxAttribute::HasChildren.name(), "HasChildren");
            assert_eq!(MailboxAttribute::NoSelect.name(), "Noselect");
            assert_eq!(
                MailboxAttribute::Unknown("\\X-Custom".to_string()).name(),
                "X-Custom"
            );
            assert_eq!(
                MailboxAttribute::Unknown("plain".to_string()).name(),
                "plain"
            );
        }

        #[test]
        fn display_round_trips_through_parse() {
            for attr in [
                MailboxAttribute::NoInferiors,
                MailboxAttribute::Trash,
                MailboxAttribute::Important,
            ] {
                assert_eq!(MailboxAttribute::parse(&attr.to_string()), attr);
            }
        }
    }
}
