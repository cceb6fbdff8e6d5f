//! Flat folder records.

use crate::types::{ListResponse, MailboxAttribute};

/// One folder from a listing, with its position in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FolderRecord {
    /// Full path, unique within a listing.
    pub full_name: String,
    /// Last path segment.
    pub name: String,
    /// Attributes reported by the server.
    pub attributes: Vec<MailboxAttribute>,
    /// Full path of the parent, if any.
    pub parent_name: Option<String>,
    /// Number of separators in the full path.
    pub depth: usize,
}

impl FolderRecord {
    /// Creates a record, deriving name, parent and depth from `full_name`.
    #[must_use]
    pub fn new(
        full_name: impl Into<String>,
        attributes: Vec<MailboxAttribute>,
        separator: Option<char>,
    ) -> Self {
        let full_name = full_name.into();
        let (name, parent_name, depth) = match separator {
            Some(sep) => match full_name.rsplit_once(sep) {
                Some((parent, name)) => (
                    name.to_string(),
                    Some(parent.to_string()),
                    full_name.matches(sep).count(),
                ),
                None => (full_name.clone(), None, 0),
            },
            None => (full_name.clone(), None, 0),
        };

        Self {
            full_name,
            name,
            attributes,
            parent_name,
            depth,
        }
    }

    /// Creates a record from a parsed LIST response.
    ///
    /// The hierarchy separator is the one shared by the whole listing, not
    /// necessarily the one on this line.
    #[must_use]
    pub fn from_listing(listing: ListResponse, separator: Option<char>) -> Self {
        Self::new(listing.mailbox.0, listing.attributes, separator)
    }

    /// Attribute names with the leading backslash stripped.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(MailboxAttribute::name)
    }

    /// Returns true if the server reported the attribute.
    #[must_use]
    pub fn has_attribute(&self, attribute: &MailboxAttribute) -> bool {
        self.attributes.contains(attribute)
    }

    /// Returns true if the folder can be selected.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self
            .attributes
            .iter()
            .any(|a| matches!(a, MailboxAttribute::NoSelect | MailboxAttribute::NonExistent))
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

    #[test]
    fn top_level() {
        let record = FolderRecord::new("INBOX", vec![MailboxAttribute::HasNoChildren], Some('/'));
        assert_eq!(record.name, "INBOX");
        assert_eq!(record.parent_name, None);
        assert_eq!(record.depth, 0);
    }

    #[test]
    fn nested() {
        let record = FolderRecord::new("Work/Projects/2024", Vec::new(), Some('/'));
        assert_eq!(record.name, "2024");
        assert_eq!(record.parent_name.as_deref(), Some("Work/Projects"));
        assert_eq!(record.depth, 2);
    }

    #[test]
    fn no_separator() {
        let record = FolderRecord::new("Work/Projects", Vec::new(), None);
        assert_eq!(record.name, "Work/Projects");
        assert_eq!(record.parent_name, None);
        assert_eq!(record.depth, 0);
    }

    #[test]
    fn attribute_names_strip_backslash() {
        let record = FolderRecord::new(
            "Work",
            vec![
                MailboxAttribute::HasChildren,
                MailboxAttribute::NoSelect,
                MailboxAttribute::Unknown("\\X-Label".to_string()),
            ],
            Some('/'),
        );
        let names: Vec<&str> = record.attribute_names().collect();
        assert_eq!(names, ["HasChildren", "Noselect", "X-Label"]);
        assert!(!record.is_selectable());
        assert!(record.has_attribute(&MailboxAttribute::HasChildren));
    }
}
