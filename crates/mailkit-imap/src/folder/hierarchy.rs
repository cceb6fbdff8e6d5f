//! Folder hierarchy assembly.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::{ChildrenIndex, FolderNode, FolderRecord, FolderTree, Pattern, RawListing};
use crate::Result;

/// The folders of one mailbox listing, flat and as a tree.
///
/// Built wholesale from a LIST response. The tree and the children index only
/// contain folders whose every ancestor was also listed; the rest are
/// reported by [`FolderHierarchy::orphans`] but still appear in
/// [`FolderHierarchy::names`].
///
/// # Example
///
/// ```
/// use mailkit_imap::folder::FolderHierarchy;
///
/// let hierarchy = FolderHierarchy::build([
///     r#"(\HasNoChildren) "/" "INBOX""#,
///     r#"(\HasChildren) "/" "Work""#,
///     r#"(\HasNoChildren) "/" "Work/Projects""#,
/// ])
/// .unwrap();
///
/// assert_eq!(hierarchy.names().collect::<Vec<_>>(), ["INBOX", "Work", "Work/Projects"]);
/// assert_eq!(hierarchy.children("Work"), ["Work/Projects"]);
/// assert_eq!(hierarchy.parent_name("Work/Projects"), "Work");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderHierarchy {
    separator: Option<char>,
    records: Vec<FolderRecord>,
    positions: HashMap<String, usize>,
    tree: FolderTree,
    children: ChildrenIndex,
    orphans: Vec<String>,
}

impl FolderHierarchy {
    /// Parses raw LIST lines and assembles the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FolderParsing`] for the first line that does not
    /// parse. Nothing is built in that case.
    pub fn build<I>(raw: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<RawListing>,
    {
        let listings = raw
            .into_iter()
            .map(|line| line.into().parse())
            .collect::<Result<Vec<_>>>()?;

        let separator = listings.iter().find_map(|l| l.delimiter);

        let mut records = Vec::with_capacity(listings.len());
        let mut seen = HashSet::with_capacity(listings.len());
        for listing in listings {
            let record = FolderRecord::from_listing(listing, separator);
            if seen.insert(record.full_name.clone()) {
                records.push(record);
            } else {
                warn!(folder = %record.full_name, "Duplicate folder in listing, keeping the first");
            }
        }

        Ok(Self::assemble(separator, records))
    }

    /// Rebuilds the hierarchy from a fresh listing.
    ///
    /// The current state is replaced only if the new listing parses.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FolderParsing`] as [`FolderHierarchy::build`]
    /// does, leaving `self` untouched.
    pub fn refresh<I>(&mut self, raw: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<RawListing>,
    {
        *self = Self::build(raw)?;
        Ok(())
    }

    fn assemble(separator: Option<char>, records: Vec<FolderRecord>) -> Self {
        let mut order: Vec<usize> = (0..records.len()).collect();
        // Stable: parents before children, listing order within a depth
        order.sort_by_key(|&i| records[i].depth);

        let mut tree = FolderTree::default();
        let mut children = ChildrenIndex::default();
        let mut orphans = Vec::new();

        for i in order {
            let record = &records[i];
            let node = FolderNode::new(record.clone());

            match (&record.parent_name, separator) {
                (Some(parent), Some(sep)) if children.contains_key(parent) => {
                    if tree.insert_under(parent.split(sep), node).is_ok() {
                        children.attach(parent, &record.full_name);
                        children.seed(&record.full_name);
                    } else {
                        orphans.push(record.full_name.clone());
                    }
                }
                (Some(_), _) => orphans.push(record.full_name.clone()),
                (None, _) => {
                    tree.push(node);
                    children.seed(&record.full_name);
                }
            }
        }

        for orphan in &orphans {
            warn!(folder = %orphan, "Folder's parent is not listed, leaving it out of the tree");
        }

        let positions = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.full_name.clone(), i))
            .collect();

        debug!(
            folders = records.len(),
            orphans = orphans.len(),
            separator = ?separator,
            "Built folder hierarchy"
        );

        Self {
            separator,
            records,
            positions,
            tree,
            children,
            orphans,
        }
    }

    /// Returns the hierarchy separator of the listing.
    #[must_use]
    pub const fn separator(&self) -> Option<char> {
        self.separator
    }

    /// Full names of all listed folders, in listing order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.full_name.as_str())
    }

    /// All listed folders, in listing order.
    #[must_use]
    pub fn records(&self) -> &[FolderRecord] {
        &self.records
    }

    /// Looks up a folder by full name.
    #[must_use]
    pub fn record(&self, full_name: &str) -> Option<&FolderRecord> {
        self.positions.get(full_name).map(|&i| &self.records[i])
    }

    /// Returns true if the folder was listed.
    #[must_use]
    pub fn contains(&self, full_name: &str) -> bool {
        self.positions.contains_key(full_name)
    }

    /// Returns the number of listed folders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the listing was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The nested folder tree.
    #[must_use]
    pub const fn tree(&self) -> &FolderTree {
        &self.tree
    }

    /// Direct children of every attached folder.
    #[must_use]
    pub const fn children_index(&self) -> &ChildrenIndex {
        &self.children
    }

    /// Direct children of a folder, in listing order. Empty for unknown folders.
    #[must_use]
    pub fn children(&self, full_name: &str) -> &[String] {
        self.children.get(full_name)
    }

    /// Full name of the folder's parent, or the name itself at the top level.
    #[must_use]
    pub fn parent_name<'n>(&self, full_name: &'n str) -> &'n str {
        self.separator
            .and_then(|sep| full_name.rsplit_once(sep))
            .map_or(full_name, |(parent, _)| parent)
    }

    /// Folders left out of the tree because an ancestor was not listed.
    #[must_use]
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    /// Full names of folders whose last path segment matches `pattern`.
    ///
    /// `*` matches any run of characters and `\*` a literal asterisk.
    #[must_use]
    pub fn find(&self, pattern: &str) -> Vec<&str> {
        let pattern = Pattern::new(pattern);
        self.records
            .iter()
            .filter(|r| pattern.matches(&r.name))
            .map(|r| r.full_name.as_str())
            .collect()
    }

    /// Splits the hierarchy into its flat name list, tree and children index.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, FolderTree, ChildrenIndex) {
        let names = self.records.into_iter().map(|r| r.full_name).collect();
        (names, self.tree, self.children)
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
    use crate::Error;
    use crate::types::MailboxAttribute;

    fn build(lines: &[&str]) -> FolderHierarchy {
        FolderHierarchy::build(lines.iter().copied()).unwrap()
    }

    #[test]
    fn basic_listing() {
        let h = build(&[
            r#"(\HasNoChildren) "/" "INBOX""#,
            r#"(\HasChildren) "/" "Work""#,
            r#"(\HasNoChildren) "/" "Work/Projects""#,
        ]);

        assert_eq!(h.names().collect::<Vec<_>>(), ["INBOX", "Work", "Work/Projects"]);
        assert_eq!(h.children("Work"), ["Work/Projects"]);
        assert!(h.children("INBOX").is_empty());
        assert_eq!(h.parent_name("Work/Projects"), "Work");
        assert_eq!(h.parent_name("Work"), "Work");
        assert_eq!(h.separator(), Some('/'));
        assert!(h.orphans().is_empty());
    }

    #[test]
    fn children_listed_before_parents() {
        let h = build(&[
            r#"() "." "A.B.C""#,
            r#"() "." "A.B""#,
            r#"() "." "A""#,
            r#"() "." "A.D""#,
        ]);

        assert_eq!(h.children("A"), ["A.B", "A.D"]);
        assert_eq!(h.children("A.B"), ["A.B.C"]);
        let node = h.tree().descend(["A", "B", "C"]).unwrap();
        assert_eq!(node.record.depth, 2);
        assert_eq!(node.record.parent_name.as_deref(), Some("A.B"));
    }

    #[test]
    fn orphans_are_reported_not_fatal() {
        let h = build(&[
            r#"() "/" "INBOX""#,
            r#"() "/" "Ghost/Child""#,
            r#"() "/" "Ghost/Child/Grandchild""#,
        ]);

        assert_eq!(h.len(), 3);
        assert!(h.contains("Ghost/Child"));
        assert_eq!(h.orphans(), ["Ghost/Child", "Ghost/Child/Grandchild"]);
        assert!(!h.children_index().contains_key("Ghost/Child"));
        assert!(h.tree().get("Ghost").is_none());
        assert_eq!(h.tree().len(), 1);
    }

    #[test]
    fn duplicates_keep_first() {
        let h = build(&[
            r#"(\HasNoChildren) "/" "INBOX""#,
            r#"(\Marked) "/" "INBOX""#,
        ]);

        assert_eq!(h.len(), 1);
        assert_eq!(
            h.record("INBOX").unwrap().attributes,
            vec![MailboxAttribute::HasNoChildren]
        );
    }

    #[test]
    fn separator_from_first_non_nil_line() {
        let h = build(&[r#"(\Noinferiors) NIL "INBOX""#, r#"() "." "Lists.Rust""#]);

        assert_eq!(h.separator(), Some('.'));
        assert_eq!(h.children("Lists"), Vec::<String>::new().as_slice());
        assert_eq!(h.orphans(), ["Lists.Rust"]);
    }

    #[test]
    fn no_separator_means_flat() {
        let h = build(&[r#"() NIL "INBOX""#, r#"() NIL "Work/Projects""#]);

        assert_eq!(h.separator(), None);
        assert_eq!(h.tree().len(), 2);
        assert_eq!(h.parent_name("Work/Projects"), "Work/Projects");
    }

    #[test]
    fn bad_line_fails_whole_build() {
        let err = FolderHierarchy::build([r#"() "/" "INBOX""#, "nonsense"]).unwrap_err();
        assert!(matches!(err, Error::FolderParsing { ref line, .. } if line == "nonsense"));
    }

    #[test]
    fn refresh_is_atomic() {
        let mut h = build(&[r#"() "/" "INBOX""#]);

        assert!(h.refresh(["broken"]).is_err());
        assert_eq!(h.names().collect::<Vec<_>>(), ["INBOX"]);

        h.refresh([r#"() "/" "Sent""#]).unwrap();
        assert_eq!(h.names().collect::<Vec<_>>(), ["Sent"]);
    }

    #[test]
    fn find_matches_last_segment() {
        let h = build(&[
            r#"() "/" "INBOX""#,
            r#"() "/" "Work""#,
            r#"() "/" "Work/Projects""#,
            r#"() "/" "Work/Proposals""#,
            r#"() "/" "Archive/Projects""#,
        ]);

        assert_eq!(h.find("Pro*"), ["Work/Projects", "Work/Proposals", "Archive/Projects"]);
        assert_eq!(h.find("Work"), ["Work"]);
        assert!(h.find("Nothing*").is_empty());
    }

    #[test]
    fn into_parts() {
        let (names, tree, index) =
            build(&[r#"() "/" "Work""#, r#"() "/" "Work/Projects""#]).into_parts();

        assert_eq!(names, ["Work", "Work/Projects"]);
        assert!(tree.get("Work").unwrap().children.get("Projects").is_some());
        assert_eq!(index.get("Work"), ["Work/Projects"]);
    }
}
