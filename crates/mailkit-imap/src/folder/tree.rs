//! Nested folder tree and the flat children index.

use std::collections::HashMap;

use super::FolderRecord;

/// A folder and its subfolders.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FolderNode {
    /// The folder itself.
    pub record: FolderRecord,
    /// Direct subfolders, keyed by their last path segment.
    pub children: FolderTree,
}

impl FolderNode {
    /// Creates a node without children.
    #[must_use]
    pub fn new(record: FolderRecord) -> Self {
        Self {
            record,
            children: FolderTree::default(),
        }
    }
}

/// One level of the folder tree, keyed by path segment.
///
/// Entries keep the order in which they were attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FolderTree {
    nodes: Vec<FolderNode>,
}

impl FolderTree {
    /// Returns the number of folders at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if this level has no folders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a folder at this level by its last path segment.
    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&FolderNode> {
        self.nodes.iter().find(|n| n.record.name == segment)
    }

    fn get_mut(&mut self, segment: &str) -> Option<&mut FolderNode> {
        self.nodes.iter_mut().find(|n| n.record.name == segment)
    }

    /// Walks down the tree one segment at a time.
    pub fn descend<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Option<&FolderNode> {
        let mut segments = segments.into_iter();
        let mut node = self.get(segments.next()?)?;
        for segment in segments {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    /// Iterates over the folders at this level as `(segment, node)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FolderNode)> {
        self.nodes.iter().map(|n| (n.record.name.as_str(), n))
    }

    /// Visits every record in the tree, parents before children.
    pub fn records(&self) -> Vec<&FolderRecord> {
        let mut out = Vec::new();
        self.collect_records(&mut out);
        out
    }

    fn collect_records<'t>(&'t self, out: &mut Vec<&'t FolderRecord>) {
        for node in &self.nodes {
            out.push(&node.record);
            node.children.collect_records(out);
        }
    }

    pub(crate) fn push(&mut self, node: FolderNode) {
        self.nodes.push(node);
    }

    /// Inserts `node` under the folder reached by `parent_path`.
    ///
    /// Gives the node back if some segment of the path is missing.
    pub(crate) fn insert_under<'s>(
        &mut self,
        parent_path: impl IntoIterator<Item = &'s str>,
        node: FolderNode,
    ) -> Result<(), FolderNode> {
        let mut level = self;
        for segment in parent_path {
            match level.get_mut(segment) {
                Some(parent) => level = &mut parent.children,
                None => return Err(node),
            }
        }
        level.push(node);
        Ok(())
    }
}

/// Direct children of every attached folder, by full name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChildrenIndex {
    entries: HashMap<String, Vec<String>>,
}

impl ChildrenIndex {
    /// Returns the direct children of a folder in listing order.
    ///
    /// Unknown folders have no children.
    #[must_use]
    pub fn get(&self, full_name: &str) -> &[String] {
        self.entries
            .get(full_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns true if the folder is attached to the hierarchy.
    #[must_use]
    pub fn contains_key(&self, full_name: &str) -> bool {
        self.entries.contains_key(full_name)
    }

    /// Returns the number of attached folders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no folder is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(full_name, children)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub(crate) fn seed(&mut self, full_name: &str) {
        self.entries.insert(full_name.to_string(), Vec::new());
    }

    /// Appends a child to an attached parent. Returns false if the parent is not attached.
    pub(crate) fn attach(&mut self, parent: &str, child: &str) -> bool {
        match self.entries.get_mut(parent) {
            Some(children) => {
                children.push(child.to_string());
                true
            }
            None => false,
        }
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

    fn node(full_name: &str) -> FolderNode {
        FolderNode::new(FolderRecord::new(full_name, Vec::new(), Some('/')))
    }

    #[test]
    fn insert_and_descend() {
        let mut tree = FolderTree::default();
        tree.push(node("Work"));
        tree.insert_under(["Work"], node("Work/Projects")).unwrap();
        tree.insert_under(["Work", "Projects"], node("Work/Projects/2024"))
            .unwrap();

        let found = tree.descend(["Work", "Projects", "2024"]).unwrap();
        assert_eq!(found.record.full_name, "Work/Projects/2024");
        assert!(tree.descend(["Work", "Missing"]).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn insert_under_missing_parent_returns_node() {
        let mut tree = FolderTree::default();
        let rejected = tree.insert_under(["Ghost"], node("Ghost/Child")).unwrap_err();
        assert_eq!(rejected.record.full_name, "Ghost/Child");
        assert!(tree.is_empty());
    }

    #[test]
    fn records_are_preorder() {
        let mut tree = FolderTree::default();
        tree.push(node("A"));
        tree.push(node("B"));
        tree.insert_under(["A"], node("A/x")).unwrap();

        let names: Vec<&str> = tree
            .records()
            .into_iter()
            .map(|r| r.full_name.as_str())
            .collect();
        assert_eq!(names, ["A", "A/x", "B"]);
    }

    #[test]
    fn children_index_unknown_key_is_empty() {
        let mut index = ChildrenIndex::default();
        index.seed("Work");
        assert!(index.attach("Work", "Work/Projects"));
        assert!(!index.attach("Ghost", "Ghost/Child"));

        assert_eq!(index.get("Work"), ["Work/Projects".to_string()]);
        assert!(index.get("Ghost").is_empty());
        assert!(index.contains_key("Work"));
        assert!(!index.contains_key("Ghost"));
    }
}
