//! Mailbox folder hierarchy.
//!
//! Turns the raw lines of a LIST response into flat [`FolderRecord`]s, a
//! nested [`FolderTree`] and a [`ChildrenIndex`].

mod hierarchy;
mod listing;
mod pattern;
mod record;
mod tree;

pub use hierarchy::FolderHierarchy;
pub use listing::RawListing;
pub use pattern::Pattern;
pub use record::FolderRecord;
pub use tree::{ChildrenIndex, FolderNode, FolderTree};
