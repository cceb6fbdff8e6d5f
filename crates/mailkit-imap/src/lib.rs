//! # mailkit-imap
//!
//! Sans-I/O building blocks for working with IMAP folders and searches.
//!
//! ## Features
//!
//! - **Modified UTF-7**: Encode and decode mailbox names (RFC 3501 §5.1.3)
//! - **Folder hierarchy**: Parse LIST lines into records, a nested tree and a
//!   children index, with orphaned folders reported instead of dropped silently
//! - **Search builder**: Fluent AND-only SEARCH criteria with value quoting,
//!   size units, date validation and `CHARSET UTF-8` for non-ASCII values
//! - **Commands and responses**: Serialization of the folder and search
//!   commands, and a parser for their responses
//!
//! ## Quick Start
//!
//! ```
//! use mailkit_imap::folder::FolderHierarchy;
//! use mailkit_imap::search::QueryBuilder;
//!
//! let folders = FolderHierarchy::build([
//!     r#"(\HasChildren) "/" "Work""#,
//!     r#"(\HasNoChildren) "/" "Work/&BB4EQgRHBFEEQgRL-""#,
//! ])?;
//! assert_eq!(folders.children("Work"), ["Work/Отчёты"]);
//!
//! let query = QueryBuilder::new().subject("Отчёт").unseen().query()?;
//! assert_eq!(query.charset(), Some("UTF-8"));
//! # Ok::<(), mailkit_imap::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`command`]: IMAP command builders and serialization
//! - [`folder`]: Folder listing parser and hierarchy
//! - [`parser`]: Sans-I/O response parser
//! - [`search`]: SEARCH query builder
//! - [`types`]: Core IMAP types (mailboxes, attributes, STATUS data, tags, UIDs)
//! - [`utf7`]: Modified UTF-7 codec

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
mod error;
pub mod folder;
pub mod parser;
pub mod search;
pub mod types;
pub mod utf7;

pub use command::{Command, LiteralMode, TagGenerator};
pub use error::{Error, Result};
pub use folder::{ChildrenIndex, FolderHierarchy, FolderNode, FolderRecord, FolderTree, RawListing};
pub use parser::{Response, ResponseParser, Status, UntaggedResponse};
pub use search::{QueryBuilder, SearchQuery, SearchToken};
pub use types::{
    ListResponse, Mailbox, MailboxAttribute, MailboxStatus, StatusAttribute, Tag, Uid,
};
