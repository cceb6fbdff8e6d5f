//! # mailkit-core
//!
//! Blocking folder session for an authenticated IMAP connection.
//!
//! This crate provides:
//! - [`Session`]: folder listing, navigation, CREATE/RENAME/DELETE, STATUS and SEARCH
//!   on top of the hierarchy and query builder from [`mailkit_imap`]
//! - [`Transport`]: the blocking command primitives a session needs
//! - [`WireTransport`]: a [`Transport`] over any `BufRead + Write` stream
//! - [`SessionConfig`]: LIST scope, read-only selection and search options
//!
//! ## Example
//!
//! ```no_run
//! use mailkit_core::{QueryBuilder, Session, WireTransport};
//!
//! # use std::io::{BufRead, Write};
//! # fn authenticated() -> std::io::Result<impl BufRead + Write> {
//! #     Ok(std::io::Cursor::new(Vec::new()))
//! # }
//! let stream = authenticated()?;
//! let mut session = Session::open(WireTransport::new(stream))?;
//!
//! session.select("INBOX")?;
//! let uids = session.search(&QueryBuilder::new().unseen().larger("1 MB")?)?;
//! println!("{} large unread messages", uids.len());
//! # Ok::<(), mailkit_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod session;
pub mod transport;
pub mod wire;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use error::{Error, Result, TransportError};
pub use mailkit_imap::{
    FolderHierarchy, FolderRecord, LiteralMode, MailboxStatus, QueryBuilder, SearchQuery, Uid,
};
pub use session::Session;
pub use transport::Transport;
pub use wire::WireTransport;
