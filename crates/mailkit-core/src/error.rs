//! Error types for the core library.

use thiserror::Error;

/// Boxed error raised by a [`Transport`](crate::Transport) implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in session operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Protocol, parsing or query error from the IMAP layer.
    #[error("IMAP error: {0}")]
    Imap(#[from] mailkit_imap::Error),

    /// Failure inside a custom transport.
    #[error("Transport error: {0}")]
    Transport(#[source] TransportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The folder is not part of the current hierarchy.
    #[error("Folder does not exist: {0:?}")]
    NonexistentFolder(String),

    /// A new folder name contains the hierarchy separator.
    #[error("Folder name {name:?} cannot contain separator symbol: {separator}")]
    InvalidFolderName {
        /// The rejected name.
        name: String,
        /// The hierarchy separator.
        separator: char,
    },

    /// The operation needs a selected folder.
    #[error("No folder selected")]
    NoFolderSelected,
}

impl Error {
    /// Wraps an arbitrary error raised by a transport.
    #[must_use]
    pub fn transport(err: impl Into<TransportError>) -> Self {
        Self::Transport(err.into())
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
