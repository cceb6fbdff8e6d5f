//! Error types for the IMAP library.

use thiserror::Error;

/// Errors that can occur while parsing listings, encoding names or building
/// search queries.
#[derive(Debug, Error)]
pub enum Error {
    /// A LIST line did not match the folder listing grammar.
    #[error("Couldn't parse folder info from {line:?}: {reason}")]
    FolderParsing {
        /// The offending line, lossily decoded for display.
        line: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A message size was given in an unknown format.
    #[error(
        "Incorrect format used to define message size: {value:?}. Please use an integer \
         number followed by one of: B, Byte, Bytes, KB, Kilobyte, Kilobytes, MB, Megabyte, \
         Megabytes, GB, Gigabyte, Gigabytes"
    )]
    SizeParsing {
        /// The rejected size value.
        value: String,
    },

    /// A search date was not in `D-Mon-YYYY` form.
    #[error("Wrong date format used: {value:?}. Please use \"en-US\" date format, for example: {example:?}")]
    WrongDateFormat {
        /// The rejected date value.
        value: String,
        /// A correctly formatted example date.
        example: String,
    },

    /// More than one search parameter contains non-ASCII characters.
    #[error("Searching using more than 1 parameter containing non-ascii characters is not supported: {values:?}")]
    SearchSyntaxNotSupported {
        /// The distinct non-ASCII parameter values.
        values: Vec<String>,
    },

    /// Modified UTF-7 data could not be decoded.
    #[error("Invalid modified UTF-7: {message}")]
    Utf7 {
        /// Description of what went wrong.
        message: String,
    },

    /// Protocol parsing error.
    #[error("Protocol error at position {position}: {message}")]
    Parse {
        /// Byte position where the error occurred.
        position: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// Server returned NO response.
    #[error("Server returned NO: {0}")]
    No(String),

    /// Server returned BAD response.
    #[error("Server returned BAD: {0}")]
    Bad(String),

    /// Protocol violation or unexpected data.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
