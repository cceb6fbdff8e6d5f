//! IMAP protocol parser.
//!
//! A sans-I/O parser for the server responses this crate consumes: tagged
//! completions, `* LIST`, `* STATUS` and `* SEARCH` data. Other untagged responses are
//! recognized and passed through as text.
//!
//! # Architecture
//!
//! - **Lexer**: Tokenizes raw bytes into IMAP tokens (atoms, strings, numbers, etc.)
//! - **Response Parser**: Builds structured response objects from tokens
//!
//! # Example
//!
//! ```
//! use mailkit_imap::parser::{Response, ResponseParser, UntaggedResponse};
//!
//! let response = ResponseParser::parse(b"* SEARCH 4 9\r\n").unwrap();
//! match response {
//!     Response::Untagged(UntaggedResponse::Search(uids)) => assert_eq!(uids.len(), 2),
//!     _ => panic!("Expected SEARCH data"),
//! }
//! ```

pub mod lexer;
pub mod response;

pub use lexer::{Lexer, Token};
pub use response::{Response, ResponseParser, Status, UntaggedResponse};
