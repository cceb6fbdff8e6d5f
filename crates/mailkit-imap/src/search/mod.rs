//! IMAP SEARCH criteria.
//!
//! [`QueryBuilder`] accumulates AND-ed search keys and produces a
//! [`SearchQuery`], handling value quoting, size units, date validation and
//! `CHARSET` selection for non-ASCII values.

mod builder;
mod date;
mod size;
mod token;

pub use builder::{QueryBuilder, SearchQuery, UTF8_CHARSET};
pub use date::{DateValue, check_date, format_date};
pub use size::{SizeValue, parse_size};
pub use token::{SearchToken, quote};
