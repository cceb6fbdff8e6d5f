//! Message size values for `LARGER` and `SMALLER`.
//!
//! Units are decimal: `1kb` is 1000 bytes.

use crate::{Error, Result};

const UNITS: &[(&str, u64)] = &[
    ("", 1),
    ("b", 1),
    ("byte", 1),
    ("bytes", 1),
    ("kb", 1_000),
    ("kilobyte", 1_000),
    ("kilobytes", 1_000),
    ("mb", 1_000_000),
    ("megabyte", 1_000_000),
    ("megabytes", 1_000_000),
    ("gb", 1_000_000_000),
    ("gigabyte", 1_000_000_000),
    ("gigabytes", 1_000_000_000),
];

/// A value accepted as a message size.
pub trait SizeValue {
    /// Returns the size in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeParsing`] if the value is not a size.
    fn to_bytes(&self) -> Result<u64>;
}

impl SizeValue for u64 {
    fn to_bytes(&self) -> Result<u64> {
        Ok(*self)
    }
}

impl SizeValue for u32 {
    fn to_bytes(&self) -> Result<u64> {
        Ok(u64::from(*self))
    }
}

impl SizeValue for usize {
    fn to_bytes(&self) -> Result<u64> {
        u64::try_from(*self).map_err(|_| Error::SizeParsing {
            value: self.to_string(),
        })
    }
}

impl SizeValue for &str {
    fn to_bytes(&self) -> Result<u64> {
        parse_size(self)
    }
}

impl SizeValue for String {
    fn to_bytes(&self) -> Result<u64> {
        parse_size(self)
    }
}

/// Parses a size such as `"10"`, `"1kb"` or `"5 Megabytes"` into bytes.
///
/// # Errors
///
/// Returns [`Error::SizeParsing`] for a non-integer amount, an unknown unit or
/// a size that does not fit in 64 bits.
pub fn parse_size(value: &str) -> Result<u64> {
    let err = || Error::SizeParsing {
        value: value.to_string(),
    };

    let normalized = value
        .trim_matches(|c| matches!(c, '"' | '\'' | ' '))
        .to_lowercase();
    let split = normalized
        .find(|c: char| c.is_alphabetic())
        .unwrap_or(normalized.len());
    let (amount, unit) = normalized.split_at(split);

    let amount = amount.trim();
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    let amount: u64 = amount.parse().map_err(|_| err())?;

    let unit = unit.trim();
    let multiplier = UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|&(_, m)| m)
        .ok_or_else(err)?;

    amount.checked_mul(multiplier).ok_or_else(err)
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
    fn unit_table() {
        assert_eq!(parse_size("1kb").unwrap(), 1000);
        assert_eq!(parse_size("5 Megabytes").unwrap(), 5_000_000);
        assert_eq!(parse_size("3Gigabyte").unwrap(), 3_000_000_000);
        assert_eq!(parse_size("10").unwrap(), 10);
        assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
        assert_eq!(parse_size("7 bytes").unwrap(), 7);
        assert_eq!(parse_size("2 KILOBYTES").unwrap(), 2000);
    }

    #[test]
    fn surrounding_quotes_and_spaces() {
        assert_eq!(parse_size("\"2 kb\"").unwrap(), 2000);
        assert_eq!(parse_size(" '3b' ").unwrap(), 3);
    }

    #[test]
    fn rejected_values() {
        for value in ["5 boobabytes", "5.5 GB", "5 GBKB", "", "kb", "-1", "1 0 kb"] {
            let err = parse_size(value).unwrap_err();
            assert!(
                matches!(err, Error::SizeParsing { value: ref v } if v == value),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn overflow_is_rejected() {
        assert!(parse_size("18446744073709551615 gb").is_err());
    }

    #[test]
    fn error_lists_units() {
        let message = parse_size("5 boobabytes").unwrap_err().to_string();
        assert!(message.contains("Kilobytes"));
        assert!(message.contains("Gigabyte"));
    }

    #[test]
    fn integer_values() {
        assert_eq!(42u32.to_bytes().unwrap(), 42);
        assert_eq!(42u64.to_bytes().unwrap(), 42);
        assert_eq!("42 kb".to_bytes().unwrap(), 42_000);
    }
}
