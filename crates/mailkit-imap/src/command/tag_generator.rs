//! IMAP command tag generator.
//!
//! Tags are used to match commands with their responses.

use crate::types::Tag;

/// Tag generator for IMAP commands.
///
/// Generates sequential tags in the format "A0001", "A0002", etc. The counter
/// wraps after `u32::MAX`; only commands in flight need distinct tags.
#[derive(Debug, Clone)]
pub struct TagGenerator {
    counter: u32,
    prefix: String,
}

impl TagGenerator {
    /// Creates a new tag generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            counter: 0,
            prefix: prefix.into(),
        }
    }

    /// Generates the next tag.
    pub fn next_tag(&mut self) -> Tag {
        self.counter = self.counter.wrapping_add(1);
        Tag::new(format!("{}{:04}", self.prefix, self.counter))
    }

    /// Returns the number of the last tag handed out, or 0 before the first.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.counter
    }

    /// Returns the tag prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self::new("A")
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

    #[test]
    fn test_tag_generation() {
        let mut generator = TagGenerator::default();
        assert_eq!(generator.next_tag().as_str(), "A0001");
        assert_eq!(generator.next_tag().as_str(), "A0002");
        assert_eq!(generator.next_tag().as_str(), "A0003");
    }

    #[test]
    fn test_custom_prefix() {
        let mut generator = TagGenerator::new("mk");
        assert_eq!(generator.next_tag().as_str(), "mk0001");
        assert_eq!(generator.prefix(), "mk");
    }

    #[test]
    fn test_current() {
        let mut generator = TagGenerator::default();
        assert_eq!(generator.current(), 0);
        let _ = generator.next_tag();
        assert_eq!(generator.current(), 1);
    }

    #[test]
    fn test_padding_grows_past_four_digits() {
        let mut generator = TagGenerator::new("X");
        for _ in 0..9_999 {
            let _ = generator.next_tag();
        }
        assert_eq!(generator.next_tag().as_str(), "X10000");
    }

    #[test]
    fn test_wraps_instead_of_overflowing() {
        let mut generator = TagGenerator {
            counter: u32::MAX - 1,
            prefix: "A".to_string(),
        };
        assert_eq!(generator.next_tag().as_str(), format!("A{}", u32::MAX));
        assert_eq!(generator.next_tag().as_str(), "A0000");
        assert_eq!(generator.next_tag().as_str(), "A0001");
    }
}
