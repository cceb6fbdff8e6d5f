//! Glob matching for folder lookup.
//!
//! `*` matches any run of characters, `\*` matches a literal asterisk.
//! Everything else matches itself.

#[derive(Debug, PartialEq, Eq)]
enum Piece {
    Literal(char),
    Any,
}

/// A compiled folder name pattern.
#[derive(Debug)]
pub struct Pattern {
    pieces: Vec<Piece>,
}

impl Pattern {
    /// Compiles a pattern.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let mut pieces = Vec::new();
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'*') => {
                    chars.next();
                    pieces.push(Piece::Literal('*'));
                }
                '*' => {
                    if pieces.last() != Some(&Piece::Any) {
                        pieces.push(Piece::Any);
                    }
                }
                c => pieces.push(Piece::Literal(c)),
            }
        }
        Self { pieces }
    }

    /// Returns true if the whole of `text` matches.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let text: Vec<char> = text.chars().collect();
        let (mut p, mut t) = (0, 0);
        // Last `*` seen and the text position it was tried at
        let mut backtrack: Option<(usize, usize)> = None;

        while t < text.len() {
            match self.pieces.get(p) {
                Some(Piece::Literal(c)) if *c == text[t] => {
                    p += 1;
                    t += 1;
                }
                Some(Piece::Any) => {
                    backtrack = Some((p, t));
                    p += 1;
                }
                _ => match backtrack {
                    Some((star, tried)) => {
                        p = star + 1;
                        t = tried + 1;
                        backtrack = Some((star, tried + 1));
                    }
                    None => return false,
                },
            }
        }

        self.pieces[p..].iter().all(|piece| *piece == Piece::Any)
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
    fn literal_only() {
        assert!(Pattern::new("Inbox").matches("Inbox"));
        assert!(!Pattern::new("Inbox").matches("Inbox2"));
        assert!(!Pattern::new("Inbox").matches("inbox"));
    }

    #[test]
    fn wildcards() {
        assert!(Pattern::new("*").matches(""));
        assert!(Pattern::new("*").matches("anything"));
        assert!(Pattern::new("Pro*").matches("Projects"));
        assert!(Pattern::new("*cts").matches("Projects"));
        assert!(Pattern::new("P*j*s").matches("Projects"));
        assert!(!Pattern::new("P*x*s").matches("Projects"));
        assert!(Pattern::new("a*b").matches("aXbYb"));
    }

    #[test]
    fn escaped_asterisk() {
        assert!(Pattern::new(r"Star\*").matches("Star*"));
        assert!(!Pattern::new(r"Star\*").matches("Stars"));
        assert!(Pattern::new(r"\**").matches("*important"));
    }

    #[test]
    fn non_ascii() {
        assert!(Pattern::new("Entw*").matches("Entwürfe"));
        assert!(Pattern::new("*фе").matches("Кафе"));
    }
}
