//! Position mapping
//!
//! Tokens and regex matches report byte offsets into their source string,
//! while the raster projector reasons in characters. `CharSpan` records the
//! byte range and converts to character positions on demand.

use serde::{Deserialize, Serialize};

/// Represents a span of bytes in a source string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharSpan {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl CharSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Borrow the spanned text, or `None` if the span is not on char
    /// boundaries of `source`
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }

    /// Character index of the span start within `source`
    pub fn char_start(&self, source: &str) -> usize {
        char_offset(source, self.start)
    }

    /// Number of characters covered by the span
    pub fn char_len(&self, source: &str) -> usize {
        self.slice(source).map(|s| s.chars().count()).unwrap_or(0)
    }
}

/// Convert a byte offset to a character offset, clamping to the string end
pub fn char_offset(source: &str, byte_pos: usize) -> usize {
    source
        .char_indices()
        .take_while(|(pos, _)| *pos < byte_pos)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basics() {
        let span = CharSpan::new(2, 5);
        assert_eq!(span.len(), 3);
        assert!(span.contains(2));
        assert!(!span.contains(5));
        assert!(CharSpan::new(4, 4).is_empty());
    }

    #[test]
    fn test_slice() {
        let span = CharSpan::new(5, 8);
        assert_eq!(span.slice("This are wrong"), Some("are"));
        assert_eq!(CharSpan::new(0, 100).slice("short"), None);
    }

    #[test]
    fn test_char_offsets_multibyte() {
        let text = "café are";
        // "é" is two bytes, so "are" starts at byte 6 but char 5
        let span = CharSpan::new(6, 9);
        assert_eq!(span.slice(text), Some("are"));
        assert_eq!(span.char_start(text), 5);
        assert_eq!(span.char_len(text), 3);
        assert_eq!(char_offset(text, 1000), 8);
    }
}
