use serde::{Deserialize, Serialize};

/// Position within a document (0-based line, 0-based character).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// 0-based line number.
    pub line: u32,
    /// 0-based character offset within the line.
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A range in a document, from `start` (inclusive) to `end` (exclusive).
///
/// `Range::default()` doubles as the "absent" sentinel for optional blocks
/// that the parser did not find in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Shorthand for a range given as four coordinates.
    pub fn from_coords(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
        Self {
            start: Position::new(start_line, start_char),
            end: Position::new(end_line, end_char),
        }
    }

    /// True for the sentinel range used when a block is absent.
    pub fn is_default(&self) -> bool {
        *self == Range::default()
    }

    /// Whether `pos` falls inside this range (start inclusive, end exclusive).
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Human output is 1-based like every editor status bar.
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_sentinel() {
        assert!(Range::default().is_default());
        assert!(!Range::from_coords(0, 0, 0, 1).is_default());
    }

    #[test]
    fn contains_is_end_exclusive() {
        let range = Range::from_coords(2, 4, 5, 0);
        assert!(range.contains(Position::new(2, 4)));
        assert!(range.contains(Position::new(4, 100)));
        assert!(!range.contains(Position::new(5, 0)));
        assert!(!range.contains(Position::new(2, 3)));
    }

    #[test]
    fn display_is_one_based() {
        assert_eq!(Range::from_coords(0, 0, 1, 3).to_string(), "1:1-2:4");
    }
}
