use pipecheck_common::Position;

/// Low-level character reader over scalar text.
///
/// Tracks the current position (0-based line and character, byte offset)
/// and provides peek/advance primitives for the reference scanner.
pub struct Cursor<'src> {
    source: &'src str,
    chars: std::str::Chars<'src>,
    /// Byte offset of the *next* character to be consumed.
    offset: usize,
    line: u32,
    character: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.chars(),
            offset: 0,
            line: 0,
            character: 0,
        }
    }

    /// Current position relative to the start of the text.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            character: self.character,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Peek at the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Peek at the character after the next one.
    pub fn peek_second(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next()
    }

    /// True if the next two characters are `first` then `second`.
    pub fn at_pair(&self, first: char, second: char) -> bool {
        self.peek() == Some(first) && self.peek_second() == Some(second)
    }

    /// Consume and return the next character.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.character = 0;
        } else {
            self.character += 1;
        }
        Some(ch)
    }

    /// True if there are no more characters.
    pub fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    /// Slice the text from byte offset `start` to the current offset.
    pub fn slice_from(&self, start: usize) -> &'src str {
        &self.source[start..self.offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_lines_and_characters() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.position(), Position::new(0, 2));
        cursor.advance();
        assert_eq!(cursor.position(), Position::new(1, 0));
        cursor.advance();
        assert_eq!(cursor.position(), Position::new(1, 1));
        assert_eq!(cursor.slice_from(0), "ab\nc");
    }

    #[test]
    fn multibyte_counts_one_character() {
        let mut cursor = Cursor::new("é<<");
        cursor.advance();
        assert_eq!(cursor.position(), Position::new(0, 1));
        assert_eq!(cursor.offset(), 2);
        assert!(cursor.at_pair('<', '<'));
    }
}
