//! Line-tracking character scanner used by the log parser.

/// A single-character lookahead scanner over a string.
///
/// The cursor always points at one "current" character. Nothing is consumed
/// until [`Cursor::advance`] (or one of the run helpers) is called. Character
/// sets are given as `&str`; a character matches when the set contains it.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    chars: std::str::Chars<'a>,
    current: Option<char>,
    line: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned on the first character of `input`, on line 1.
    pub fn new(input: &'a str) -> Self {
        let mut chars = input.chars();
        let current = chars.next();
        Self {
            chars,
            current,
            line: 1,
        }
    }

    /// The current character, or `None` at end of input.
    pub const fn current(&self) -> Option<char> {
        self.current
    }

    /// True once every character has been consumed.
    pub const fn at_end(&self) -> bool {
        self.current.is_none()
    }

    /// The 1-based line the current character sits on.
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Consumes the current character. Does nothing at end of input.
    pub fn advance(&mut self) {
        if self.current == Some('\n') {
            self.line += 1;
        }
        if self.current.is_some() {
            self.current = self.chars.next();
        }
    }

    /// Whether the current character is in `set`. Always false at end of input.
    pub fn matches(&self, set: &str) -> bool {
        self.current.is_some_and(|c| set.contains(c))
    }

    /// Consumes characters for as long as they are in `set`.
    pub fn eat(&mut self, set: &str) {
        while self.matches(set) {
            self.advance();
        }
    }

    /// Consumes characters up to, but not including, the first one in `set`.
    pub fn eat_until(&mut self, set: &str) {
        while !self.at_end() && !self.matches(set) {
            self.advance();
        }
    }

    /// Like [`Cursor::eat_until`], but appends the skipped characters to `buf`.
    pub fn read_until(&mut self, set: &str, buf: &mut String) {
        while let Some(c) = self.current {
            if set.contains(c) {
                break;
            }
            buf.push(c);
            self.advance();
        }
    }

    /// Consumes at most `limit` characters from `set`, appending them to `buf`.
    ///
    /// Returns true if at least one character was consumed.
    pub fn read_match_limit(&mut self, set: &str, buf: &mut String, limit: usize) -> bool {
        let mut taken = 0;
        while taken < limit {
            match self.current {
                Some(c) if set.contains(c) => {
                    buf.push(c);
                    self.advance();
                    taken += 1;
                }
                _ => break,
            }
        }
        taken > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_starts_at_end() {
        let cursor = Cursor::new("");
        assert!(cursor.at_end());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.line(), 1);
    }

    #[test]
    fn test_line_advances_only_when_newline_is_consumed() {
        let mut cursor = Cursor::new("a\nb");
        cursor.advance();
        assert_eq!(cursor.current(), Some('\n'));
        assert_eq!(cursor.line(), 1);
        cursor.advance();
        assert_eq!(cursor.current(), Some('b'));
        assert_eq!(cursor.line(), 2);
        cursor.advance();
        assert!(cursor.at_end());
        cursor.advance();
        assert_eq!(cursor.line(), 2);
    }

    #[test]
    fn test_eat_skips_a_run_of_the_set() {
        let mut cursor = Cursor::new(" \t \tx");
        cursor.eat(" \t");
        assert_eq!(cursor.current(), Some('x'));
    }

    #[test]
    fn test_eat_until_stops_on_delimiter_without_consuming_it() {
        let mut cursor = Cursor::new("# comment\nnext");
        cursor.eat_until("\n");
        assert_eq!(cursor.current(), Some('\n'));
        assert_eq!(cursor.line(), 1);
    }

    #[test]
    fn test_read_until_collects_characters_before_delimiter() {
        let mut cursor = Cursor::new("Project:Sub] rest");
        let mut buf = String::new();
        cursor.read_until("]\n", &mut buf);
        assert_eq!(buf, "Project:Sub");
        assert_eq!(cursor.current(), Some(']'));
    }

    #[test]
    fn test_read_until_runs_to_end_without_delimiter() {
        let mut cursor = Cursor::new("no delimiter");
        let mut buf = String::new();
        cursor.read_until("\n", &mut buf);
        assert_eq!(buf, "no delimiter");
        assert!(cursor.at_end());
    }

    #[test]
    fn test_read_match_limit_respects_limit() {
        let mut cursor = Cursor::new("20230");
        let mut buf = String::new();
        assert!(cursor.read_match_limit("0123456789", &mut buf, 4));
        assert_eq!(buf, "2023");
        assert_eq!(cursor.current(), Some('0'));
    }

    #[test]
    fn test_read_match_limit_reports_no_match() {
        let mut cursor = Cursor::new("/07");
        let mut buf = String::new();
        assert!(!cursor.read_match_limit("0123456789", &mut buf, 2));
        assert!(buf.is_empty());
        assert!(cursor.matches("/-."));
    }
}
