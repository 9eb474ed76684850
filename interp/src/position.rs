/// Keep track of a position within a str. Copies are cheap, so backtracking
/// is just holding on to an earlier position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position<'i> {
    input: &'i str,
    idx: usize,
}

impl<'i> Position<'i> {
    /// A position at the start of `input`.
    pub fn new(input: &'i str) -> Self {
        Position { input, idx: 0 }
    }

    pub fn input(&self) -> &'i str {
        self.input
    }

    /// Byte offset into the input.
    pub fn offset(&self) -> usize {
        self.idx
    }

    /// The input not yet consumed.
    pub fn rest(&self) -> &'i str {
        &self.input[self.idx..]
    }

    pub fn is_end(&self) -> bool {
        self.idx == self.input.len()
    }

    /// Check if a string matches the current input starting at the current
    /// index. The index will be updated on match.
    pub fn match_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.idx += s.len();
            true
        } else {
            false
        }
    }

    /// Consume a single char.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.idx += c.len_utf8();
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(input: &str, idx: usize) -> Position {
        Position { input, idx }
    }

    #[test]
    fn position_match_str_simple() {
        let tests = vec![
            ("", 0, "", true),
            ("hello", 0, "world", false),
            ("hello", 0, "hello", true),
            ("hello", 0, "ello", false),
            ("hello", 1, "ello", true),
            ("hello", 5, "", true),
            ("hell", 0, "hello", false),
        ];
        for test in tests {
            let mut c = at(test.0, test.1);
            let got = c.match_str(test.2);
            assert_eq!(got, test.3, "test case: {:?}", test);
        }
    }

    #[test]
    fn position_match_str_idx_multiple() {
        let mut c = Position::new("hello");
        let got1 = c.match_str("he");
        let got2 = c.match_str("llo");
        assert!(got1);
        assert!(got2, "cursor: {:?}", c);
        assert!(c.is_end());
    }

    #[test]
    fn position_failed_match_keeps_index() {
        let mut c = at("hello", 2);
        assert!(!c.match_str("xx"));
        assert_eq!(c.offset(), 2);
        assert_eq!(c.rest(), "llo");
    }

    #[test]
    fn position_next_char_multibyte() {
        let mut c = Position::new("é!");
        assert_eq!(c.next_char(), Some('é'));
        assert_eq!(c.offset(), 2);
        assert_eq!(c.next_char(), Some('!'));
        assert_eq!(c.next_char(), None);
        assert_eq!(c.offset(), 3);
    }
}
