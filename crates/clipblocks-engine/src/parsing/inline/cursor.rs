/// A byte cursor for inline parsing, bounded to `[i, end)` of `s`.
///
/// Nested constructs parse their inner text with a fresh cursor over the
/// same string and a tighter `end`, so positions stay absolute.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The whole string being parsed.
    pub s: &'a str,
    /// Current index into `s`.
    pub i: usize,
    /// Exclusive upper bound for this cursor.
    pub end: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            s,
            i: 0,
            end: s.len(),
        }
    }

    /// A cursor over `s[start..end]`.
    pub fn bounded(s: &'a str, start: usize, end: usize) -> Self {
        Self { s, i: start, end }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.end
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.byte_at(self.i)
    }

    /// Byte at an absolute index, if still inside the bound.
    pub fn byte_at(&self, idx: usize) -> Option<u8> {
        if idx < self.end {
            self.s.as_bytes().get(idx).copied()
        } else {
            None
        }
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.i <= self.end && self.s.as_bytes()[self.i..self.end].starts_with(pat)
    }

    /// Length of the run of `b` starting at `idx`.
    pub fn run_len(&self, idx: usize, b: u8) -> usize {
        let mut n = 0;
        while self.byte_at(idx + n) == Some(b) {
            n += 1;
        }
        n
    }

    /// Advances past the current character (whole UTF-8 sequence).
    pub fn bump_char(&mut self) -> Option<char> {
        let c = self.s[self.i..self.end].chars().next()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Character ending right before `idx`.
    pub fn char_before(&self, idx: usize) -> Option<char> {
        self.s[..idx].chars().next_back()
    }

    /// Character starting at `idx`, ignoring the bound.
    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.s.get(idx..).and_then(|rest| rest.chars().next())
    }

    /// First index `>= from` (and `< end`) where `pat` occurs.
    pub fn find_from(&self, from: usize, pat: &[u8]) -> Option<usize> {
        if from > self.end {
            return None;
        }
        let hay = &self.s.as_bytes()[from..self.end];
        if pat.len() == 1 {
            return hay.iter().position(|&b| b == pat[0]).map(|p| p + from);
        }
        hay.windows(pat.len())
            .position(|w| w == pat)
            .map(|p| p + from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello");
        assert_eq!(cur.pos(), 0);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some(b'h'));
        assert_eq!(cur.bump_char(), Some('h'));
        assert_eq!(cur.pos(), 1);
    }

    #[test]
    fn bounded_cursor_stops_at_end() {
        let cur = Cursor::bounded("**bold**", 2, 6);
        assert_eq!(cur.peek(), Some(b'b'));
        assert_eq!(cur.byte_at(6), None);
        assert_eq!(cur.find_from(2, b"**"), None);
    }

    #[test]
    fn bump_char_handles_multibyte() {
        let mut cur = Cursor::new("é!");
        assert_eq!(cur.bump_char(), Some('é'));
        assert_eq!(cur.pos(), 2);
        assert_eq!(cur.peek(), Some(b'!'));
    }

    #[test]
    fn run_len_counts_repeats() {
        let cur = Cursor::new("***x");
        assert_eq!(cur.run_len(0, b'*'), 3);
        assert_eq!(cur.run_len(3, b'*'), 0);
    }

    #[test]
    fn starts_with_at_eof() {
        let mut cur = Cursor::new("ab");
        cur.bump_n(2);
        assert!(cur.eof());
        assert!(cur.starts_with(b""));
        assert!(!cur.starts_with(b"a"));
    }

    #[test]
    fn find_from_multi_byte_pattern() {
        let cur = Cursor::new("a <u>b</u>");
        assert_eq!(cur.find_from(0, b"</u>"), Some(6));
        assert_eq!(cur.find_from(7, b"</u>"), None);
    }
}
