/// A byte cursor over one line, used by the inline scanner.
///
/// Positions are local byte offsets into the line. All delimiters are ASCII,
/// so byte comparisons never split a character; `bump_char` is used to step
/// over everything else.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The line being scanned.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s
            .as_bytes()
            .get(self.i..)
            .is_some_and(|rest| rest.starts_with(pat))
    }

    /// Advances by `n` bytes, never past the end.
    pub fn bump_n(&mut self, n: usize) {
        self.i = (self.i + n).min(self.s.len());
    }

    /// Advances over one whole character. Returns its byte length.
    pub fn bump_char(&mut self) -> usize {
        let len = self.s[self.i..].chars().next().map_or(0, char::len_utf8);
        self.i += len;
        len
    }

    /// Byte offset of the next occurrence of `pat` at or after the cursor.
    pub fn find(&self, pat: &[u8]) -> Option<usize> {
        let rest = self.s.as_bytes().get(self.i..)?;
        rest.windows(pat.len())
            .position(|w| w == pat)
            .map(|p| p + self.i)
    }

    pub fn jump_to(&mut self, pos: usize) {
        self.i = pos.min(self.s.len());
    }
}
