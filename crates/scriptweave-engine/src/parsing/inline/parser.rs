use std::ops::Range;

use super::{
    cursor::Cursor,
    kinds::{ESCAPE, Emphasis, EmphasisKind, Highlight, MacroSpan, Note, Omission},
    types::{Formatting, InlineScan},
};

/// Scans one line for inline constructs.
///
/// `note_in` / `omit_in` carry an unterminated `[[` / `/*` from the previous
/// line. Scanning never fails: an unterminated emphasis delimiter is plain
/// text, an unterminated note or omission runs to the end of the line and is
/// reported as still open.
///
/// # Precedence
/// 1. Open omissions and notes (raw zones, may span lines)
/// 2. Escapes and macros
/// 3. Highlights
/// 4. Emphasis, longest delimiter first
pub fn scan_inline(s: &str, note_in: bool, omit_in: bool) -> InlineScan {
    let mut scan = Scanner::new(s);
    scan.raw_zones(note_in, omit_in);
    scan.pair_brackets(Highlight::OPEN, Highlight::CLOSE);
    for kind in Emphasis::ORDER {
        scan.pair_emphasis(kind);
    }
    scan.finish()
}

struct Scanner<'a> {
    s: &'a str,
    /// Bytes that may not take part in delimiter pairing.
    raw: Vec<bool>,
    formatting: Formatting,
    notes: Vec<String>,
    note_out: bool,
    omit_out: bool,
}

impl<'a> Scanner<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            s,
            raw: vec![false; s.len()],
            formatting: Formatting::default(),
            notes: Vec::new(),
            note_out: false,
            omit_out: false,
        }
    }

    fn mark_raw(&mut self, range: Range<usize>) {
        for flag in &mut self.raw[range] {
            *flag = true;
        }
    }

    fn raw_zones(&mut self, note_in: bool, omit_in: bool) {
        let len = self.s.len();
        let mut cur = Cursor::new(self.s);
        // (range start, content start) of a construct that is still open
        let mut omission: Option<usize> = omit_in.then_some(0);
        let mut note: Option<(usize, usize)> = (note_in && !omit_in).then_some((0, 0));

        while !cur.eof() {
            if let Some(start) = omission {
                let end = match cur.find(Omission::CLOSE) {
                    Some(close) => {
                        self.formatting.markup.insert(close..close + Omission::CLOSE.len());
                        omission = None;
                        close + Omission::CLOSE.len()
                    }
                    None => len,
                };
                self.formatting.omissions.insert(start..end);
                self.mark_raw(start..end);
                cur.jump_to(end);
                continue;
            }

            if let Some((start, content)) = note {
                let end = match cur.find(Note::CLOSE) {
                    Some(close) => {
                        self.formatting.markup.insert(close..close + Note::CLOSE.len());
                        self.notes.push(self.s[content..close].to_string());
                        note = None;
                        close + Note::CLOSE.len()
                    }
                    None => {
                        self.notes.push(self.s[content..].to_string());
                        len
                    }
                };
                self.formatting.notes.insert(start..end);
                self.mark_raw(start..end);
                cur.jump_to(end);
                continue;
            }

            let i = cur.pos();
            if cur.peek() == Some(ESCAPE) && i + 1 < len {
                cur.bump_n(1);
                let escaped = cur.bump_char();
                self.formatting.escapes.insert(i..i + 1);
                self.mark_raw(i..i + 1 + escaped);
                continue;
            }
            if cur.starts_with(Omission::OPEN) {
                self.formatting.markup.insert(i..i + Omission::OPEN.len());
                omission = Some(i);
                cur.bump_n(Omission::OPEN.len());
                continue;
            }
            if cur.starts_with(Note::OPEN) {
                self.formatting.markup.insert(i..i + Note::OPEN.len());
                note = Some((i, i + Note::OPEN.len()));
                cur.bump_n(Note::OPEN.len());
                continue;
            }
            if cur.starts_with(MacroSpan::OPEN) {
                let mut probe = cur.clone();
                probe.bump_n(MacroSpan::OPEN.len());
                if let Some(close) = probe.find(MacroSpan::CLOSE) {
                    let end = close + MacroSpan::CLOSE.len();
                    self.formatting.markup.insert(i..i + MacroSpan::OPEN.len());
                    self.formatting.markup.insert(close..end);
                    self.formatting.macros.insert(i..end);
                    self.mark_raw(i..end);
                    cur.jump_to(end);
                    continue;
                }
            }
            cur.bump_char();
        }

        self.note_out = note.is_some();
        self.omit_out = omission.is_some();
    }

    fn is_free_run(&self, at: usize, delim: &[u8]) -> bool {
        let end = at + delim.len();
        end <= self.s.len()
            && &self.s.as_bytes()[at..end] == delim
            && !self.raw[at..end].iter().any(|r| *r)
    }

    fn pair_brackets(&mut self, open: &[u8], close: &[u8]) {
        let len = self.s.len();
        let mut i = 0;
        while i < len {
            if !self.is_free_run(i, open) {
                i += 1;
                continue;
            }
            let close_at = (i + open.len()..len).find(|&j| self.is_free_run(j, close));
            let Some(j) = close_at else {
                return;
            };
            let end = j + close.len();
            self.formatting.highlight.insert(i..end);
            self.formatting.markup.insert(i..i + open.len());
            self.formatting.markup.insert(j..end);
            self.mark_raw(i..i + open.len());
            self.mark_raw(j..end);
            i = end;
        }
    }

    fn pair_emphasis(&mut self, kind: EmphasisKind) {
        let delim = Emphasis::delimiter(kind);
        let width = delim.len();
        let len = self.s.len();
        let mut i = 0;
        while i < len {
            if !self.is_free_run(i, delim) {
                i += 1;
                continue;
            }
            let close_at = (i + width..len).find(|&j| self.is_free_run(j, delim));
            match close_at {
                Some(j) if j > i + width => {
                    let end = j + width;
                    match kind {
                        EmphasisKind::BoldItalic => {
                            self.formatting.bold.insert(i..end);
                            self.formatting.italic.insert(i..end);
                        }
                        EmphasisKind::Bold => self.formatting.bold.insert(i..end),
                        EmphasisKind::Italic => self.formatting.italic.insert(i..end),
                        EmphasisKind::Underline => self.formatting.underline.insert(i..end),
                        EmphasisKind::Strikeout => self.formatting.strikeout.insert(i..end),
                    }
                    self.formatting.markup.insert(i..i + width);
                    self.formatting.markup.insert(j..end);
                    self.mark_raw(i..i + width);
                    self.mark_raw(j..end);
                    i = end;
                }
                _ => i += width,
            }
        }
    }

    fn finish(self) -> InlineScan {
        InlineScan {
            formatting: self.formatting,
            notes: self.notes,
            note_out: self.note_out,
            omit_out: self.omit_out,
        }
    }
}
