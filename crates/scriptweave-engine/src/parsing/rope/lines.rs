use std::ops::Range;

use xi_rope::Rope;

/// A single line of the buffer with its byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    /// Byte range of the line in the buffer, newline excluded.
    pub range: Range<usize>,
    /// The line text without its newline.
    pub text: String,
}

/// Returns an iterator over lines with their byte ranges.
///
/// Every `\n` terminates a line, so a buffer ending in `\n` (or an empty
/// buffer) yields a final empty line. Consecutive ranges are separated by
/// exactly one byte.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let len = rope.len();
    let trailing_empty = len == 0 || rope.slice_to_cow(len - 1..len) == "\n";
    let mut offset = 0usize;
    rope.lines_raw(..)
        .map(move |raw| {
            let start = offset;
            offset += raw.len();
            let text = raw.strip_suffix('\n').unwrap_or(&raw).to_string();
            LineRef {
                range: start..start + text.len(),
                text,
            }
        })
        .chain(trailing_empty.then(|| LineRef {
            range: len..len,
            text: String::new(),
        }))
}

/// Splits a plain string the same way [`lines_with_spans`] splits a rope,
/// with ranges offset by `base`.
pub fn split_lines(text: &str, base: usize) -> Vec<LineRef> {
    let mut offset = base;
    text.split('\n')
        .map(|part| {
            let start = offset;
            offset += part.len() + 1;
            LineRef {
                range: start..start + part.len(),
                text: part.to_string(),
            }
        })
        .collect()
}
