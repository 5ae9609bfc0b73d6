use std::ops::Range;

use xi_rope::{Delta, Rope, RopeInfo, delta::Builder};

/// An edit to the buffer. Offsets are bytes and are clamped to the buffer
/// and to character boundaries before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    ReplaceRange { range: Range<usize>, text: String },
}

impl Cmd {
    /// The byte range this command replaces.
    pub fn range(&self) -> Range<usize> {
        match self {
            Cmd::InsertText { at, .. } => *at..*at,
            Cmd::DeleteRange { range } | Cmd::ReplaceRange { range, .. } => range.clone(),
        }
    }

    /// The replacement text.
    pub fn text(&self) -> &str {
        match self {
            Cmd::InsertText { text, .. } | Cmd::ReplaceRange { text, .. } => text,
            Cmd::DeleteRange { .. } => "",
        }
    }
}

/// Compiles a replacement of an already clamped range into a delta.
pub(crate) fn compile_replace(buffer_len: usize, range: Range<usize>, text: &str) -> Delta<RopeInfo> {
    let mut builder = Builder::new(buffer_len);
    builder.replace(range, Rope::from(text));
    builder.build()
}

/// Maps a byte offset through a replacement of `range` by `inserted` bytes.
pub(crate) fn transform_offset(offset: usize, range: &Range<usize>, inserted: usize) -> usize {
    if offset < range.start {
        offset
    } else if offset >= range.end {
        offset - (range.end - range.start) + inserted
    } else {
        range.start + inserted
    }
}
