use std::ops::Range;

/// Result of applying an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Indices of lines whose text, type, formatting or scene number changed,
    /// ascending. A host only needs to redraw these.
    pub changed_lines: Vec<usize>,
    /// Byte range of the inserted text in the new buffer.
    pub edited: Range<usize>,
    pub version: u64,
    /// The edit was recovered by a full re-parse.
    pub full_reparse: bool,
}
