use serde::{Deserialize, Serialize};

use crate::models::RangeSet;

/// Inline formatting of one line. All ranges are byte offsets into the
/// line's raw string and include their delimiters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formatting {
    pub bold: RangeSet,
    pub italic: RangeSet,
    pub underline: RangeSet,
    pub strikeout: RangeSet,
    pub highlight: RangeSet,
    pub notes: RangeSet,
    pub omissions: RangeSet,
    pub macros: RangeSet,
    /// Backslashes that escape the following character.
    pub escapes: RangeSet,
    /// Delimiters and force markers: present in the raw string, never displayed.
    pub markup: RangeSet,
}

impl Formatting {
    /// Bytes that are not part of the displayed text.
    pub fn hidden(&self, include_notes: bool) -> RangeSet {
        let mut hidden = self.markup.union(&self.escapes).union(&self.omissions);
        if !include_notes {
            hidden = hidden.union(&self.notes);
        }
        hidden
    }
}

/// Result of scanning one line for inline constructs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineScan {
    pub formatting: Formatting,
    /// Inner text of every note touching this line.
    pub notes: Vec<String>,
    /// A `[[` is still open at line end.
    pub note_out: bool,
    /// A `/*` is still open at line end.
    pub omit_out: bool,
}
