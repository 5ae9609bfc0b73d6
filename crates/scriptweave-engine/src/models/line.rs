use std::{collections::BTreeMap, fmt, ops::Range};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{models::RangeSet, models::line_type::LineType, parsing::inline::Formatting};

/// Stable identity of a line across re-parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(Uuid);

impl LineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One classified line of the document.
///
/// Lines live in a single owned `Vec<Line>` inside the document; everything
/// else refers to them by [`LineId`] or by index. `position` is the byte
/// offset of the first character in the document and `string` never contains
/// the trailing newline.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: LineId,
    pub kind: LineType,
    pub string: String,
    pub position: usize,
    pub formatting: Formatting,
    /// Number of leading `#` for sections, 0 otherwise.
    pub section_depth: usize,
    pub scene_number: Option<String>,
    /// `scene_number` came from a `#12A#` marker rather than auto numbering.
    pub forced_scene_number: bool,
    pub color: Option<String>,
    pub storylines: Vec<String>,
    /// Inner text of the notes on this line.
    pub notes: Vec<String>,
    /// Revision generation -> ranges of this line introduced in that pass.
    pub revisions: BTreeMap<u8, RangeSet>,
    pub note_in: bool,
    pub note_out: bool,
    pub omit_in: bool,
    pub omit_out: bool,
    /// The whole line lies inside an omission.
    pub omitted: bool,
}

impl Line {
    /// An unclassified line; the parser fills in everything else.
    pub fn new(string: impl Into<String>, position: usize) -> Self {
        Self {
            id: LineId::new(),
            kind: LineType::Empty,
            string: string.into(),
            position,
            formatting: Formatting::default(),
            section_depth: 0,
            scene_number: None,
            forced_scene_number: false,
            color: None,
            storylines: Vec::new(),
            notes: Vec::new(),
            revisions: BTreeMap::new(),
            note_in: false,
            note_out: false,
            omit_in: false,
            omit_out: false,
            omitted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.string.len()
    }

    pub fn is_empty(&self) -> bool {
        self.string.is_empty()
    }

    /// Byte offset just past the last character (the newline, if any).
    pub fn end(&self) -> usize {
        self.position + self.string.len()
    }

    /// Document byte range, newline excluded.
    pub fn range(&self) -> Range<usize> {
        self.position..self.end()
    }

    /// Displayed text: markup, escapes and omissions removed, notes removed
    /// unless `include_notes`.
    pub fn display_text(&self, include_notes: bool) -> String {
        self.display_text_in(0..self.string.len(), include_notes)
    }

    /// Displayed text of a local byte range of this line.
    pub fn display_text_in(&self, range: Range<usize>, include_notes: bool) -> String {
        let end = floor_char_boundary(&self.string, range.end.min(self.string.len()));
        let start = floor_char_boundary(&self.string, range.start.min(end));
        let hidden = self.formatting.hidden(include_notes);
        self.string[start..end]
            .char_indices()
            .filter(|(i, _)| !hidden.contains(start + i))
            .map(|(_, c)| c)
            .collect()
    }

    /// Display text without leading and trailing whitespace.
    pub fn stripped(&self) -> String {
        self.display_text(false).trim().to_string()
    }

    /// Character name of a cue, without extension or dual marker.
    pub fn character_name(&self) -> Option<String> {
        if !self.kind.is_character() {
            return None;
        }
        let text = self.stripped();
        let name = text.split('(').next().unwrap_or_default().trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Highest revision generation touching this line among `visible`.
    pub fn revision_in(&self, visible: &std::collections::BTreeSet<u8>) -> Option<u8> {
        self.revisions
            .iter()
            .rev()
            .find(|(generation, ranges)| visible.contains(generation) && !ranges.is_empty())
            .map(|(generation, _)| *generation)
    }

    /// Plain, read-only projection for plugins and JSON output.
    pub fn to_serializable(&self, index: usize) -> LineRecord {
        LineRecord {
            id: self.id,
            index,
            kind: self.kind,
            string: self.string.clone(),
            text: self.stripped(),
            position: self.position,
            length: self.len(),
            section_depth: self.section_depth,
            scene_number: self.scene_number.clone(),
            color: self.color.clone(),
            storylines: self.storylines.clone(),
            notes: self.notes.clone(),
            omitted: self.omitted,
            formatting: self.formatting.clone(),
            revisions: self.revisions.clone(),
        }
    }
}

/// Serializable projection of a [`Line`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "line", rename_all = "camelCase")]
pub struct LineRecord {
    pub id: LineId,
    pub index: usize,
    pub kind: LineType,
    pub string: String,
    pub text: String,
    pub position: usize,
    pub length: usize,
    pub section_depth: usize,
    pub scene_number: Option<String>,
    pub color: Option<String>,
    pub storylines: Vec<String>,
    pub notes: Vec<String>,
    pub omitted: bool,
    pub formatting: Formatting,
    pub revisions: BTreeMap<u8, RangeSet>,
}

pub(crate) fn floor_char_boundary(s: &str, mut at: usize) -> usize {
    at = at.min(s.len());
    while !s.is_char_boundary(at) {
        at -= 1;
    }
    at
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_with_markup(s: &str, markup: &[Range<usize>]) -> Line {
        let mut line = Line::new(s, 10);
        line.formatting.markup = RangeSet::from_ranges(markup.iter().cloned());
        line
    }

    #[test]
    fn range_excludes_newline() {
        let line = Line::new("abc", 10);
        assert_eq!(line.range(), 10..13);
        assert_eq!(line.end(), 13);
    }

    #[test]
    fn display_text_hides_markup() {
        let line = line_with_markup("**hey**", &[0..2, 5..7]);
        assert_eq!(line.display_text(false), "hey");
        assert_eq!(line.display_text_in(1..6, false), "hey");
    }

    #[test]
    fn display_text_in_clamps_to_char_boundaries() {
        let line = Line::new("héllo", 0);
        assert_eq!(line.display_text_in(0..2, false), "h");
        assert_eq!(line.display_text_in(0..100, false), "héllo");
    }

    #[test]
    fn character_name_strips_extension() {
        let mut line = line_with_markup("@McCLANE (V.O.) ^", &[0..1, 16..17]);
        line.kind = LineType::DualDialogueCharacter;
        assert_eq!(line.character_name().as_deref(), Some("McCLANE"));
    }

    #[test]
    fn serializable_projection_is_tagged() {
        let mut line = Line::new("Hello", 0);
        line.kind = LineType::Action;
        let json = serde_json::to_value(line.to_serializable(3)).unwrap();
        assert_eq!(json["type"], "line");
        assert_eq!(json["kind"], "action");
        assert_eq!(json["index"], 3);
        assert_eq!(json["text"], "Hello");
    }

    #[test]
    fn highest_visible_revision_wins() {
        let mut line = Line::new("Hello", 0);
        line.revisions.insert(1, RangeSet::from_ranges([0..2]));
        line.revisions.insert(3, RangeSet::from_ranges([2..4]));
        let visible = [1u8, 2].into_iter().collect();
        assert_eq!(line.revision_in(&visible), Some(1));
        let all = [1u8, 3].into_iter().collect();
        assert_eq!(line.revision_in(&all), Some(3));
    }
}
