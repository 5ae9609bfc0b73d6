//! # Line Classification
//!
//! Turns raw lines into typed [`Line`]s.
//!
//! ## Modules
//!
//! - **`kinds`**: line-level syntax (force markers, heading prefixes, title page keys)
//! - **`classify`**: `FountainClassifier` produces a `Classification` per line
//!
//! ## Key Invariants
//!
//! - A line's classification depends only on its text, the [`Preceding`] of
//!   the line before it, whether the next line is blank and the caret
//! - Re-classification can stop at the first line whose `Preceding` is unchanged

pub mod classify;
pub mod kinds;

pub use classify::{Classification, FountainClassifier, LineContext, Preceding};

use crate::models::{Line, LineType};

impl Line {
    /// What this line hands on to the next one.
    pub fn preceding(&self) -> Preceding {
        Preceding {
            kind: self.kind,
            note_out: self.note_out,
            omit_out: self.omit_out,
        }
    }

    /// Stores a classification. Returns true if anything visible changed.
    pub fn apply(&mut self, c: Classification) -> bool {
        let forced_changed = self.forced_scene_number != c.forced_scene_number.is_some()
            || (c.forced_scene_number.is_some() && self.scene_number != c.forced_scene_number);
        let changed = self.kind != c.kind
            || self.formatting != c.formatting
            || self.section_depth != c.section_depth
            || self.color != c.color
            || self.storylines != c.storylines
            || self.notes != c.notes
            || self.omitted != c.omitted
            || forced_changed;

        if forced_changed {
            self.forced_scene_number = c.forced_scene_number.is_some();
            self.scene_number = c.forced_scene_number;
        }
        self.kind = c.kind;
        self.formatting = c.formatting;
        self.section_depth = c.section_depth;
        self.color = c.color;
        self.storylines = c.storylines;
        self.notes = c.notes;
        self.note_in = c.note_in;
        self.note_out = c.note_out;
        self.omit_in = c.omit_in;
        self.omit_out = c.omit_out;
        self.omitted = c.omitted;
        changed
    }
}

/// Context of line `index` within `lines`.
pub fn context_at(lines: &[Line], index: usize, caret_line: Option<usize>) -> LineContext {
    LineContext {
        previous: index
            .checked_sub(1)
            .and_then(|i| lines.get(i))
            .map(Line::preceding),
        next_is_empty: lines
            .get(index + 1)
            .is_none_or(|next| next.string.trim().is_empty()),
        actively_edited: caret_line == Some(index),
    }
}

/// A line whose classification changed, with its type before the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reclassified {
    pub index: usize,
    pub old_kind: LineType,
}

/// Re-classifies from `from` onwards.
///
/// Every line up to and including `must_reach` is visited; after that the
/// walk stops at the first line whose [`Preceding`] did not change. Lines
/// before `must_reach` may be fresh, so their previous `Preceding` means
/// nothing. Returns the lines whose classification changed.
pub fn reclassify(
    classifier: &FountainClassifier,
    lines: &mut [Line],
    from: usize,
    must_reach: usize,
    caret_line: Option<usize>,
) -> Vec<Reclassified> {
    let mut changed = Vec::new();
    for index in from..lines.len() {
        let ctx = context_at(lines, index, caret_line);
        let before = lines[index].preceding();
        let classification = classifier.classify(&lines[index].string, &ctx);
        if lines[index].apply(classification) {
            changed.push(Reclassified {
                index,
                old_kind: before.kind,
            });
        }
        if index >= must_reach && lines[index].preceding() == before {
            break;
        }
    }
    changed
}
