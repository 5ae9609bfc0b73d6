use crate::models::Line;

use super::element::OutlineForest;

/// An edit expressed in line indices.
///
/// Lines `first..old_end` of the old document were replaced by lines
/// `first..new_end` of the new one. `last_touched` is the last new-document
/// line whose classification changed (at least `new_end - 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEdit {
    pub first: usize,
    pub old_end: usize,
    pub new_end: usize,
    pub last_touched: usize,
}

impl LineEdit {
    fn shift(&self, index: usize) -> usize {
        if index >= self.old_end {
            index + self.new_end - self.old_end
        } else {
            index
        }
    }
}

/// Updates the outline in place for an edit that touched no outline-related
/// line, before or after.
///
/// Under that precondition the tree shape, ids and every diffed field stay
/// the same; only line indices, byte positions and the cue names of the
/// elements around the edit move. The result equals `build(lines)`.
///
/// The line just before `first` is re-classified with the edit, so the
/// element holding it re-collects its cues too.
pub fn update_local(forest: &OutlineForest, lines: &[Line], edit: &LineEdit) -> OutlineForest {
    let mut out = forest.clone();
    let first = edit.first.saturating_sub(1);
    for element in out.elements_mut() {
        element.line_index = edit.shift(element.line_index);
        element.own_end = edit.shift(element.own_end);
        element.range_end = edit.shift(element.range_end);
        element.measure(lines);
        if element.line_index <= edit.last_touched && first < element.own_end {
            element.collect_characters(lines);
        }
    }
    out
}
