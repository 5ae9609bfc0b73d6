use std::collections::HashSet;

use crate::models::LineId;

use super::element::OutlineForest;

/// Outline changes between two snapshots, keyed by heading line id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: Vec<LineId>,
    pub removed: Vec<LineId>,
    pub updated: Vec<LineId>,
    /// The tree shape changed; a consumer should rebuild its view.
    pub needs_full_rebuild: bool,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.updated.is_empty()
            && !self.needs_full_rebuild
    }
}

/// Compares two outlines element by element.
pub fn diff(old: &OutlineForest, new: &OutlineForest) -> ChangeSet {
    let mut changes = ChangeSet::default();
    let mut seen = HashSet::with_capacity(new.len());

    for element in new.elements() {
        seen.insert(element.id);
        match old.get(&element.id) {
            None => changes.added.push(element.id),
            Some(before) => {
                if before.parent != element.parent || before.depth != element.depth {
                    changes.needs_full_rebuild = true;
                }
                if before.differs_from(element) {
                    changes.updated.push(element.id);
                }
            }
        }
    }
    changes.removed = old
        .elements()
        .iter()
        .filter(|e| !seen.contains(&e.id))
        .map(|e| e.id)
        .collect();

    if !changes.added.is_empty() || !changes.removed.is_empty() {
        changes.needs_full_rebuild = true;
    }
    changes
}
