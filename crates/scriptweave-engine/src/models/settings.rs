use std::{collections::BTreeMap, ops::Range};

use serde::{Deserialize, Serialize};

/// Per-document settings persisted in the trailing settings block of the
/// file and re-attached on every full parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentSettings {
    /// Number given to the first auto-numbered scene.
    pub scene_number_start: u32,
    /// Generation tagged onto newly typed text. `None` = revision mode off.
    pub revision_generation: Option<u8>,
    /// Revised ranges in document byte offsets.
    pub revisions: Vec<RevisionRange>,
    /// Display color per generation.
    pub revision_colors: BTreeMap<u8, String>,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            scene_number_start: 1,
            revision_generation: None,
            revisions: Vec::new(),
            revision_colors: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRange {
    pub generation: u8,
    pub range: Range<usize>,
}
