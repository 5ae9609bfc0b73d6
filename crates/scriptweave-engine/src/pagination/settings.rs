use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A4,
    #[default]
    Letter,
}

/// Widow/orphan limits, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationRules {
    /// Rows of a split block that must stay on the first page.
    pub min_lines_before_break: usize,
    /// Rows of a split block that must move to the next page.
    pub min_lines_after_break: usize,
    /// Never end the first part of a split dialogue on a parenthetical.
    pub avoid_parenthetical_at_break: bool,
}

impl Default for PaginationRules {
    fn default() -> Self {
        Self {
            min_lines_before_break: 2,
            min_lines_after_break: 2,
            avoid_parenthetical_at_break: true,
        }
    }
}

/// Width and spacing of one element type, overriding the stylesheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOverride {
    pub width: Option<usize>,
    pub margin_before: Option<usize>,
}

/// What to print and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    pub paper: PaperSize,
    pub print_scene_numbers: bool,
    pub print_notes: bool,
    pub print_synopses: bool,
    pub print_sections: bool,
    /// Revision generations marked on printed lines.
    pub visible_revisions: BTreeSet<u8>,
    /// Keyed by element type name, e.g. `"dialogue"`.
    pub style_overrides: BTreeMap<String, StyleOverride>,
    pub rules: PaginationRules,
    /// Appended below the first part of a split dialogue.
    pub more: String,
    /// Appended to the repeated cue after a split.
    pub contd: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            paper: PaperSize::default(),
            print_scene_numbers: true,
            print_notes: false,
            print_synopses: false,
            print_sections: false,
            visible_revisions: BTreeSet::new(),
            style_overrides: BTreeMap::new(),
            rules: PaginationRules::default(),
            more: "(MORE)".to_string(),
            contd: "(CONT'D)".to_string(),
        }
    }
}
