use std::ops::Range;

use serde::Serialize;

use crate::models::LineId;

use super::block::Block;

/// Why a page ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakReason {
    /// The next block did not fit.
    Natural,
    /// `===` in the text.
    Forced,
    /// A heading or bare cue was moved to the next page.
    WidowOrphan,
    DialogueSplit,
    ActionSplit,
    /// A block taller than a page was placed on its own.
    Overflow,
    /// Last page of the document.
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub blocks: Vec<Block>,
    pub max_height: usize,
    pub used_height: usize,
    pub break_reason: BreakReason,
    /// Source line indices printed on this page.
    pub line_range: Range<usize>,
    /// Document bytes this page represents. Consecutive pages tile the
    /// document.
    pub range: Range<usize>,
    /// Index of the first block, whole or in part.
    pub start_block: usize,
    /// Index of the last block, whole or in part.
    pub end_block: usize,
    /// The page opens with the second part of a split block.
    pub starts_with_continuation: bool,
}

impl Page {
    /// Plain text of the page, one printed line per row group.
    pub fn text(&self) -> String {
        let mut out = Vec::new();
        for block in &self.blocks {
            out.extend(block.lines.iter().map(|l| l.text.clone()));
            out.extend(block.right.iter().map(|l| format!("    | {}", l.text)));
        }
        out.join("\n")
    }
}

/// One page transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBreak {
    /// Line that opens the next page, or the `===` line of a forced break.
    pub line_id: LineId,
    pub line_index: usize,
    /// Document offset where the next page starts.
    pub position: usize,
    pub reason: BreakReason,
    /// Rows used on all pages up to and including the one that ended.
    pub cumulative_height: usize,
    /// Number of the page that ended.
    pub page: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult {
    pub pages: Vec<Page>,
    pub breaks: Vec<PageBreak>,
    /// The run was canceled; `pages` holds the pages finished before that.
    pub canceled: bool,
}

/// Fills in line and byte ranges once every page is known.
pub(crate) fn assign_ranges(pages: &mut [Page], document_len: usize) {
    let starts: Vec<usize> = pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            if i == 0 {
                0
            } else {
                page.blocks
                    .iter()
                    .find_map(|b| b.first_source_line())
                    .map_or(document_len, |l| l.start())
            }
        })
        .collect();

    for (i, page) in pages.iter_mut().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(document_len);
        page.range = starts[i]..end.max(starts[i]);

        let mut indices = page
            .blocks
            .iter()
            .flat_map(|b| b.source_lines())
            .map(|l| l.line_index);
        page.line_range = match indices.next() {
            Some(first) => {
                let (low, high) = indices.fold((first, first), |(lo, hi), i| (lo.min(i), hi.max(i)));
                low..high + 1
            }
            None => 0..0,
        };
    }
}
