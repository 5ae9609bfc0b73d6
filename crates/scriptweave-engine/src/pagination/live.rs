use log::debug;

use crate::models::Line;

use super::{
    block::{Block, build_blocks},
    cancel::CancellationToken,
    page::PaginationResult,
    paginator::Paginator,
    settings::ExportSettings,
    style::Stylesheet,
};

/// Blocks past a page's last block that can decide where it ends. A page
/// ending at block N may have pushed heading N+1 forward because block N+2
/// had no room.
const LOOKAHEAD_BLOCKS: usize = 2;

/// Pagination that reuses the unaffected pages of the previous run.
///
/// A page is kept when every block its layout depended on is unchanged and
/// the page after it opens on a block boundary. Layout resumes from there.
/// The result always equals a fresh [`paginate`](super::paginate) run.
#[derive(Debug, Default)]
pub struct LivePaginator {
    fingerprints: Vec<u64>,
    settings: Option<ExportSettings>,
    result: PaginationResult,
    reused: usize,
}

impl LivePaginator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paginate(
        &mut self,
        lines: &[Line],
        settings: &ExportSettings,
        stylesheet: &dyn Stylesheet,
        cancel: &CancellationToken,
    ) -> &PaginationResult {
        let blocks = build_blocks(lines, settings);
        let fingerprints: Vec<u64> = blocks.iter().map(Block::fingerprint).collect();

        let first_changed = if self.settings.as_ref() == Some(settings) {
            fingerprints
                .iter()
                .zip(&self.fingerprints)
                .take_while(|(new, old)| new == old)
                .count()
        } else {
            0
        };

        let pages = &self.result.pages;
        let mut keep = pages
            .iter()
            .take_while(|p| p.end_block + LOOKAHEAD_BLOCKS < first_changed)
            .count();
        while keep > 0 && pages.get(keep).is_some_and(|p| p.starts_with_continuation) {
            keep -= 1;
        }
        let from_block = match keep {
            0 => 0,
            n => pages[n - 1].end_block + 1,
        };
        let kept_pages = pages[..keep].to_vec();
        let kept_breaks = self
            .result
            .breaks
            .iter()
            .filter(|b| b.page <= keep)
            .cloned()
            .collect();

        let result = Paginator::new(lines, &blocks, settings, stylesheet)
            .resume(kept_pages, kept_breaks)
            .run(from_block, cancel);
        debug!(
            "live pagination: reused {keep} pages, resumed at block {from_block}/{}",
            blocks.len()
        );

        if result.canceled {
            self.fingerprints.clear();
            self.settings = None;
        } else {
            self.fingerprints = fingerprints;
            self.settings = Some(settings.clone());
        }
        self.reused = keep;
        self.result = result;
        &self.result
    }

    pub fn result(&self) -> &PaginationResult {
        &self.result
    }

    /// Pages carried over by the last run.
    pub fn reused_pages(&self) -> usize {
        self.reused
    }
}
