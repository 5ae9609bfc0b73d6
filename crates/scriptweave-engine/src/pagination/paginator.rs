use log::debug;

use crate::models::{Line, LineId};

use super::{
    block::{Block, BlockKind, BlockLine, build_blocks},
    cancel::CancellationToken,
    page::{BreakReason, Page, PageBreak, PaginationResult, assign_ranges},
    settings::ExportSettings,
    split::{Splitter, block_height},
    style::Stylesheet,
};

/// Paginates a line snapshot from scratch.
///
/// ## Rules
///
/// 1. A block that fits is appended
/// 2. A heading or bare cue that fits, but leaves no room for the start of
///    the next block, moves to the next page (`WidowOrphan`)
/// 3. Dialogue and action that do not fit are split when the widow/orphan
///    limits allow; everything else moves whole
/// 4. A block that does not fit on an empty page is placed anyway
/// 5. `===` ends the page (`Forced`)
///
/// Cancellation is checked before each block; a canceled run returns the
/// pages finished so far.
pub fn paginate(
    lines: &[Line],
    settings: &ExportSettings,
    stylesheet: &dyn Stylesheet,
    cancel: &CancellationToken,
) -> PaginationResult {
    let blocks = build_blocks(lines, settings);
    Paginator::new(lines, &blocks, settings, stylesheet).run(0, cancel)
}

/// Where the next page starts, recorded when a page ends.
#[derive(Debug, Clone, Copy)]
struct Trigger {
    line_id: LineId,
    line_index: usize,
    position: usize,
}

impl From<&BlockLine> for Trigger {
    fn from(line: &BlockLine) -> Self {
        Self {
            line_id: line.line_id,
            line_index: line.line_index,
            position: line.start(),
        }
    }
}

pub(crate) struct Paginator<'a> {
    lines: &'a [Line],
    blocks: &'a [Block],
    settings: &'a ExportSettings,
    style: &'a dyn Stylesheet,
    max_height: usize,
    pages: Vec<Page>,
    breaks: Vec<PageBreak>,
    current: Vec<Block>,
    used: usize,
    start_block: usize,
    last_block: usize,
    cumulative: usize,
}

impl<'a> Paginator<'a> {
    pub(crate) fn new(
        lines: &'a [Line],
        blocks: &'a [Block],
        settings: &'a ExportSettings,
        style: &'a dyn Stylesheet,
    ) -> Self {
        Self {
            lines,
            blocks,
            settings,
            style,
            max_height: style.page_height(settings.paper),
            pages: Vec::new(),
            breaks: Vec::new(),
            current: Vec::new(),
            used: 0,
            start_block: 0,
            last_block: 0,
            cumulative: 0,
        }
    }

    /// Continues after pages that are already laid out. The first new page
    /// starts at a block boundary.
    pub(crate) fn resume(mut self, pages: Vec<Page>, breaks: Vec<PageBreak>) -> Self {
        self.cumulative = pages.iter().map(|p| p.used_height).sum();
        self.pages = pages;
        self.breaks = breaks;
        self
    }

    pub(crate) fn run(mut self, from_block: usize, cancel: &CancellationToken) -> PaginationResult {
        let blocks = self.blocks;
        for (index, block) in blocks.iter().enumerate().skip(from_block) {
            if cancel.is_canceled() {
                debug!(
                    "pagination canceled at block {index}/{} after {} pages",
                    blocks.len(),
                    self.pages.len()
                );
                return self.result(true);
            }
            self.place(index, block);
        }
        if !self.current.is_empty() {
            self.finish(BreakReason::End, None);
        }
        debug!(
            "paginated {} blocks into {} pages",
            blocks.len(),
            self.pages.len()
        );
        self.result(false)
    }

    fn result(mut self, canceled: bool) -> PaginationResult {
        let document_len = self.lines.last().map_or(0, Line::end);
        assign_ranges(&mut self.pages, document_len);
        PaginationResult {
            pages: self.pages,
            breaks: self.breaks,
            canceled,
        }
    }

    fn place(&mut self, index: usize, block: &Block) {
        if block.kind == BlockKind::PageBreak {
            if !self.current.is_empty() {
                self.finish(BreakReason::Forced, block.lines.first().map(Trigger::from));
            }
            return;
        }

        let splitter = self.splitter();
        let mut block = block.clone();
        loop {
            let at_top = self.current.is_empty();
            let height = block_height(self.style, &block, at_top);

            if self.used + height <= self.max_height {
                if !at_top && block.keeps_with_next() && !self.next_fits(index, height) {
                    self.finish(BreakReason::WidowOrphan, block.first_source_line().map(Trigger::from));
                    continue;
                }
                self.push(index, block, height);
                return;
            }

            let available = self.max_height.saturating_sub(self.used);
            if let Some((head, tail, reason)) = splitter.split(&block, available, at_top) {
                let head_height = block_height(self.style, &head, at_top);
                self.push(index, head, head_height);
                self.finish(reason, tail.first_source_line().map(Trigger::from));
                block = tail;
                continue;
            }

            if at_top {
                self.push(index, block, height);
                return;
            }
            let reason = if self.used > self.max_height {
                BreakReason::Overflow
            } else {
                BreakReason::Natural
            };
            self.finish(reason, block.first_source_line().map(Trigger::from));
        }
    }

    /// Whether the block after `index` can start on this page below a block
    /// of `height` rows: whole, or as the head of a split that actually
    /// exists.
    fn next_fits(&self, index: usize, height: usize) -> bool {
        let Some(next) = self.blocks.get(index + 1) else {
            return true;
        };
        if next.kind == BlockKind::PageBreak {
            return true;
        }
        let available = self.max_height.saturating_sub(self.used + height);
        block_height(self.style, next, false) <= available
            || self.splitter().split(next, available, false).is_some()
    }

    fn splitter(&self) -> Splitter<'a> {
        Splitter {
            lines: self.lines,
            style: self.style,
            settings: self.settings,
        }
    }

    fn push(&mut self, index: usize, block: Block, height: usize) {
        if self.current.is_empty() {
            self.start_block = index;
        }
        self.last_block = index;
        self.used += height;
        self.current.push(block);
    }

    fn finish(&mut self, reason: BreakReason, trigger: Option<Trigger>) {
        let blocks = std::mem::take(&mut self.current);
        let starts_with_continuation = blocks.first().is_some_and(|b| b.continuation);
        let number = self.pages.len() + 1;
        self.cumulative += self.used;

        if let Some(trigger) = trigger {
            self.breaks.push(PageBreak {
                line_id: trigger.line_id,
                line_index: trigger.line_index,
                position: trigger.position,
                reason,
                cumulative_height: self.cumulative,
                page: number,
            });
        }
        self.pages.push(Page {
            number,
            blocks,
            max_height: self.max_height,
            used_height: self.used,
            break_reason: reason,
            line_range: 0..0,
            range: 0..0,
            start_block: self.start_block,
            end_block: self.last_block,
            starts_with_continuation,
        });
        self.used = 0;
    }
}
