use std::{borrow::Cow, collections::BTreeMap, collections::BTreeSet, ops::Range, sync::Arc};

use log::{debug, warn};
use xi_rope::Rope;

use crate::{
    editing::{
        Cmd, Patch,
        commands::{compile_replace, transform_offset},
    },
    models::{DocumentSettings, Line, LineId, RangeSet, line::floor_char_boundary},
    outline::{self, ChangeSet, LineEdit, OutlineForest},
    parsing::{
        self, collect_revisions,
        lines::{FountainClassifier, Reclassified, reclassify},
        rope::{LineRef, split_lines},
        scenes::number_scenes,
    },
};

/// What the parser is doing. Only ever observed as `Idle` from outside:
/// every mutation takes `&mut self` and completes before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    #[default]
    Idle,
    ParsingFull,
    ParsingIncremental,
}

/// A broken line-model invariant detected after an incremental edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum Violation {
    #[error("line {index} starts at {found}, expected {expected}")]
    Partition {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {index} would start before the buffer")]
    NegativePosition { index: usize },
    #[error("line {index} text differs from the buffer")]
    Content { index: usize },
    #[error("lines end at {lines_end}, buffer is {buffer_len} bytes")]
    Length { lines_end: usize, buffer_len: usize },
}

/// A screenplay document: the rope buffer, its classified lines and outline.
///
/// The buffer is the single source of truth. Lines are derived from it,
/// fully on construction and incrementally on every edit; the outline is
/// derived from the lines.
///
/// ```rust
/// # use scriptweave_engine::{Cmd, LineType, Screenplay};
/// let mut doc = Screenplay::parse_full("INT. KITCHEN - DAY\n\nJOHN enters.\n");
/// assert_eq!(doc.lines()[0].kind, LineType::Heading);
///
/// // Removing the blank line turns the heading into action.
/// let patch = doc.apply(Cmd::DeleteRange { range: 18..19 });
/// assert_eq!(doc.lines()[0].kind, LineType::Action);
/// assert!(patch.changed_lines.contains(&0));
/// assert_eq!(doc.outline_changes().removed.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Screenplay {
    pub(crate) buffer: Rope,
    lines: Vec<Line>,
    outline: OutlineForest,
    changes: ChangeSet,
    settings: DocumentSettings,
    classifier: FountainClassifier,
    state: ParserState,
    /// Caret byte offset reported by the host.
    caret: Option<usize>,
    version: u64,
}

impl Screenplay {
    pub fn parse_full(text: &str) -> Self {
        Self::with_settings(text, DocumentSettings::default())
    }

    /// Parses `text` with a settings block read from the same file.
    pub fn with_settings(text: &str, settings: DocumentSettings) -> Self {
        let mut doc = Self {
            buffer: Rope::from(text),
            lines: Vec::new(),
            outline: OutlineForest::default(),
            changes: ChangeSet::default(),
            settings,
            classifier: FountainClassifier,
            state: ParserState::ParsingFull,
            caret: None,
            version: 0,
        };
        doc.lines = parsing::parse_document(&doc.buffer, &doc.settings, None);
        doc.rebuild_outline();
        doc.state = ParserState::Idle;
        doc
    }

    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::parse_full(text))
    }

    /// Apply command to document
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        self.parse_edit(cmd.range(), cmd.text())
    }

    /// Replaces `range` with `replacement` and re-parses only what the edit
    /// can affect.
    ///
    /// ## Steps
    ///
    /// 1. Clamp the range to the buffer and to character boundaries
    /// 2. Apply the delta to the buffer
    /// 3. Replace the overlapping lines with lines split from the merged
    ///    text, keeping ids of lines whose text survived
    /// 4. Shift positions of every following line
    /// 5. Re-classify from the line before the edit until the context settles
    /// 6. Renumber scenes from the edit onwards
    /// 7. Update the outline, locally when no outline line was involved
    ///
    /// A broken invariant after step 4 falls back to a full re-parse of the
    /// buffer.
    pub fn parse_edit(&mut self, range: Range<usize>, replacement: &str) -> Patch {
        debug_assert_eq!(self.state, ParserState::Idle, "edits must not overlap");
        let range = self.clamp(range);
        let delta = compile_replace(self.buffer.len(), range.clone(), replacement);
        self.buffer = delta.apply(&self.buffer);
        self.caret = self
            .caret
            .map(|c| transform_offset(c, &range, replacement.len()));

        self.state = ParserState::ParsingIncremental;
        let (changed_lines, full_reparse) = match self.splice(range.clone(), replacement) {
            Ok(changed) => (changed, false),
            Err(violation) => {
                warn!(
                    "incremental parse failed ({violation}); re-parsing {} bytes",
                    self.buffer.len()
                );
                (self.reparse(false), true)
            }
        };
        self.state = ParserState::Idle;
        self.version += 1;

        debug!(
            "edit {:?} -> {} bytes: {} lines changed",
            range,
            replacement.len(),
            changed_lines.len()
        );
        Patch {
            changed_lines,
            edited: range.start..range.start + replacement.len(),
            version: self.version,
            full_reparse,
        }
    }

    /// Moves the caret and re-classifies the lines it left and entered.
    ///
    /// A cue with nothing under it yet is only a cue while it is being
    /// typed. Returns the changed line indices.
    pub fn set_caret(&mut self, caret: Option<usize>) -> Vec<usize> {
        let old_line = self.caret.map(|c| self.line_at(c));
        self.caret = caret.map(|c| self.clamp(c..c).start);
        let new_line = self.caret.map(|c| self.line_at(c));
        if old_line == new_line {
            return Vec::new();
        }

        let mut reclassified = Vec::new();
        for index in [old_line, new_line].into_iter().flatten() {
            reclassified.extend(reclassify(
                &self.classifier,
                &mut self.lines,
                index,
                index,
                new_line,
            ));
        }
        if reclassified.is_empty() {
            return Vec::new();
        }

        let first = reclassified.iter().map(|r| r.index).min().unwrap_or(0);
        let edit = LineEdit {
            first,
            old_end: first + 1,
            new_end: first + 1,
            last_touched: reclassified.iter().map(|r| r.index).max().unwrap_or(first),
        };
        let renumbered = self.settle(edit, false, &reclassified);
        self.version += 1;

        let changed: BTreeSet<usize> = reclassified
            .iter()
            .map(|r| r.index)
            .chain(renumbered)
            .collect();
        changed.into_iter().collect()
    }

    /// Replaces the document settings and re-parses with them.
    pub fn set_settings(&mut self, settings: DocumentSettings) -> Vec<usize> {
        self.settings = settings;
        let changed = self.reparse(true);
        self.version += 1;
        changed
    }

    /// Turns revision mode on (`Some(generation)`) or off.
    pub fn set_revision_generation(&mut self, generation: Option<u8>) {
        self.settings.revision_generation = generation;
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn line_by_id(&self, id: &LineId) -> Option<(usize, &Line)> {
        self.lines.iter().enumerate().find(|(_, l)| l.id == *id)
    }

    /// Index of the line containing byte `position` (its newline included).
    pub fn line_index_at(&self, position: usize) -> usize {
        self.line_at(position.min(self.buffer.len()))
    }

    /// Immutable copy of the lines for readers on other threads.
    pub fn snapshot(&self) -> Arc<[Line]> {
        Arc::from(self.lines.clone())
    }

    pub fn outline(&self) -> &OutlineForest {
        &self.outline
    }

    /// Outline changes caused by the last edit.
    pub fn outline_changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    /// Settings to persist with the text, revisions gathered from the lines.
    pub fn document_settings(&self) -> DocumentSettings {
        DocumentSettings {
            revisions: collect_revisions(&self.lines),
            ..self.settings.clone()
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn caret(&self) -> Option<usize> {
        self.caret
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Get the buffer length
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Slice the buffer, clamping the range to document bounds.
    pub fn slice_to_cow(&self, range: Range<usize>) -> Cow<'_, str> {
        let len = self.buffer.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.buffer.slice_to_cow(start..end)
    }

    fn line_at(&self, position: usize) -> usize {
        self.lines
            .partition_point(|l| l.end() < position)
            .min(self.lines.len().saturating_sub(1))
    }

    fn floor_boundary(&self, position: usize) -> usize {
        let line = &self.lines[self.line_at(position)];
        line.position + floor_char_boundary(&line.string, position.saturating_sub(line.position))
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let end = range.end.min(self.buffer.len());
        let start = range.start.min(end);
        self.floor_boundary(start)..self.floor_boundary(end)
    }

    /// Steps 3 to 7 of [`Screenplay::parse_edit`]; the buffer is already updated.
    fn splice(&mut self, range: Range<usize>, replacement: &str) -> Result<Vec<usize>, Violation> {
        let a = self.line_at(range.start);
        let b = self.line_at(range.end);
        let base = self.lines[a].position;
        let merged = {
            let head = &self.lines[a].string[..range.start - base];
            let tail = &self.lines[b].string[range.end - self.lines[b].position..];
            format!("{head}{replacement}{tail}")
        };
        let parts = split_lines(&merged, base);

        let outline_touched = self.lines[a..=b]
            .iter()
            .any(|l| l.kind.is_outline_related());
        let revisions = self.merged_revisions(
            a..b + 1,
            range.start - base..range.end - base,
            replacement.len(),
        );
        let fresh = self.inherit(a..b + 1, &parts, &revisions, base);
        let n = fresh.len();
        self.lines.splice(a..=b, fresh);

        let removed = range.end - range.start;
        for (offset, line) in self.lines[a + n..].iter_mut().enumerate() {
            line.position = (line.position + replacement.len())
                .checked_sub(removed)
                .ok_or(Violation::NegativePosition {
                    index: a + n + offset,
                })?;
        }
        self.check_region(a, a + n)?;

        let caret_line = self.caret.map(|c| self.line_at(c));
        let from = a.saturating_sub(1);
        let reclassified = reclassify(&self.classifier, &mut self.lines, from, a + n, caret_line);

        let edit = LineEdit {
            first: a,
            old_end: b + 1,
            new_end: a + n,
            last_touched: reclassified
                .iter()
                .map(|r| r.index)
                .max()
                .unwrap_or(0)
                .max(a + n - 1),
        };
        let renumbered = self.settle(edit, outline_touched, &reclassified);

        let changed: BTreeSet<usize> = (a..a + n)
            .chain(reclassified.iter().map(|r| r.index))
            .chain(renumbered)
            .collect();
        Ok(changed.into_iter().collect())
    }

    /// Revision ranges of lines `old` in the coordinates of the merged text
    /// after replacing `edited` (local to the first line) by `inserted` bytes.
    fn merged_revisions(
        &self,
        old: Range<usize>,
        edited: Range<usize>,
        inserted: usize,
    ) -> BTreeMap<u8, RangeSet> {
        let base = self.lines[old.start].position;
        let (s, e) = (edited.start, edited.end);
        let mut out: BTreeMap<u8, RangeSet> = BTreeMap::new();
        for line in &self.lines[old] {
            let offset = line.position - base;
            for (generation, ranges) in &line.revisions {
                let set = out.entry(*generation).or_default();
                for r in ranges.iter() {
                    let (start, end) = (r.start + offset, r.end + offset);
                    if start < s {
                        set.insert(start..end.min(s));
                    }
                    if end > e {
                        let from = start.max(e);
                        set.insert(from - e + s + inserted..end - e + s + inserted);
                    }
                }
            }
        }
        if let Some(generation) = self.settings.revision_generation {
            if inserted > 0 {
                out.entry(generation).or_default().insert(s..s + inserted);
            }
        }
        out
    }

    /// New lines for `parts`, reusing old lines whose text is unchanged at
    /// either end of the edit. The first rewritten line keeps the id of the
    /// first rewritten old line.
    fn inherit(
        &self,
        old: Range<usize>,
        parts: &[LineRef],
        revisions: &BTreeMap<u8, RangeSet>,
        base: usize,
    ) -> Vec<Line> {
        let old = &self.lines[old];
        let (o, p) = (old.len(), parts.len());
        let mut prefix = 0;
        while prefix < o.min(p) && old[prefix].string == parts[prefix].text {
            prefix += 1;
        }
        let mut suffix = 0;
        while suffix < (o - prefix).min(p - prefix)
            && old[o - 1 - suffix].string == parts[p - 1 - suffix].text
        {
            suffix += 1;
        }

        parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let mut line = if i < prefix {
                    old[i].clone()
                } else if i >= p - suffix {
                    old[o - (p - i)].clone()
                } else {
                    let mut line = Line::new(part.text.clone(), part.range.start);
                    if i == prefix && prefix < o - suffix {
                        line.id = old[prefix].id;
                    }
                    line
                };
                line.position = part.range.start;
                let window = part.range.start - base..part.range.end - base;
                line.revisions = revisions
                    .iter()
                    .map(|(generation, set)| (*generation, set.slice(window.clone())))
                    .filter(|(_, set)| !set.is_empty())
                    .collect();
                line
            })
            .collect()
    }

    fn check_region(&self, start: usize, end: usize) -> Result<(), Violation> {
        let from = start.saturating_sub(1);
        let to = end.min(self.lines.len() - 1);
        if self.lines[0].position != 0 {
            return Err(Violation::Partition {
                index: 0,
                expected: 0,
                found: self.lines[0].position,
            });
        }
        for index in from.max(1)..=to {
            let expected = self.lines[index - 1].end() + 1;
            if self.lines[index].position != expected {
                return Err(Violation::Partition {
                    index,
                    expected,
                    found: self.lines[index].position,
                });
            }
        }
        for index in start..end.min(self.lines.len()) {
            let line = &self.lines[index];
            if line.end() > self.buffer.len()
                || self.buffer.slice_to_cow(line.range()) != line.string.as_str()
            {
                return Err(Violation::Content { index });
            }
        }
        let lines_end = self.lines[self.lines.len() - 1].end();
        if lines_end != self.buffer.len() {
            return Err(Violation::Length {
                lines_end,
                buffer_len: self.buffer.len(),
            });
        }
        Ok(())
    }

    /// Renumbers scenes and updates the outline after re-classification.
    /// Returns the lines whose scene number changed.
    fn settle(
        &mut self,
        edit: LineEdit,
        outline_touched: bool,
        reclassified: &[Reclassified],
    ) -> Vec<usize> {
        let from = edit.first.saturating_sub(1);
        let renumbered = number_scenes(&mut self.lines, from, self.settings.scene_number_start);

        let outline_touched = outline_touched
            || !renumbered.is_empty()
            || self.lines[edit.first..edit.new_end.min(self.lines.len())]
                .iter()
                .any(|l| l.kind.is_outline_related())
            || reclassified.iter().any(|r| {
                r.old_kind.is_outline_related() || self.lines[r.index].kind.is_outline_related()
            });

        if outline_touched {
            self.rebuild_outline();
        } else {
            self.outline = outline::update_local(&self.outline, &self.lines, &edit);
            self.changes = ChangeSet::default();
        }
        renumbered
    }

    fn rebuild_outline(&mut self) {
        let fresh = outline::build(&self.lines);
        self.changes = outline::diff(&self.outline, &fresh);
        self.outline = fresh;
    }

    /// Full re-parse of the buffer. Lines whose text is unchanged at the same
    /// index keep their id, and their revisions unless the settings supply
    /// revisions. Returns the indices that differ from before.
    fn reparse(&mut self, revisions_from_settings: bool) -> Vec<usize> {
        self.state = ParserState::ParsingFull;
        let mut settings = self.settings.clone();
        if !revisions_from_settings {
            settings.revisions.clear();
        }
        let caret_line = self
            .caret
            .map(|c| self.slice_to_cow(0..c).matches('\n').count());
        let mut fresh = parsing::parse_document(&self.buffer, &settings, caret_line);

        let mut changed = Vec::new();
        for (index, line) in fresh.iter_mut().enumerate() {
            match self.lines.get(index) {
                Some(old) if old.string == line.string => {
                    line.id = old.id;
                    if !revisions_from_settings {
                        line.revisions = old.revisions.clone();
                    }
                    if old.kind != line.kind
                        || old.formatting != line.formatting
                        || old.scene_number != line.scene_number
                        || old.revisions != line.revisions
                    {
                        changed.push(index);
                    }
                }
                _ => changed.push(index),
            }
        }
        self.lines = fresh;
        self.rebuild_outline();
        self.state = ParserState::Idle;
        changed
    }

    #[cfg(test)]
    pub(crate) fn lines_mut(&mut self) -> &mut Vec<Line> {
        &mut self.lines
    }
}
