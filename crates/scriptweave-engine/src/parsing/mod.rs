//! # Parsing
//!
//! Full parsing of a buffer into classified [`Line`]s. Incremental parsing
//! lives in `editing` and reuses the same pieces on a window of lines.
//!
//! 1. **Split** (`rope`): one [`Line`] per `\n`-terminated line
//! 2. **Classify** (`lines`): type and inline formatting, threading the
//!    open note/omission state from line to line
//! 3. **Attach** revision ranges from the document settings
//! 4. **Number** scenes (`scenes`)

pub mod inline;
pub mod lines;
pub mod rope;
pub mod scenes;

#[cfg(test)]
mod tests;

use log::debug;
use xi_rope::Rope;

use crate::models::{DocumentSettings, Line, RangeSet, RevisionRange};

use lines::{FountainClassifier, reclassify};
use rope::lines_with_spans;

/// Parses the whole buffer.
pub fn parse_document(rope: &Rope, settings: &DocumentSettings, caret_line: Option<usize>) -> Vec<Line> {
    let mut lines: Vec<Line> = lines_with_spans(rope)
        .map(|lr| Line::new(lr.text, lr.range.start))
        .collect();
    let len = lines.len();
    reclassify(&FountainClassifier, &mut lines, 0, len, caret_line);
    attach_revisions(&mut lines, &settings.revisions);
    scenes::number_scenes(&mut lines, 0, settings.scene_number_start);
    debug!("full parse: {} lines, {} bytes", lines.len(), rope.len());
    lines
}

/// Distributes document-level revision ranges onto the lines they touch.
pub fn attach_revisions(lines: &mut [Line], revisions: &[RevisionRange]) {
    for revision in revisions {
        let first = lines.partition_point(|l| l.end() < revision.range.start);
        for line in lines[first..].iter_mut() {
            if line.position >= revision.range.end {
                break;
            }
            let start = revision.range.start.max(line.position) - line.position;
            let end = revision.range.end.min(line.end()) - line.position;
            if start < end {
                line.revisions
                    .entry(revision.generation)
                    .or_insert_with(RangeSet::new)
                    .insert(start..end);
            }
        }
    }
}

/// Collects per-line revisions back into document ranges, the inverse of
/// [`attach_revisions`].
pub fn collect_revisions(lines: &[Line]) -> Vec<RevisionRange> {
    let mut out = Vec::new();
    for line in lines {
        for (generation, ranges) in &line.revisions {
            for r in ranges.iter() {
                out.push(RevisionRange {
                    generation: *generation,
                    range: r.start + line.position..r.end + line.position,
                });
            }
        }
    }
    out
}
