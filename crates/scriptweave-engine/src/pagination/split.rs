use std::ops::Range;

use crate::models::{Line, LineType};

use super::{
    block::{Block, BlockKind, BlockLine},
    page::BreakReason,
    settings::ExportSettings,
    style::Stylesheet,
};

/// Row height of a block; `at_top` drops its leading margin.
pub(crate) fn block_height(style: &dyn Stylesheet, block: &Block, at_top: bool) -> usize {
    let dual = block.kind == BlockKind::DualDialogue;
    let column = |lines: &[BlockLine]| -> usize {
        lines
            .iter()
            .map(|l| style.rows(&l.text, if dual { dual_kind(l.kind) } else { l.kind }))
            .sum()
    };
    let margin = match block.lines.first() {
        Some(first) if !at_top => style.element(first.kind).margin_before,
        _ => 0,
    };
    margin + column(&block.lines).max(column(&block.right))
}

fn dual_kind(kind: LineType) -> LineType {
    match kind {
        LineType::Character => LineType::DualDialogueCharacter,
        LineType::Parenthetical => LineType::DualDialogueParenthetical,
        LineType::Dialogue => LineType::DualDialogue,
        LineType::More => LineType::DualDialogueMore,
        kind => kind,
    }
}

/// Offsets inside `range` of `text` where a new sentence starts.
fn sentence_breaks(text: &str, range: Range<usize>) -> Vec<usize> {
    let bytes = &text.as_bytes()[range.clone()];
    (1..bytes.len())
        .filter(|&i| bytes[i] == b' ' && matches!(bytes[i - 1], b'.' | b'?' | b'!'))
        .map(|i| range.start + i + 1)
        .filter(|&at| at < range.end)
        .collect()
}

/// Splits dialogue and action blocks across a page boundary.
pub(crate) struct Splitter<'a> {
    pub lines: &'a [Line],
    pub style: &'a dyn Stylesheet,
    pub settings: &'a ExportSettings,
}

impl Splitter<'_> {
    /// The largest first part of `block` that fits in `available` rows,
    /// with the rest. Split points are line ends and sentence starts; both
    /// parts keep the widow/orphan minimums and dialogue never breaks right
    /// after a parenthetical.
    pub(crate) fn split(&self, block: &Block, available: usize, at_top: bool) -> Option<(Block, Block, BreakReason)> {
        if !block.is_splittable() {
            return None;
        }
        let dialogue = block.kind == BlockKind::Dialogue;
        let content_start = usize::from(dialogue);

        let mut best = None;
        'candidates: for (i, line) in block.lines.iter().enumerate().skip(content_start) {
            let mut points = match line.kind {
                LineType::Dialogue | LineType::Action => {
                    sentence_breaks(&self.lines[line.line_index].string, line.range.clone())
                }
                _ => Vec::new(),
            };
            if i + 1 < block.lines.len() {
                points.push(line.range.end);
            }
            for at in points {
                let (head, tail) = self.cut(block, i, at, dialogue);
                if block_height(self.style, &head, at_top) > available {
                    break 'candidates;
                }
                if self.acceptable(&head, &tail, dialogue) {
                    best = Some((head, tail));
                }
            }
        }

        let reason = if dialogue {
            BreakReason::DialogueSplit
        } else {
            BreakReason::ActionSplit
        };
        best.map(|(head, tail)| (head, tail, reason))
    }

    fn cut(&self, block: &Block, i: usize, at: usize, dialogue: bool) -> (Block, Block) {
        let line = &block.lines[i];
        let source = &self.lines[line.line_index];
        let print_notes = self.settings.print_notes;

        let mut head = block.lines[..i].to_vec();
        let mut tail = Vec::new();
        if at >= line.range.end {
            head.push(line.clone());
        } else {
            head.push(line.fragment(source, line.range.start..at, print_notes));
            tail.push(line.fragment(source, at..line.range.end, print_notes));
        }
        tail.extend(block.lines[i + 1..].iter().cloned());

        if dialogue {
            head.push(line.marker(LineType::More, &self.settings.more));
            let cue = &block.lines[0];
            let contd = &self.settings.contd;
            let text = if cue.text.ends_with(contd.as_str()) {
                cue.text.clone()
            } else {
                format!("{} {}", cue.text, contd)
            };
            tail.insert(0, cue.marker(cue.kind, &text));
        }

        let part = |lines: Vec<BlockLine>, continuation: bool| Block {
            kind: block.kind,
            lines,
            right: Vec::new(),
            continuation,
        };
        (part(head, block.continuation), part(tail, true))
    }

    fn acceptable(&self, head: &Block, tail: &Block, dialogue: bool) -> bool {
        let rules = self.settings.rules;
        let content_start = usize::from(dialogue);
        let head_content = &head.lines[content_start..head.lines.len() - usize::from(dialogue)];
        let tail_content = &tail.lines[content_start..];
        let rows = |lines: &[BlockLine]| -> usize {
            lines.iter().map(|l| self.style.rows(&l.text, l.kind)).sum()
        };

        if rows(head_content) < rules.min_lines_before_break
            || rows(tail_content) < rules.min_lines_after_break
        {
            return false;
        }
        !(dialogue
            && rules.avoid_parenthetical_at_break
            && head_content
                .last()
                .is_some_and(|l| l.kind == LineType::Parenthetical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::DocumentSettings,
        pagination::{block::build_blocks, style::MonospaceStylesheet},
        parsing::parse_document,
    };
    use pretty_assertions::assert_eq;
    use xi_rope::Rope;

    fn texts(block: &Block) -> Vec<&str> {
        block.lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn split_first(text: &str, available: usize) -> Option<(Block, Block, BreakReason)> {
        let lines = parse_document(&Rope::from(text), &DocumentSettings::default(), None);
        let settings = ExportSettings::default();
        let blocks = build_blocks(&lines, &settings);
        let style = MonospaceStylesheet::new();
        let splitter = Splitter {
            lines: &lines,
            style: &style,
            settings: &settings,
        };
        splitter.split(&blocks[0], available, true)
    }

    #[test]
    fn sentence_starts() {
        let text = "One. Two? Three! Four";
        assert_eq!(sentence_breaks(text, 0..text.len()), vec![5, 10, 17]);
        assert_eq!(sentence_breaks(text, 5..text.len()), vec![10, 17]);
    }

    #[test]
    fn dialogue_splits_between_lines_with_markers() {
        let (head, tail, reason) = split_first("BOB\nOne.\nTwo.\nThree.\nFour.\n", 4).unwrap();
        assert_eq!(reason, BreakReason::DialogueSplit);
        assert_eq!(texts(&head), vec!["BOB", "One.", "Two.", "(MORE)"]);
        assert_eq!(texts(&tail), vec!["BOB (CONT'D)", "Three.", "Four."]);
        assert!(tail.continuation);
        assert!(tail.lines[0].generated);
    }

    #[test]
    fn dialogue_splits_inside_a_line_at_a_sentence() {
        // each sentence wraps to two rows at dialogue width
        let a = "Aaaa aaaa aaaa aaaa aaaa aaaa aaaa aaaa.";
        let b = "Bbbb bbbb bbbb bbbb bbbb bbbb bbbb bbbb.";
        let c = "Cccc cccc cccc cccc cccc cccc cccc cccc.";
        let text = format!("BOB\n{a} {b} {c}\n");
        let (head, tail, _) = split_first(&text, 5).unwrap();
        assert_eq!(texts(&head), vec!["BOB", format!("{a} {b}").as_str(), "(MORE)"]);
        assert_eq!(texts(&tail), vec!["BOB (CONT'D)", c]);
        assert_eq!(head.lines[1].range, 0..82);
        assert_eq!(tail.lines[1].range, 82..122);
    }

    #[test]
    fn never_breaks_after_parenthetical() {
        let (head, _, _) = split_first("BOB\nOne.\nTwo.\n(beat)\nThree.\nFour.\n", 5).unwrap();
        assert_eq!(texts(&head), vec!["BOB", "One.", "Two.", "(MORE)"]);
    }

    #[test]
    fn respects_minimum_rows() {
        assert!(split_first("BOB\nOne.\nTwo.\nThree.\n", 3).is_none());
        assert!(split_first("BOB\nOne.\nTwo.\n", 10).is_none());
    }

    #[test]
    fn action_splits_without_markers() {
        let (head, tail, reason) = split_first("Line one.\nLine two.\nLine three.\nLine four.\nLine five.\n", 3).unwrap();
        assert_eq!(reason, BreakReason::ActionSplit);
        assert_eq!(texts(&head), vec!["Line one.", "Line two.", "Line three."]);
        assert_eq!(texts(&tail), vec!["Line four.", "Line five."]);
    }
}
