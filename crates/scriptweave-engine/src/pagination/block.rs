use std::{
    hash::{DefaultHasher, Hash, Hasher},
    ops::Range,
};

use serde::Serialize;

use crate::models::{Line, LineId, LineType};

use super::settings::ExportSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    /// Consecutive action, centered or lyrics lines, or a printed section or synopsis.
    Paragraph,
    /// Cue with its parentheticals and dialogue.
    Dialogue,
    /// Two dialogue clusters printed side by side.
    DualDialogue,
    /// Scene heading or shot.
    Heading,
    Transition,
    PageBreak,
}

/// One printed line, or the part of a source line placed on a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLine {
    pub line_id: LineId,
    pub line_index: usize,
    pub kind: LineType,
    pub text: String,
    /// Byte range of the source line's string this fragment prints.
    pub range: Range<usize>,
    /// Document offset of the source line.
    pub position: usize,
    pub scene_number: Option<String>,
    /// Highest visible revision generation on the source line.
    pub revision: Option<u8>,
    /// `(MORE)` markers and repeated cues; they print no source text.
    pub generated: bool,
}

impl BlockLine {
    pub fn from_line(line: &Line, index: usize, settings: &ExportSettings) -> Self {
        Self {
            line_id: line.id,
            line_index: index,
            kind: line.kind,
            text: line.display_text(settings.print_notes).trim().to_string(),
            range: 0..line.len(),
            position: line.position,
            scene_number: if settings.print_scene_numbers {
                line.scene_number.clone()
            } else {
                None
            },
            revision: line.revision_in(&settings.visible_revisions),
            generated: false,
        }
    }

    /// Document offset where this fragment starts.
    pub fn start(&self) -> usize {
        self.position + self.range.start
    }

    /// Fragment of this line printing `range` of `source`.
    pub(crate) fn fragment(&self, source: &Line, range: Range<usize>, print_notes: bool) -> Self {
        Self {
            text: source.display_text_in(range.clone(), print_notes).trim().to_string(),
            range,
            ..self.clone()
        }
    }

    /// A marker printed after this line, such as `(MORE)`.
    pub(crate) fn marker(&self, kind: LineType, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
            range: self.range.end..self.range.end,
            scene_number: None,
            revision: None,
            generated: true,
            ..self.clone()
        }
    }
}

/// Smallest unit the paginator places.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub kind: BlockKind,
    pub lines: Vec<BlockLine>,
    /// Right column of a dual dialogue block.
    pub right: Vec<BlockLine>,
    /// Second part of a block split across pages.
    pub continuation: bool,
}

impl Block {
    fn new(kind: BlockKind, line: BlockLine) -> Self {
        Self {
            kind,
            lines: vec![line],
            right: Vec::new(),
            continuation: false,
        }
    }

    /// Hash of everything layout depends on, positions included.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// First line carrying source text.
    pub fn first_source_line(&self) -> Option<&BlockLine> {
        self.lines.iter().find(|l| !l.generated)
    }

    pub fn source_lines(&self) -> impl Iterator<Item = &BlockLine> {
        self.lines.iter().chain(&self.right).filter(|l| !l.generated)
    }

    /// Must not be the last thing on a page.
    pub fn keeps_with_next(&self) -> bool {
        match self.kind {
            BlockKind::Heading => true,
            BlockKind::Dialogue => self.lines.len() == 1,
            _ => false,
        }
    }

    pub fn is_splittable(&self) -> bool {
        match self.kind {
            BlockKind::Dialogue => self.lines.len() > 1,
            BlockKind::Paragraph => self.lines.iter().all(|l| l.kind == LineType::Action),
            _ => false,
        }
    }
}

/// Groups printable lines into blocks.
///
/// Omitted and title page lines never print. Empty lines only separate
/// blocks. Sections, synopses and note-only lines print when the settings
/// ask for them.
pub fn build_blocks(lines: &[Line], settings: &ExportSettings) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut open: Option<Block> = None;
    let mut right_column = false;

    for (index, line) in lines.iter().enumerate() {
        if line.omitted {
            continue;
        }
        let printed = match line.kind {
            LineType::Empty | LineType::More | LineType::DualDialogueMore => false,
            LineType::Section => settings.print_sections,
            LineType::Synopsis => settings.print_synopses,
            kind => !kind.is_title_page(),
        };
        if !printed {
            blocks.extend(open.take());
            continue;
        }

        let block_line = BlockLine::from_line(line, index, settings);
        if block_line.text.is_empty() && !line.notes.is_empty() && !line.kind.is_dialogue_family() {
            continue;
        }

        match line.kind {
            LineType::Character => {
                blocks.extend(open.take());
                right_column = false;
                open = Some(Block::new(BlockKind::Dialogue, block_line));
            }
            LineType::DualDialogueCharacter => {
                blocks.extend(open.take());
                match blocks.pop() {
                    Some(mut block) if block.kind == BlockKind::Dialogue => {
                        block.kind = BlockKind::DualDialogue;
                        block.right.push(block_line);
                        right_column = true;
                        open = Some(block);
                    }
                    previous => {
                        blocks.extend(previous);
                        right_column = false;
                        open = Some(Block::new(BlockKind::Dialogue, block_line));
                    }
                }
            }
            LineType::Parenthetical
            | LineType::Dialogue
            | LineType::DualDialogueParenthetical
            | LineType::DualDialogue => match open.as_mut() {
                Some(block) if matches!(block.kind, BlockKind::Dialogue | BlockKind::DualDialogue) => {
                    if right_column {
                        block.right.push(block_line);
                    } else {
                        block.lines.push(block_line);
                    }
                }
                _ => {
                    blocks.extend(open.take());
                    open = Some(Block::new(BlockKind::Paragraph, block_line));
                }
            },
            LineType::Action | LineType::Centered | LineType::Lyrics => match open.as_mut() {
                Some(block)
                    if block.kind == BlockKind::Paragraph
                        && block.lines.last().is_some_and(|l| l.kind == line.kind) =>
                {
                    block.lines.push(block_line);
                }
                _ => {
                    blocks.extend(open.take());
                    open = Some(Block::new(BlockKind::Paragraph, block_line));
                }
            },
            kind => {
                blocks.extend(open.take());
                let block_kind = match kind {
                    LineType::Heading | LineType::Shot => BlockKind::Heading,
                    LineType::TransitionLine => BlockKind::Transition,
                    LineType::PageBreak => BlockKind::PageBreak,
                    _ => BlockKind::Paragraph,
                };
                blocks.push(Block::new(block_kind, block_line));
            }
        }
    }
    blocks.extend(open);
    blocks
}
