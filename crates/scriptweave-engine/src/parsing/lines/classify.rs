use crate::{
    models::{LineType, RangeSet},
    parsing::inline::{Formatting, scan_inline},
};

use super::kinds::{ForceMarker, HeadingNote, SceneHeading, TitlePage};

/// What a line passes on to the line after it.
///
/// This is the only state threaded through classification: if re-classifying
/// a line yields the same `Preceding` as before, nothing after it can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preceding {
    pub kind: LineType,
    pub note_out: bool,
    pub omit_out: bool,
}

impl Preceding {
    pub fn is_empty(&self) -> bool {
        self.kind == LineType::Empty
    }
}

/// Neighbourhood facts a line's type depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext {
    /// `None` for the first line of the document.
    pub previous: Option<Preceding>,
    /// True when the next line is blank or this is the last line.
    pub next_is_empty: bool,
    /// The caret is on this line.
    pub actively_edited: bool,
}

impl LineContext {
    pub fn first() -> Self {
        Self {
            previous: None,
            next_is_empty: true,
            actively_edited: false,
        }
    }

    fn previous_is_empty(&self) -> bool {
        self.previous.is_none_or(|p| p.is_empty())
    }

    fn flanked(&self) -> bool {
        self.previous_is_empty() && self.next_is_empty
    }
}

/// Everything classification derives from one line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub kind: LineType,
    pub formatting: Formatting,
    pub notes: Vec<String>,
    pub section_depth: usize,
    pub forced_scene_number: Option<String>,
    pub color: Option<String>,
    pub storylines: Vec<String>,
    pub note_in: bool,
    pub note_out: bool,
    pub omit_in: bool,
    pub omit_out: bool,
    pub omitted: bool,
}

impl Classification {
    pub fn preceding(&self) -> Preceding {
        Preceding {
            kind: self.kind,
            note_out: self.note_out,
            omit_out: self.omit_out,
        }
    }
}

/// Classifies Fountain lines.
///
/// Pure: the same text and context always give the same classification,
/// which is what makes range-scoped re-parsing safe.
#[derive(Debug, Clone, Copy, Default)]
pub struct FountainClassifier;

impl FountainClassifier {
    pub fn classify(&self, raw: &str, ctx: &LineContext) -> Classification {
        let note_in = ctx.previous.is_some_and(|p| p.note_out);
        let omit_in = ctx.previous.is_some_and(|p| p.omit_out);
        let scan = scan_inline(raw, note_in, omit_in);

        let omitted = if raw.is_empty() {
            omit_in && scan.omit_out
        } else {
            scan.formatting.omissions.covers(&(0..raw.len()))
        };

        let mut out = Classification {
            formatting: scan.formatting,
            notes: scan.notes,
            note_in,
            note_out: scan.note_out,
            omit_in,
            omit_out: scan.omit_out,
            omitted,
            ..Default::default()
        };
        out.kind = self.line_type(raw, ctx, &mut out);

        if matches!(out.kind, LineType::Heading | LineType::Section) {
            let (color, storylines) = HeadingNote::parse(&out.notes);
            out.color = color;
            out.storylines = storylines;
        }
        out
    }

    fn line_type(&self, raw: &str, ctx: &LineContext, out: &mut Classification) -> LineType {
        let previous = ctx.previous.map(|p| p.kind);

        if raw.trim().is_empty() {
            // Two spaces keep a dialogue block open.
            if raw == "  " {
                match previous {
                    Some(LineType::Character | LineType::Parenthetical | LineType::Dialogue) => {
                        return LineType::Dialogue;
                    }
                    Some(
                        LineType::DualDialogueCharacter
                        | LineType::DualDialogueParenthetical
                        | LineType::DualDialogue,
                    ) => return LineType::DualDialogue,
                    _ => {}
                }
            }
            return LineType::Empty;
        }

        if let Some(kind) = self.title_page_type(raw, previous) {
            if let Some(len) = TitlePage::key_len(raw) {
                out.formatting.markup.insert(0..len);
            }
            return kind;
        }

        if let Some(forced) = ForceMarker::detect(raw) {
            for range in forced.markup {
                out.formatting.markup.insert(range);
            }
            out.section_depth = forced.depth;
            return match forced.kind {
                LineType::Heading => {
                    self.mark_scene_number(raw, out);
                    LineType::Heading
                }
                LineType::Character => self.cue_type(raw, out),
                kind => kind,
            };
        }

        let visible = visible_text(raw, &out.formatting, out.omitted);
        let text = visible.trim();

        if SceneHeading::has_prefix(text) && ctx.flanked() {
            self.mark_scene_number(raw, out);
            return LineType::Heading;
        }

        if is_upper(text) && text.ends_with("TO:") && ctx.flanked() {
            return LineType::TransitionLine;
        }

        if ctx.previous_is_empty()
            && (!ctx.next_is_empty || ctx.actively_edited)
            && !SceneHeading::has_prefix(text)
            && is_cue_name(text)
        {
            return self.cue_type(raw, out);
        }

        match previous {
            Some(LineType::Character | LineType::Parenthetical | LineType::Dialogue) => {
                if text.starts_with('(') {
                    LineType::Parenthetical
                } else {
                    LineType::Dialogue
                }
            }
            Some(
                LineType::DualDialogueCharacter
                | LineType::DualDialogueParenthetical
                | LineType::DualDialogue,
            ) => {
                if text.starts_with('(') {
                    LineType::DualDialogueParenthetical
                } else {
                    LineType::DualDialogue
                }
            }
            _ => LineType::Action,
        }
    }

    fn title_page_type(&self, raw: &str, previous: Option<LineType>) -> Option<LineType> {
        match previous {
            None => TitlePage::key_type(raw),
            Some(prev) if prev.is_title_page() => {
                if TitlePage::is_continuation(raw) {
                    Some(prev)
                } else {
                    TitlePage::key_type(raw)
                }
            }
            _ => None,
        }
    }

    /// A trailing `^` turns a cue into the right column of dual dialogue.
    fn cue_type(&self, raw: &str, out: &mut Classification) -> LineType {
        let trimmed = raw.trim_end();
        if trimmed.ends_with('^') {
            let at = trimmed.len() - 1;
            out.formatting.markup.insert(at..at + 1);
            LineType::DualDialogueCharacter
        } else {
            LineType::Character
        }
    }

    fn mark_scene_number(&self, raw: &str, out: &mut Classification) {
        if let Some((range, number)) = SceneHeading::forced_number(raw) {
            out.formatting.markup.insert(range);
            out.forced_scene_number = Some(number);
        }
    }
}

/// Text used for type tests: notes, delimiters and escapes removed. Omitted
/// text is removed too unless the whole line is omitted, in which case the
/// line keeps its natural type.
fn visible_text(raw: &str, formatting: &Formatting, omitted: bool) -> String {
    let hidden: RangeSet = if omitted {
        formatting
            .markup
            .union(&formatting.escapes)
            .union(&formatting.notes)
    } else {
        formatting.hidden(false)
    };
    raw.char_indices()
        .filter(|(i, _)| !hidden.contains(*i))
        .map(|(_, c)| c)
        .collect()
}

fn is_upper(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}

/// The name part of a cue (before any extension) is uppercase.
fn is_cue_name(text: &str) -> bool {
    let text = text.strip_suffix('^').unwrap_or(text).trim_end();
    let name = text.split('(').next().unwrap_or_default();
    is_upper(name) && !text.ends_with(':')
}
