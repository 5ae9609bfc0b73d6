use std::ops::Range;

use crate::models::LineType;

/// A leading symbol that fixes the line type regardless of context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forced {
    pub kind: LineType,
    /// Marker bytes to hide from display.
    pub markup: Vec<Range<usize>>,
    /// Count of `#` for sections.
    pub depth: usize,
}

impl Forced {
    fn new(kind: LineType, markup: Vec<Range<usize>>) -> Self {
        Self {
            kind,
            markup,
            depth: 0,
        }
    }
}

pub struct ForceMarker;

impl ForceMarker {
    pub const SHOT: &'static str = "!!";
    pub const ACTION: &'static str = "!";
    pub const CHARACTER: &'static str = "@";
    pub const LYRICS: &'static str = "~";
    pub const HEADING: &'static str = ".";
    pub const TRANSITION: &'static str = ">";
    pub const CENTERED_CLOSE: char = '<';
    pub const SECTION: char = '#';
    pub const SYNOPSIS: &'static str = "=";
    pub const PAGE_BREAK: char = '=';

    /// Detects a force marker at the very start of `raw`.
    pub fn detect(raw: &str) -> Option<Forced> {
        let trimmed = raw.trim_end();

        if trimmed.len() >= 3 && trimmed.chars().all(|c| c == Self::PAGE_BREAK) {
            return Some(Forced::new(LineType::PageBreak, vec![0..trimmed.len()]));
        }
        if raw.starts_with(Self::SHOT) {
            return Some(Forced::new(LineType::Shot, vec![0..2]));
        }
        if raw.starts_with(Self::ACTION) {
            return Some(Forced::new(LineType::Action, vec![0..1]));
        }
        if raw.starts_with(Self::CHARACTER) {
            return Some(Forced::new(LineType::Character, vec![0..1]));
        }
        if raw.starts_with(Self::LYRICS) && !raw.starts_with("~~") {
            return Some(Forced::new(LineType::Lyrics, vec![0..1]));
        }
        if raw.starts_with(Self::HEADING) && !raw.starts_with("..") && raw.len() > 1 {
            return Some(Forced::new(LineType::Heading, vec![0..1]));
        }
        if raw.starts_with(Self::TRANSITION) {
            if trimmed.len() > 1 && trimmed.ends_with(Self::CENTERED_CLOSE) {
                let close = trimmed.len() - 1;
                return Some(Forced::new(LineType::Centered, vec![0..1, close..close + 1]));
            }
            return Some(Forced::new(LineType::TransitionLine, vec![0..1]));
        }
        if raw.starts_with(Self::SECTION) {
            let depth = raw.chars().take_while(|c| *c == Self::SECTION).count();
            return Some(Forced {
                kind: LineType::Section,
                markup: vec![0..depth],
                depth,
            });
        }
        if raw.starts_with(Self::SYNOPSIS) {
            return Some(Forced::new(LineType::Synopsis, vec![0..1]));
        }
        None
    }
}
