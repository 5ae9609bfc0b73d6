use std::collections::BTreeMap;

use crate::models::LineType;

use super::settings::{ExportSettings, PaperSize, StyleOverride};

/// Layout of one element type, in monospace cells and rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementStyle {
    pub width: usize,
    /// Blank rows above the element, dropped at the top of a page.
    pub margin_before: usize,
}

/// Measurement and spacing used by the paginator.
///
/// Implementations must be pure: the same text and type always measure the
/// same. Live pagination relies on it to reuse pages.
pub trait Stylesheet {
    /// Content rows available on one page.
    fn page_height(&self, paper: PaperSize) -> usize;

    fn element(&self, kind: LineType) -> ElementStyle;

    /// Rows `text` occupies when laid out as `kind`.
    fn rows(&self, text: &str, kind: LineType) -> usize {
        wrap_rows(text, self.element(kind).width)
    }
}

/// Greedy word wrap. Words longer than a row are broken; empty text is one row.
pub fn wrap_rows(text: &str, width: usize) -> usize {
    let width = width.max(1);
    let mut rows = 1;
    let mut column = 0;
    for word in text.split_whitespace() {
        let mut len = word.chars().count();
        let needed = if column == 0 { len } else { column + 1 + len };
        if needed <= width {
            column = needed;
            continue;
        }
        if column > 0 {
            rows += 1;
        }
        while len > width {
            rows += 1;
            len -= width;
        }
        column = len;
    }
    rows
}

/// Courier 12pt screenplay layout: one row per printed line.
#[derive(Debug, Clone, Default)]
pub struct MonospaceStylesheet {
    page_rows: Option<usize>,
    overrides: BTreeMap<LineType, StyleOverride>,
}

impl MonospaceStylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stylesheet with the overrides of `settings` applied. Unknown type
    /// names are ignored.
    pub fn from_settings(settings: &ExportSettings) -> Self {
        let overrides = settings
            .style_overrides
            .iter()
            .filter_map(|(name, o)| {
                let kind = LineType::ALL.into_iter().find(|k| k.name() == name.as_str())?;
                Some((kind, *o))
            })
            .collect();
        Self {
            page_rows: None,
            overrides,
        }
    }

    /// Fixed page height regardless of paper size.
    pub fn with_page_height(mut self, rows: usize) -> Self {
        self.page_rows = Some(rows);
        self
    }

    fn base(kind: LineType) -> ElementStyle {
        let (width, margin_before) = match kind {
            LineType::Heading => (61, 2),
            LineType::Character | LineType::DualDialogueCharacter => (38, 1),
            LineType::Dialogue => (35, 0),
            LineType::Lyrics => (35, 1),
            LineType::Parenthetical => (26, 0),
            LineType::DualDialogue => (27, 0),
            LineType::DualDialogueParenthetical => (22, 0),
            LineType::More | LineType::DualDialogueMore => (27, 0),
            _ => (61, 1),
        };
        ElementStyle {
            width,
            margin_before,
        }
    }
}

impl Stylesheet for MonospaceStylesheet {
    fn page_height(&self, paper: PaperSize) -> usize {
        self.page_rows.unwrap_or(match paper {
            PaperSize::Letter => 55,
            PaperSize::A4 => 58,
        })
    }

    fn element(&self, kind: LineType) -> ElementStyle {
        let mut style = Self::base(kind);
        if let Some(o) = self.overrides.get(&kind) {
            style.width = o.width.unwrap_or(style.width);
            style.margin_before = o.margin_before.unwrap_or(style.margin_before);
        }
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 10, 1)]
    #[case("aaa bbb ccc", 7, 2)]
    #[case("aaa bbb ccc", 11, 1)]
    #[case("abcdefghijkl", 5, 3)]
    #[case("ab abcdefghijkl", 5, 4)]
    fn wraps_words(#[case] text: &str, #[case] width: usize, #[case] rows: usize) {
        assert_eq!(wrap_rows(text, width), rows);
    }

    #[test]
    fn paper_sizes_and_overrides() {
        let sheet = MonospaceStylesheet::new();
        assert_eq!(sheet.page_height(PaperSize::Letter), 55);
        assert_eq!(sheet.page_height(PaperSize::A4), 58);
        assert_eq!(sheet.element(LineType::Heading).margin_before, 2);
        assert_eq!(sheet.element(LineType::Dialogue).width, 35);

        let mut settings = ExportSettings::default();
        settings.style_overrides.insert(
            "dialogue".into(),
            StyleOverride {
                width: Some(30),
                margin_before: None,
            },
        );
        settings
            .style_overrides
            .insert("nonsense".into(), StyleOverride::default());
        let sheet = MonospaceStylesheet::from_settings(&settings).with_page_height(20);
        assert_eq!(sheet.element(LineType::Dialogue).width, 30);
        assert_eq!(sheet.element(LineType::Dialogue).margin_before, 0);
        assert_eq!(sheet.page_height(PaperSize::A4), 20);
    }
}
