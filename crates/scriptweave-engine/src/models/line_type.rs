use serde::{Deserialize, Serialize};

/// Screenplay element type of a single line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum LineType {
    #[default]
    Empty,
    Section,
    Synopsis,
    TitlePageTitle,
    TitlePageCredit,
    TitlePageAuthor,
    TitlePageSource,
    TitlePageDraftDate,
    TitlePageContact,
    TitlePageUnknown,
    Heading,
    Shot,
    Action,
    Character,
    Parenthetical,
    Dialogue,
    DualDialogueCharacter,
    DualDialogueParenthetical,
    DualDialogue,
    TransitionLine,
    Lyrics,
    Centered,
    PageBreak,
    /// Continuation marker emitted by the paginator, never by the parser.
    More,
    DualDialogueMore,
}

impl LineType {
    pub const ALL: [LineType; 25] = [
        LineType::Empty,
        LineType::Section,
        LineType::Synopsis,
        LineType::TitlePageTitle,
        LineType::TitlePageCredit,
        LineType::TitlePageAuthor,
        LineType::TitlePageSource,
        LineType::TitlePageDraftDate,
        LineType::TitlePageContact,
        LineType::TitlePageUnknown,
        LineType::Heading,
        LineType::Shot,
        LineType::Action,
        LineType::Character,
        LineType::Parenthetical,
        LineType::Dialogue,
        LineType::DualDialogueCharacter,
        LineType::DualDialogueParenthetical,
        LineType::DualDialogue,
        LineType::TransitionLine,
        LineType::Lyrics,
        LineType::Centered,
        LineType::PageBreak,
        LineType::More,
        LineType::DualDialogueMore,
    ];

    pub fn is_title_page(self) -> bool {
        matches!(
            self,
            LineType::TitlePageTitle
                | LineType::TitlePageCredit
                | LineType::TitlePageAuthor
                | LineType::TitlePageSource
                | LineType::TitlePageDraftDate
                | LineType::TitlePageContact
                | LineType::TitlePageUnknown
        )
    }

    /// Types that open an outline element.
    pub fn is_outline_element(self) -> bool {
        matches!(self, LineType::Section | LineType::Heading)
    }

    /// Types whose presence affects the outline tree.
    pub fn is_outline_related(self) -> bool {
        matches!(
            self,
            LineType::Section | LineType::Heading | LineType::Synopsis
        )
    }

    pub fn is_character(self) -> bool {
        matches!(self, LineType::Character | LineType::DualDialogueCharacter)
    }

    /// Cue, parenthetical or dialogue of either column.
    pub fn is_dialogue_family(self) -> bool {
        matches!(
            self,
            LineType::Character
                | LineType::Parenthetical
                | LineType::Dialogue
                | LineType::More
                | LineType::DualDialogueCharacter
                | LineType::DualDialogueParenthetical
                | LineType::DualDialogue
                | LineType::DualDialogueMore
        )
    }

    pub fn is_dual(self) -> bool {
        matches!(
            self,
            LineType::DualDialogueCharacter
                | LineType::DualDialogueParenthetical
                | LineType::DualDialogue
                | LineType::DualDialogueMore
        )
    }

    /// The leading symbol that forces this type regardless of context.
    pub fn force_symbol(self) -> Option<&'static str> {
        match self {
            LineType::Action => Some("!"),
            LineType::Shot => Some("!!"),
            LineType::Character => Some("@"),
            LineType::Lyrics => Some("~"),
            LineType::Heading => Some("."),
            LineType::TransitionLine => Some(">"),
            LineType::Section => Some("#"),
            LineType::Synopsis => Some("="),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LineType::Empty => "empty",
            LineType::Section => "section",
            LineType::Synopsis => "synopsis",
            LineType::TitlePageTitle => "titlePageTitle",
            LineType::TitlePageCredit => "titlePageCredit",
            LineType::TitlePageAuthor => "titlePageAuthor",
            LineType::TitlePageSource => "titlePageSource",
            LineType::TitlePageDraftDate => "titlePageDraftDate",
            LineType::TitlePageContact => "titlePageContact",
            LineType::TitlePageUnknown => "titlePageUnknown",
            LineType::Heading => "heading",
            LineType::Shot => "shot",
            LineType::Action => "action",
            LineType::Character => "character",
            LineType::Parenthetical => "parenthetical",
            LineType::Dialogue => "dialogue",
            LineType::DualDialogueCharacter => "dualDialogueCharacter",
            LineType::DualDialogueParenthetical => "dualDialogueParenthetical",
            LineType::DualDialogue => "dualDialogue",
            LineType::TransitionLine => "transitionLine",
            LineType::Lyrics => "lyrics",
            LineType::Centered => "centered",
            LineType::PageBreak => "pageBreak",
            LineType::More => "more",
            LineType::DualDialogueMore => "dualDialogueMore",
        }
    }
}

impl std::fmt::Display for LineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_serde_representation() {
        for kind in LineType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn outline_types() {
        assert!(LineType::Heading.is_outline_element());
        assert!(LineType::Section.is_outline_element());
        assert!(!LineType::Synopsis.is_outline_element());
        assert!(LineType::Synopsis.is_outline_related());
    }
}
