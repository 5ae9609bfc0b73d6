//! Whole-document parsing tests.
//!
//! Classified documents are rendered to one row per line and compared with
//! inline `insta` snapshots.

mod normalize;

use xi_rope::Rope;

use crate::{
    models::{DocumentSettings, Line, LineType, RevisionRange},
    parsing::{
        collect_revisions,
        inline::scan_inline,
        lines::{FountainClassifier, context_at},
        parse_document,
    },
};

const HEIST: &str = "Title: The Heist
Author: Jane Doe

# Act One

= The crew assembles.

INT. WAREHOUSE - NIGHT

Rain hammers the roof.

DANNY
(whispering)
Is everyone here?

RUSTY ^
Always.

CUT TO:

EXT. ROOFTOP - CONTINUOUS #5#

!!WIDE SHOT

>THE END<
";

fn parse(text: &str) -> (Rope, Vec<Line>) {
    let rope = Rope::from(text);
    let lines = parse_document(&rope, &DocumentSettings::default(), None);
    invariants::check(&rope, &lines);
    (rope, lines)
}

#[test]
fn heist_document() {
    let (_, lines) = parse(HEIST);
    insta::assert_snapshot!(normalize::render(&lines), @r"
    00 titlePageTitle: The Heist
    01 titlePageAuthor: Jane Doe
    02 empty
    03 section: Act One
    04 empty
    05 synopsis: The crew assembles.
    06 empty
    07 heading: INT. WAREHOUSE - NIGHT #1
    08 empty
    09 action: Rain hammers the roof.
    10 empty
    11 character: DANNY
    12 parenthetical: (whispering)
    13 dialogue: Is everyone here?
    14 empty
    15 dualDialogueCharacter: RUSTY
    16 dualDialogue: Always.
    17 empty
    18 transitionLine: CUT TO:
    19 empty
    20 heading: EXT. ROOFTOP - CONTINUOUS #5
    21 empty
    22 shot: WIDE SHOT
    23 empty
    24 centered: THE END
    25 empty
    ");
}

#[test]
fn kitchen_scenario() {
    let (_, lines) = parse("INT. KITCHEN - DAY\n\nJOHN enters.\n\n");
    assert_eq!(lines[0].kind, LineType::Heading);
    assert_eq!(lines[2].kind, LineType::Action);
}

#[test]
fn heading_without_blank_line_is_action() {
    let (_, lines) = parse("INT. KITCHEN - DAY\nJOHN enters.\n\n");
    assert_eq!(lines[0].kind, LineType::Action);
    assert_eq!(lines[1].kind, LineType::Action);
}

#[test]
fn empty_document_has_one_empty_line() {
    let (_, lines) = parse("");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].kind, LineType::Empty);
}

#[test]
fn blank_lines_only() {
    let (_, lines) = parse("\n\n\n");
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().all(|l| l.kind == LineType::Empty));
}

#[test]
fn multi_line_note_and_omission() {
    let (_, lines) = parse("Start [[a note\nstill note]] end.\n\n/* gone\n\nINT. CUT SCENE\n\n*/ back");
    assert!(lines[0].note_out);
    assert!(lines[1].note_in && !lines[1].note_out);
    assert_eq!(lines[1].notes, vec!["still note".to_string()]);
    assert!(lines[3].omit_out);
    assert!(lines[5].omitted);
    assert_eq!(lines[5].kind, LineType::Heading);
    assert!(lines[5].scene_number.is_none());
    assert!(!lines[7].omitted);
    assert_eq!(lines[7].stripped(), "back");
}

#[test]
fn revisions_attach_and_collect() {
    let rope = Rope::from("One line\nTwo line\n");
    let settings = DocumentSettings {
        revisions: vec![RevisionRange {
            generation: 2,
            range: 4..13,
        }],
        ..Default::default()
    };
    let lines = parse_document(&rope, &settings, None);
    assert_eq!(lines[0].revisions[&2].as_slice(), &[4..8]);
    assert_eq!(lines[1].revisions[&2].as_slice(), &[0..4]);
    let collected = collect_revisions(&lines);
    assert_eq!(collected.len(), 2);
    assert_eq!(collected[0].range, 4..8);
    assert_eq!(collected[1].range, 9..13);
}

#[test]
fn scene_numbers_start_from_settings() {
    let rope = Rope::from("INT. A\n\nEXT. B\n");
    let settings = DocumentSettings {
        scene_number_start: 10,
        ..Default::default()
    };
    let lines = parse_document(&rope, &settings, None);
    assert_eq!(lines[0].scene_number.as_deref(), Some("10"));
    assert_eq!(lines[2].scene_number.as_deref(), Some("11"));
}

/// Reclassifying a line with its inline formatting stripped yields the same
/// type; line-level markers stay because they are not inline formatting.
#[test]
fn stripping_inline_formatting_keeps_types() {
    let text = "INT. **LOBBY** - DAY\n\n_BOB_ (V.O.)\n*Hello*, [[aside]] friend.\n\n!~~Not~~ a heading.\n\n>**FADE OUT.**<\n";
    let (_, lines) = parse(text);
    for (i, line) in lines.iter().enumerate() {
        if line.note_in || line.note_out || line.omit_in || line.omit_out {
            continue;
        }
        let hidden = scan_inline(&line.string, false, false)
            .formatting
            .hidden(false);
        let stripped: String = line
            .string
            .char_indices()
            .filter(|(at, _)| !hidden.contains(*at))
            .map(|(_, c)| c)
            .collect();
        if stripped.trim().is_empty() != line.string.trim().is_empty() {
            continue;
        }
        let ctx = context_at(&lines, i, None);
        let again = FountainClassifier.classify(&stripped, &ctx);
        assert_eq!(again.kind, line.kind, "line {i}: {:?}", line.string);
    }
    assert_eq!(lines[0].kind, LineType::Heading);
    assert_eq!(lines[2].kind, LineType::Character);
    assert_eq!(lines[3].kind, LineType::Dialogue);
    assert_eq!(lines[5].kind, LineType::Action);
    assert_eq!(lines[7].kind, LineType::Centered);
}
