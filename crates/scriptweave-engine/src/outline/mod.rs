//! # Outline
//!
//! The outline is a forest of sections and scene headings built from the
//! flat line vector. Elements refer to each other and to lines by id and
//! index, never by pointer.
//!
//! ## Modules
//!
//! - **`element`**: `OutlineElement`, `OutlineForest` and serializable projections
//! - **`builder`**: `build()` derives the whole forest from lines
//! - **`diff`**: `diff()` compares two forests into a `ChangeSet`
//! - **`update`**: `update_local()` shifts an existing forest for edits that
//!   cannot change its shape
//!
//! ## Ranges
//!
//! - Own range: heading line through the next outline element of any kind
//! - Hierarchical range: for sections, through the next section of depth
//!   <= own; for scene headings, the own range
//! - Lines before the first element belong to no element

pub mod builder;
pub mod diff;
pub mod element;
pub mod update;

pub use builder::build;
pub use diff::{ChangeSet, diff};
pub use element::{OutlineElement, OutlineForest, OutlineKind, OutlineRecord};
pub use update::{LineEdit, update_local};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xi_rope::Rope;

    use super::*;
    use crate::{models::DocumentSettings, parsing::parse_document};

    const ACTS: &str = "Title: Acts

# Act One

= Setup.

INT. HOUSE - DAY

BOB
Hi.

## Sequence A

EXT. YARD - DAY [[color green]]

ALICE
Hello.

BOB
Bye.

# Act Two

INT. CAR - NIGHT
";

    fn outline(text: &str) -> (Vec<crate::models::Line>, OutlineForest) {
        let lines = parse_document(&Rope::from(text), &DocumentSettings::default(), None);
        let forest = build(&lines);
        (lines, forest)
    }

    fn render(forest: &OutlineForest) -> String {
        forest
            .elements()
            .iter()
            .map(|e| {
                let parent = e
                    .parent
                    .and_then(|p| forest.get(&p))
                    .map_or("-".to_string(), |p| p.string.clone());
                format!(
                    "{}{} [{}..{}/{}] parent={} chars={:?}",
                    "  ".repeat(e.depth.saturating_sub(1)),
                    e.string,
                    e.line_index,
                    e.own_end,
                    e.range_end,
                    parent,
                    e.characters
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn builds_nested_forest() {
        let (_, forest) = outline(ACTS);
        insta::assert_snapshot!(render(&forest), @r#"
        Act One [2..6/21] parent=- chars=[]
          INT. HOUSE - DAY [6..11/11] parent=Act One chars=["BOB"]
          Sequence A [11..13/21] parent=Act One chars=[]
            EXT. YARD - DAY [13..21/21] parent=Sequence A chars=["ALICE", "BOB"]
        Act Two [21..23/25] parent=- chars=[]
          INT. CAR - NIGHT [23..25/25] parent=Act Two chars=[]
        "#);
        assert_eq!(forest.roots().len(), 2);
    }

    #[test]
    fn element_metadata() {
        let (_, forest) = outline(ACTS);
        let act_one = &forest.elements()[0];
        assert_eq!(act_one.synopsis, vec!["Setup.".to_string()]);
        assert_eq!(act_one.children.len(), 2);
        let yard = &forest.elements()[3];
        assert_eq!(yard.color.as_deref(), Some("green"));
        assert_eq!(yard.scene_number.as_deref(), Some("2"));
        assert_eq!(yard.string, "EXT. YARD - DAY");
    }

    #[test]
    fn own_ranges_tile_from_first_element_to_end() {
        let (lines, forest) = outline(ACTS);
        let elements = forest.elements();
        for pair in elements.windows(2) {
            assert_eq!(pair[0].own_end, pair[1].line_index);
            assert_eq!(pair[0].position + pair[0].length, pair[1].position);
        }
        let last = elements.last().unwrap();
        assert_eq!(last.own_end, lines.len());
        assert_eq!(last.position + last.length, ACTS.len());
        assert_eq!(forest.element_at_line(8).map(|e| e.line_index), Some(6));
    }

    #[test]
    fn every_line_has_one_owner_after_the_preamble() {
        let (lines, forest) = outline(ACTS);
        let first = forest.first_owned_line().unwrap();
        assert_eq!(first, 2);
        for index in 0..lines.len() {
            let owners = forest
                .elements()
                .iter()
                .filter(|e| (e.line_index..e.own_end).contains(&index))
                .count();
            let expected = usize::from(index >= first);
            assert_eq!(owners, expected, "line {index}");
            assert_eq!(forest.element_at_line(index).is_some(), index >= first);
        }
        assert_eq!(OutlineForest::default().first_owned_line(), None);
    }

    #[test]
    fn diff_detects_added_removed_and_updated() {
        let (mut lines, old) = outline("INT. A\n\nEXT. B\n");
        lines[2].color = Some("red".into());
        let new_forest = build(&lines);
        let changes = diff(&old, &new_forest);
        assert_eq!(changes.updated, vec![lines[2].id]);
        assert!(!changes.needs_full_rebuild);

        let removed = build(&lines[..2]);
        let changes = diff(&old, &removed);
        assert_eq!(changes.removed, vec![lines[2].id]);
        assert!(changes.needs_full_rebuild);

        let changes = diff(&removed, &old);
        assert_eq!(changes.added, vec![lines[2].id]);
    }

    #[test]
    fn unchanged_outline_has_empty_changeset() {
        let (_, forest) = outline(ACTS);
        assert!(diff(&forest, &forest).is_empty());
    }

    #[test]
    fn serializable_projection() {
        let (_, forest) = outline("INT. A\n");
        let json = serde_json::to_value(forest.to_serializable()).unwrap();
        assert_eq!(json[0]["type"], "outlineElement");
        assert_eq!(json[0]["kind"], "heading");
        assert_eq!(json[0]["sceneNumber"], "1");
    }
}
