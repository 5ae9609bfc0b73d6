use crate::{models::Line, parsing::rope::preview};

/// Renders lines as `index kind: text #scene` rows for snapshot testing.
pub fn render(lines: &[Line]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let mut row = format!("{i:02} {}", line.kind);
            let text = line.stripped();
            if !text.is_empty() {
                row.push_str(": ");
                row.push_str(&preview(&text, 40));
            }
            if let Some(n) = &line.scene_number {
                row.push_str(&format!(" #{n}"));
            }
            row
        })
        .collect::<Vec<_>>()
        .join("\n")
}
