use log::debug;

use crate::models::{Line, LineType};

use super::element::{OutlineElement, OutlineForest, OutlineKind};

/// Builds the outline from scratch, in document order.
///
/// A section's depth is its count of `#`; its parent is the nearest
/// preceding section of strictly lesser depth. A scene heading sits one level
/// below the nearest preceding section, which is its parent.
pub fn build(lines: &[Line]) -> OutlineForest {
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.kind.is_outline_element())
        .map(|(i, _)| i)
        .collect();

    let mut elements: Vec<OutlineElement> = Vec::with_capacity(starts.len());
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(starts.len());
    // (depth, element index) of the open sections
    let mut open: Vec<(usize, usize)> = Vec::new();

    for (n, &line_index) in starts.iter().enumerate() {
        let line = &lines[line_index];
        let own_end = starts.get(n + 1).copied().unwrap_or(lines.len());

        let (kind, depth, parent) = if line.kind == LineType::Section {
            let depth = line.section_depth.max(1);
            while open.last().is_some_and(|(d, _)| *d >= depth) {
                open.pop();
            }
            let parent = open.last().map(|(_, e)| *e);
            open.push((depth, n));
            (OutlineKind::Section, depth, parent)
        } else {
            let parent = open.last().map(|(_, e)| *e);
            let depth = open.last().map_or(0, |(d, _)| *d) + 1;
            (OutlineKind::Heading, depth, parent)
        };

        let mut element = OutlineElement {
            id: line.id,
            kind,
            string: line.stripped(),
            depth,
            parent: parent.map(|p| elements[p].id),
            children: Vec::new(),
            synopsis: Vec::new(),
            characters: Vec::new(),
            storylines: line.storylines.clone(),
            color: line.color.clone(),
            scene_number: line.scene_number.clone(),
            omitted: line.omitted,
            line_index,
            own_end,
            range_end: own_end,
            position: 0,
            length: 0,
            range_length: 0,
        };
        element.collect_synopsis(lines);
        element.collect_characters(lines);
        elements.push(element);
        parents.push(parent);
    }

    for (child, parent) in parents.iter().enumerate() {
        if let Some(p) = parent {
            let id = elements[child].id;
            elements[*p].children.push(id);
        }
    }

    for n in 0..elements.len() {
        if elements[n].kind == OutlineKind::Section {
            let depth = elements[n].depth;
            elements[n].range_end = elements[n + 1..]
                .iter()
                .find(|e| e.kind == OutlineKind::Section && e.depth <= depth)
                .map_or(lines.len(), |e| e.line_index);
        }
        elements[n].measure(lines);
    }

    debug!("outline built: {} elements", elements.len());
    OutlineForest::from_elements(elements)
}
