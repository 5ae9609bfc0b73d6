use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Line, LineId, LineType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutlineKind {
    Section,
    Heading,
}

/// A section or scene heading plus the lines it owns.
///
/// Identity is the heading line's [`LineId`]. Line-index fields are
/// exclusive ends into the owning document's line vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineElement {
    pub id: LineId,
    pub kind: OutlineKind,
    /// Display string of the heading line.
    pub string: String,
    pub depth: usize,
    pub parent: Option<LineId>,
    pub children: Vec<LineId>,
    pub synopsis: Vec<String>,
    /// Cue names inside the own range, first appearance order.
    pub characters: Vec<String>,
    pub storylines: Vec<String>,
    pub color: Option<String>,
    pub scene_number: Option<String>,
    pub omitted: bool,
    pub line_index: usize,
    /// End of the own range: the next outline element of any kind.
    pub own_end: usize,
    /// End of the hierarchical range.
    pub range_end: usize,
    /// Byte position of the heading line.
    pub position: usize,
    /// Byte length of the own range.
    pub length: usize,
    /// Byte length of the hierarchical range.
    pub range_length: usize,
}

impl OutlineElement {
    /// Fields a consumer would redraw for. Positions are not included: they
    /// move on every keystroke above the element.
    pub fn differs_from(&self, other: &OutlineElement) -> bool {
        self.kind != other.kind
            || self.string != other.string
            || self.color != other.color
            || self.storylines != other.storylines
            || self.scene_number != other.scene_number
            || self.synopsis != other.synopsis
            || self.omitted != other.omitted
            || self.depth != other.depth
    }

    pub fn to_serializable(&self) -> OutlineRecord {
        OutlineRecord {
            id: self.id,
            kind: self.kind,
            string: self.string.clone(),
            depth: self.depth,
            parent: self.parent,
            children: self.children.clone(),
            synopsis: self.synopsis.clone(),
            characters: self.characters.clone(),
            storylines: self.storylines.clone(),
            color: self.color.clone(),
            scene_number: self.scene_number.clone(),
            omitted: self.omitted,
            line_index: self.line_index,
            position: self.position,
            length: self.length,
            range_length: self.range_length,
        }
    }

    /// Recomputes byte positions and lengths from the current lines.
    pub(crate) fn measure(&mut self, lines: &[Line]) {
        let start = lines[self.line_index].position;
        let byte_at = |index: usize| match lines.get(index) {
            Some(line) => line.position,
            None => lines.last().map_or(0, Line::end),
        };
        self.position = start;
        self.length = byte_at(self.own_end) - start;
        self.range_length = byte_at(self.range_end) - start;
    }

    /// Recomputes the cue names of the own range.
    pub(crate) fn collect_characters(&mut self, lines: &[Line]) {
        self.characters.clear();
        for line in &lines[self.line_index..self.own_end] {
            let Some(name) = line.character_name() else {
                continue;
            };
            if !self.characters.contains(&name) {
                self.characters.push(name);
            }
        }
    }

    pub(crate) fn collect_synopsis(&mut self, lines: &[Line]) {
        self.synopsis = lines[self.line_index..self.own_end]
            .iter()
            .filter(|l| l.kind == LineType::Synopsis)
            .map(Line::stripped)
            .collect();
    }
}

/// Serializable projection of an [`OutlineElement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "outlineElement", rename_all = "camelCase")]
pub struct OutlineRecord {
    pub id: LineId,
    pub kind: OutlineKind,
    pub string: String,
    pub depth: usize,
    pub parent: Option<LineId>,
    pub children: Vec<LineId>,
    pub synopsis: Vec<String>,
    pub characters: Vec<String>,
    pub storylines: Vec<String>,
    pub color: Option<String>,
    pub scene_number: Option<String>,
    pub omitted: bool,
    pub line_index: usize,
    pub position: usize,
    pub length: usize,
    pub range_length: usize,
}

/// All outline elements in document order.
///
/// Own ranges partition the lines from the first element to the end of the
/// document. Lines before the first element (title page, preamble) belong
/// to no element; [`element_at_line`](Self::element_at_line) returns `None`
/// for them and [`first_owned_line`](Self::first_owned_line) marks where
/// ownership starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineForest {
    elements: Vec<OutlineElement>,
    roots: Vec<LineId>,
    index: HashMap<LineId, usize>,
}

impl OutlineForest {
    pub(crate) fn from_elements(elements: Vec<OutlineElement>) -> Self {
        let roots = elements
            .iter()
            .filter(|e| e.parent.is_none())
            .map(|e| e.id)
            .collect();
        let index = elements.iter().enumerate().map(|(i, e)| (e.id, i)).collect();
        Self {
            elements,
            roots,
            index,
        }
    }

    pub fn elements(&self) -> &[OutlineElement] {
        &self.elements
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [OutlineElement] {
        &mut self.elements
    }

    pub fn roots(&self) -> &[LineId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: &LineId) -> Option<&OutlineElement> {
        self.index.get(id).map(|i| &self.elements[*i])
    }

    pub fn children_of(&self, id: &LineId) -> impl Iterator<Item = &OutlineElement> {
        self.get(id)
            .into_iter()
            .flat_map(|e| e.children.iter())
            .filter_map(|c| self.get(c))
    }

    /// The element whose own range contains line `line_index`, if any.
    pub fn element_at_line(&self, line_index: usize) -> Option<&OutlineElement> {
        let after = self.elements.partition_point(|e| e.line_index <= line_index);
        let element = self.elements.get(after.checked_sub(1)?)?;
        (line_index < element.own_end).then_some(element)
    }

    /// Index of the first line owned by an element, `None` for an empty
    /// outline.
    pub fn first_owned_line(&self) -> Option<usize> {
        self.elements.first().map(|e| e.line_index)
    }

    /// Scene headings only, in document order.
    pub fn scenes(&self) -> impl Iterator<Item = &OutlineElement> {
        self.elements
            .iter()
            .filter(|e| e.kind == OutlineKind::Heading)
    }

    pub fn to_serializable(&self) -> Vec<OutlineRecord> {
        self.elements.iter().map(OutlineElement::to_serializable).collect()
    }
}
