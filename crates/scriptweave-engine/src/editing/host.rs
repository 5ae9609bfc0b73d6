use std::ops::Range;

use crate::{
    editing::{Cmd, Patch, Screenplay, commands::transform_offset},
    models::LineId,
};

/// The text widget the document is shown in.
///
/// The host owns caret, selection and undo; the core only reads the
/// selection and asks for scrolling or text replacement.
pub trait EditorHost {
    /// Current selection as byte offsets into the buffer.
    fn selection(&self) -> Range<usize>;
    fn scroll_to_line(&mut self, line: usize);
    fn replace_text(&mut self, range: Range<usize>, text: &str);
}

/// Moves the document caret to the end of the host selection.
///
/// Returns the lines re-classified because the caret left or entered them.
pub fn sync_selection<H: EditorHost + ?Sized>(doc: &mut Screenplay, host: &H) -> Vec<usize> {
    doc.set_caret(Some(host.selection().end))
}

/// Scrolls the host to an outline element. False if the id is unknown.
pub fn reveal_element<H: EditorHost + ?Sized>(doc: &Screenplay, host: &mut H, id: &LineId) -> bool {
    match doc.outline().get(id) {
        Some(element) => {
            host.scroll_to_line(element.line_index);
            true
        }
        None => false,
    }
}

/// Applies a command to both the host widget and the document.
pub fn apply_host_edit<H: EditorHost + ?Sized>(doc: &mut Screenplay, host: &mut H, cmd: Cmd) -> Patch {
    host.replace_text(cmd.range(), cmd.text());
    doc.apply(cmd)
}

/// Maps a selection through an edit.
pub fn transform_selection(selection: Range<usize>, cmd: &Cmd) -> Range<usize> {
    let range = cmd.range();
    let inserted = cmd.text().len();
    transform_offset(selection.start, &range, inserted)..transform_offset(selection.end, &range, inserted)
}
