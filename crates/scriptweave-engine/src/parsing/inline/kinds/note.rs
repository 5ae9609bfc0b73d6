/// Notes are never printed unless the export settings ask for them. An
/// unterminated `[[` carries into the next line.
pub struct Note;

impl Note {
    pub const OPEN: &'static [u8; 2] = b"[[";
    pub const CLOSE: &'static [u8; 2] = b"]]";
}
