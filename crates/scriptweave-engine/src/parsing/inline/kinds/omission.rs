/// Omitted ("boneyard") text. Takes precedence over every other construct and
/// carries across lines until `*/`.
pub struct Omission;

impl Omission {
    pub const OPEN: &'static [u8; 2] = b"/*";
    pub const CLOSE: &'static [u8; 2] = b"*/";
}
