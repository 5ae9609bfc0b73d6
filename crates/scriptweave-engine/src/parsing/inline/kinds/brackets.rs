pub struct Highlight;

impl Highlight {
    pub const OPEN: &'static [u8; 2] = b"<<";
    pub const CLOSE: &'static [u8; 2] = b">>";
}

/// Macro spans are raw zones: no emphasis is parsed inside them.
pub struct MacroSpan;

impl MacroSpan {
    pub const OPEN: &'static [u8; 2] = b"{{";
    pub const CLOSE: &'static [u8; 2] = b"}}";
}
