/// Symmetric emphasis delimiters, in the order they are paired.
///
/// Longer runs are paired first so that `***` is not read as `**` + `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisKind {
    BoldItalic,
    Bold,
    Italic,
    Underline,
    Strikeout,
}

pub struct Emphasis;

impl Emphasis {
    pub const ORDER: [EmphasisKind; 5] = [
        EmphasisKind::BoldItalic,
        EmphasisKind::Bold,
        EmphasisKind::Italic,
        EmphasisKind::Underline,
        EmphasisKind::Strikeout,
    ];

    pub fn delimiter(kind: EmphasisKind) -> &'static [u8] {
        match kind {
            EmphasisKind::BoldItalic => b"***",
            EmphasisKind::Bold => b"**",
            EmphasisKind::Italic => b"*",
            EmphasisKind::Underline => b"_",
            EmphasisKind::Strikeout => b"~~",
        }
    }
}
