//! # Inline Kinds
//!
//! Inline constructs that own their syntax delimiters. The scanner in
//! `parser` only ever refers to these constants; it never hardcodes `**` or
//! `[[`.
//!
//! - **`Emphasis`**: symmetric delimiters (`***`, `**`, `*`, `_`, `~~`)
//! - **`Note`**: `[[` ... `]]`, may span lines
//! - **`Omission`**: `/*` ... `*/`, may span lines, hides text from output
//! - **`Highlight`** / **`MacroSpan`**: bracket pairs `<<` `>>` and `{{` `}}`

pub mod brackets;
pub mod emphasis;
pub mod note;
pub mod omission;

pub use brackets::{Highlight, MacroSpan};
pub use emphasis::{Emphasis, EmphasisKind};
pub use note::Note;
pub use omission::Omission;

/// Escape character: the following character is always literal.
pub const ESCAPE: u8 = b'\\';
