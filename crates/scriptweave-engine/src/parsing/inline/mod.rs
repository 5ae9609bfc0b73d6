//! # Inline Scanning
//!
//! Cursor-based inline scanning with explicit raw zones.
//!
//! Every line is scanned on its own, left to right. The only state carried
//! between lines is whether a note (`[[`) or an omission (`/*`) is still open
//! at line end; the classifier threads those flags from one line to the next.
//!
//! ## Modules
//!
//! - **`types`**: `Formatting` range sets and the `InlineScan` result
//! - **`kinds`**: delimiter constants owned by each construct
//! - **`cursor`**: `Cursor` for byte-by-byte scanning with position tracking
//! - **`parser`**: `scan_inline()` main entry point
//!
//! ## Raw Zone Precedence
//!
//! Omissions beat notes, notes and macros beat emphasis:
//! `[[*not italic*]]` is a single note, not a note containing italics.

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::scan_inline;
pub use types::{Formatting, InlineScan};
