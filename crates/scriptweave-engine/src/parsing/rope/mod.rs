pub mod lines;
pub mod slice;

pub use lines::{LineRef, lines_with_spans, split_lines};
pub use slice::preview;
