//! Line-level constructs that own their syntax: force markers, scene heading
//! prefixes and numbers, title page keys and heading metadata notes.

pub mod force;
pub mod heading;
pub mod heading_note;
pub mod title_page;

pub use force::{ForceMarker, Forced};
pub use heading::SceneHeading;
pub use heading_note::HeadingNote;
pub use title_page::TitlePage;
