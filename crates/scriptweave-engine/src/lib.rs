pub mod editing;
pub mod io;
pub mod models;
pub mod outline;
pub mod pagination;
pub mod parsing;

// Re-export key types for easier usage
pub use editing::{commands::*, document::*, patch::*};
pub use io::*;
pub use models::{DocumentSettings, Line, LineId, LineRecord, LineType, RangeSet, RevisionRange};
pub use outline::{ChangeSet, OutlineElement, OutlineForest, OutlineKind};
