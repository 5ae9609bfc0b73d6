pub mod line;
pub mod line_type;
pub mod range_set;
pub mod settings;

pub use line::{Line, LineId, LineRecord};
pub use line_type::LineType;
pub use range_set::RangeSet;
pub use settings::{DocumentSettings, RevisionRange};
