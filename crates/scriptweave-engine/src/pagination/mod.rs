//! # Pagination
//!
//! Lays classified lines out on screenplay pages.
//!
//! ## Modules
//!
//! - **`settings`**: `ExportSettings`, paper size and widow/orphan rules
//! - **`style`**: the injected `Stylesheet` and the monospace default
//! - **`block`**: groups lines into layout `Block`s
//! - **`split`**: `(MORE)`/`(CONT'D)` dialogue splits and action splits
//! - **`paginator`**: `paginate()` packs blocks into `Page`s
//! - **`live`**: `LivePaginator` reuses unaffected pages between runs
//! - **`cancel`** / **`worker`**: background runs over `Arc<[Line]>` snapshots
//!
//! ## Key Invariants
//!
//! - Block heights depend only on block content and the stylesheet
//! - Page byte ranges tile the document; every printed line fragment lands
//!   on exactly one page
//! - A dialogue block only breaks through the `(MORE)`/`(CONT'D)` rule

pub mod block;
pub mod cancel;
pub mod live;
pub mod page;
pub mod paginator;
pub mod settings;
mod split;
pub mod style;
pub mod worker;

pub use block::{Block, BlockKind, BlockLine, build_blocks};
pub use cancel::CancellationToken;
pub use live::LivePaginator;
pub use page::{BreakReason, Page, PageBreak, PaginationResult};
pub use paginator::paginate;
pub use settings::{ExportSettings, PaginationRules, PaperSize, StyleOverride};
pub use style::{ElementStyle, MonospaceStylesheet, Stylesheet, wrap_rows};
pub use worker::{Finished, PaginationWorker};
