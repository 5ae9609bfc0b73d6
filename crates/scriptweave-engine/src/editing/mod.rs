/*!
 * # Editing Core
 *
 * Owns the document and keeps its line model current while it is edited.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The entire screenplay is stored in one **`xi_rope::Rope`** buffer
 * - Lines, scene numbers and the outline are derived from it, never the
 *   other way round
 * - Saving writes the rope bytes verbatim
 *
 * ### 2. Command-Based Editing
 * - All edits are **Commands** (`Cmd`) compiled to **Deltas**
 * - Every command returns a `Patch` naming the lines a view must redraw
 *
 * ### 3. Range-Scoped Re-parsing
 * - Only the lines overlapping an edit are re-split
 * - Classification continues past the edit until a line hands on the same
 *   state as before; later lines cannot change
 * - Any broken invariant falls back to a full parse of the buffer
 *
 * ### 4. Stable Line Ids
 * - Lines whose text survives an edit keep their `LineId`
 * - Outline elements are keyed by the id of their heading line, so a view
 *   can apply a `ChangeSet` without rebuilding
 *
 * ### 5. Host Integration
 * - The host text widget implements `EditorHost`
 * - Background readers work on `Screenplay::snapshot()` and send edits
 *   back as `Cmd` values
 *
 * ## Module Structure
 *
 * - **`document`**: `Screenplay`, full and incremental parsing
 * - **`commands`**: `Cmd` enum and delta compilation
 * - **`patch`**: edit result metadata
 * - **`host`**: `EditorHost` and the selection helpers
 *
 * ## Usage Pattern
 *
 * ```rust
 * use scriptweave_engine::editing::*;
 *
 * let mut doc = Screenplay::from_bytes(b"EXT. PIER - NIGHT\n\nFog.\n").unwrap();
 * let patch = doc.apply(Cmd::InsertText { at: 22, text: " Rain.".to_string() });
 * assert_eq!(patch.changed_lines, vec![2]);
 * assert_eq!(doc.text(), "EXT. PIER - NIGHT\n\nFog. Rain.\n");
 * ```
 */

pub mod commands;
pub mod document;
pub mod host;
pub mod patch;

pub use commands::Cmd;
pub use document::{ParserState, Screenplay};
pub use host::{EditorHost, apply_host_edit, reveal_element, sync_selection, transform_selection};
pub use patch::Patch;
