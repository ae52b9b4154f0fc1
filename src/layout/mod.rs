//! The page-layout engine: from a flat card sequence to rendered pages.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and keeps the geometry
//! math out of the PDF backend, which only draws what this module computed.
//!
//! ## Data Flow
//!
//! ```text
//! cards ──▶ grid ──▶ cell ──▶ (backend draws)
//! (flat)  (pages)  (fitted text per sub-region)
//! ```
//!
//! 1. [`grid`] — slice the flat card sequence into full pages of
//!    rows × columns cells, padding the tail with blanks
//! 2. [`fit`]  — measure text and shrink it until it fits a target box;
//!    pure functions, no PDF types anywhere
//! 3. [`cell`] — split one cell into four captioned sub-regions and fit
//!    each field's value into its region

pub mod cell;
pub mod fit;
pub mod grid;
