//! # Pivot Engine
//!
//! Reshapes a `RecordStore` so that the distinct values of one column
//! become output columns, each cell holding the mean of a value column
//! restricted to its (row key, spread value) pair.
//!
//! The output schema is discovered from the data, not declared up
//! front; both the dynamic columns and the rows come back in
//! lexicographic order so repeated runs over permuted input produce
//! identical tables. A cell with no matching input rows is an explicit
//! `None`, never a zero.

pub mod engine;
pub mod error;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use engine::PivotBuilder;
pub use error::PivotError;
pub use table::{PivotRow, PivotTable};
