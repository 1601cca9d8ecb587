use core_types::Column;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PivotError {
    /// An empty store has no spread values to discover; the output
    /// schema would be ambiguous, so this is surfaced instead of
    /// silently producing a zero-column table.
    #[error("cannot pivot an empty record store")]
    EmptyStore,

    #[error("cannot pivot without at least one row-key column")]
    EmptyRowKey,

    #[error("column '{0}' is not numeric and cannot be aggregated")]
    NonNumericColumn(Column),
}
