use core_types::Column;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("cannot aggregate an empty record store")]
    EmptyStore,

    #[error("cannot aggregate without at least one group-by column")]
    EmptyGroupKey,

    #[error("column '{0}' is not numeric and cannot be used as a metric")]
    NonNumericColumn(Column),
}
