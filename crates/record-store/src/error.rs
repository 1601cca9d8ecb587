use thiserror::Error;

/// Schema violations detected at ingestion.
///
/// All variants are fatal for the `load` call: nothing partial is ever
/// returned, and nothing is silently coerced to a default.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("row {row}: required column '{column}' is missing")]
    MissingField { column: &'static str, row: usize },

    #[error("row {row}: cannot parse '{value}' as {column}")]
    InvalidValue {
        column: &'static str,
        value: String,
        row: usize,
    },

    #[error("row {row}: parameter '{parameter}' is not in the configured domain")]
    UnknownParameter { parameter: String, row: usize },
}
