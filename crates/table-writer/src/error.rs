use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("I/O error while writing table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow conversion error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("group key holds {found} values but {expected} key columns were named")]
    KeyShapeMismatch { expected: usize, found: usize },
}
