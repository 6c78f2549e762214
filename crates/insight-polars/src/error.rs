//! Error types for insight-polars

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Table error: {0}")]
    Core(#[from] insight_core::Error),

    #[error("Timestamp out of range in column '{column}': {value}")]
    TimestampOutOfRange { column: String, value: i64 },
}

pub type Result<T> = std::result::Result<T, Error>;
