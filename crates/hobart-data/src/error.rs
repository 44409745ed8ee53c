//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Missing column
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Invalid asset class label
    #[error("Invalid asset class: {0}")]
    InvalidAssetClass(String),

    /// Metric source error
    #[error("Metric source error for {ticker}: {reason}")]
    Source {
        /// Ticker that was being computed
        ticker: String,
        /// Reason for the failure
        reason: String,
    },
}
