//! Error types for ranking operations.

use thiserror::Error;

/// Result type for ranking operations.
pub type Result<T> = std::result::Result<T, RankError>;

/// Errors that can occur while ranking a table.
#[derive(Debug, Error)]
pub enum RankError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// The configured grouping column is absent from the input table
    #[error("Missing grouping column: {0}")]
    MissingGroupColumn(String),
}
