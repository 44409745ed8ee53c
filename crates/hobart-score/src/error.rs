//! Error types for scoring operations.

use thiserror::Error;

/// Result type for scoring operations.
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Errors that can occur while computing composite scores.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// The input table lacks the ticker key column
    #[error("Missing column: {0}")]
    MissingColumn(String),
}
