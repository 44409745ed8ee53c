//! Error type for pipeline runs.

use thiserror::Error;

/// Result type for pipeline runs.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort a pipeline run.
///
/// Per-asset fetch failures are not here: the collaborator signals them
/// as `None` and the pipeline omits the asset from the run. Everything
/// below leaves the run in a state later stages cannot trust, so the run
/// stops.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Data layer failure (cache storage, record conversion, source).
    #[error("Data error: {0}")]
    Data(#[from] hobart_data::DataError),

    /// Rank transform failure.
    #[error("Rank error: {0}")]
    Rank(#[from] hobart_rank::RankError),

    /// Composite scoring failure.
    #[error("Score error: {0}")]
    Score(#[from] hobart_score::ScoreError),

    /// View or statistics output failure.
    #[error("Output error: {0}")]
    Output(#[from] hobart_output::OutputError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
