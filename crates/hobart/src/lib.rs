#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod assemble;
pub mod error;
pub mod pipeline;

// Re-export the layers under their concern names.
pub use hobart_data as data;
pub use hobart_output as output;
pub use hobart_rank as rank;
pub use hobart_score as score;

// Re-export the types a caller needs for a full run.
pub use error::{PipelineError, Result};
pub use hobart_data::{
    AssetClassKind, AssetFamily, AssetMetricRecord, MarketContext, MetricSource, MetricsCache,
    SchemaPolicy,
};
pub use hobart_output::AssetViews;
pub use pipeline::{PipelineConfig, RankingPipeline};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
