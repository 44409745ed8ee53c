#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod record;
pub mod schema;
pub mod source;
pub mod table;
pub mod types;

pub use cache::{MergeReport, MetricsCache, SchemaPolicy};
pub use error::{DataError, Result};
pub use record::{AssetMetricRecord, records_from_frame, records_to_frame};
pub use source::{CsvMetricSource, MetricSource};
pub use table::MetricsTable;
pub use types::{AssetClassKind, AssetFamily, MarketContext};

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
