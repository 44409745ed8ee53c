#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod percentile;
pub mod transform;

pub use error::{RankError, Result};
pub use percentile::{GroupedRanks, pct_rank_min, pct_rank_min_descending, pct_rank_min_grouped};
pub use transform::{
    BLEND_PEER_WEIGHT, BLEND_UNIVERSE_WEIGHT, RankConfig, RankedTables, rank_tables,
    rankable_columns,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_blend_weights_sum_to_one() {
        assert!((BLEND_UNIVERSE_WEIGHT + BLEND_PEER_WEIGHT - 1.0).abs() < f64::EPSILON);
    }
}
