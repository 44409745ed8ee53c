//! Table-level percentile rank transform.
//!
//! Produces three parallel tables from one numeric input table: ranks
//! within each peer group, ranks across the whole universe, and a blended
//! rank that prefers the peer comparison but degrades gracefully where
//! peer groups are too thin to be meaningful.

use crate::error::{RankError, Result};
use crate::percentile::{pct_rank_min, pct_rank_min_grouped};
use polars::prelude::*;
use std::collections::HashSet;

/// Universe weight of the thin-group blend.
pub const BLEND_UNIVERSE_WEIGHT: f64 = 0.65;
/// Peer weight of the thin-group blend.
pub const BLEND_PEER_WEIGHT: f64 = 0.35;

/// Configuration of a rank transform.
#[derive(Debug, Clone)]
pub struct RankConfig {
    /// Column holding the peer-group label.
    pub group_column: String,
    /// Columns where a lower raw value is better; negated before ranking
    /// so every output percentile reads "higher is better".
    pub minimize: HashSet<String>,
    /// Columns never ranked (identifiers, labels, raw counts). They pass
    /// through all three output tables unchanged.
    pub exclude: HashSet<String>,
    /// Peer-group population at which the peer rank is fully trusted.
    pub full_trust_group_size: usize,
    /// Peer-group population below which the peer rank is discarded
    /// entirely in favor of the universe rank.
    pub min_peer_group_size: usize,
}

impl RankConfig {
    /// Create a configuration with the default group-size gates.
    pub fn new(group_column: impl Into<String>) -> Self {
        Self {
            group_column: group_column.into(),
            minimize: HashSet::new(),
            exclude: HashSet::new(),
            full_trust_group_size: 3,
            min_peer_group_size: 2,
        }
    }

    /// Set the minimize column set.
    #[must_use]
    pub fn with_minimize(mut self, columns: &[&str]) -> Self {
        self.minimize = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Set the excluded column set.
    #[must_use]
    pub fn with_exclude(mut self, columns: &[&str]) -> Self {
        self.exclude = columns.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// The three rank variants of one input table.
///
/// Structurally identical to the input: ranked columns hold percentiles in
/// (0, 1], everything in the exclusion set is passed through untouched.
#[derive(Debug, Clone)]
pub struct RankedTables {
    /// Percentiles within each peer group.
    pub peer: DataFrame,
    /// Percentiles across the whole universe.
    pub universe: DataFrame,
    /// Peer-preferred blend, re-ranked to a valid percentile distribution.
    pub blended: DataFrame,
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// The columns of `frame` that `config` will rank.
pub fn rankable_columns(frame: &DataFrame, config: &RankConfig) -> Vec<String> {
    frame
        .get_columns()
        .iter()
        .filter(|column| {
            let name = column.name().as_str();
            is_numeric(column.dtype())
                && name != config.group_column
                && !config.exclude.contains(name)
        })
        .map(|column| column.name().to_string())
        .collect()
}

fn column_values(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    Ok(frame
        .column(name)?
        .cast(&DataType::Float64)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .collect())
}

/// Blended raw value for one cell.
///
/// Fallback ladder: a full-sized peer group wins outright; a thin group
/// contributes 0.35 next to 0.65 of the universe rank; a degenerate group
/// (or no group label at all) falls back to the universe rank alone.
fn blend_cell(
    peer: Option<f64>,
    universe: Option<f64>,
    group_size: usize,
    config: &RankConfig,
) -> Option<f64> {
    let universe = universe?;
    if group_size >= config.full_trust_group_size {
        peer
    } else if group_size >= config.min_peer_group_size {
        peer.map(|p| BLEND_UNIVERSE_WEIGHT * universe + BLEND_PEER_WEIGHT * p)
    } else {
        Some(universe)
    }
}

/// Rank every rankable column of a table three ways.
///
/// Minimize-set columns are negated first, so "higher percentile =
/// better" is an invariant of every table returned. Missing values never
/// join a ranking population and stay missing in all three outputs. The
/// blended column is itself re-percentile-ranked, keeping it a valid
/// percentile distribution (rank of a rank).
///
/// # Errors
///
/// Fails if the configured group column is absent from the input.
pub fn rank_tables(frame: &DataFrame, config: &RankConfig) -> Result<RankedTables> {
    let groups: Vec<Option<String>> = frame
        .column(&config.group_column)
        .map_err(|_| RankError::MissingGroupColumn(config.group_column.clone()))?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|label| label.map(String::from))
        .collect();
    let group_refs: Vec<Option<&str>> = groups.iter().map(|label| label.as_deref()).collect();

    let mut peer = frame.clone();
    let mut universe = frame.clone();
    let mut blended = frame.clone();

    for name in rankable_columns(frame, config) {
        let mut values = column_values(frame, &name)?;
        if config.minimize.contains(&name) {
            for value in values.iter_mut() {
                *value = value.map(|v| -v);
            }
        }

        let grouped = pct_rank_min_grouped(&values, &group_refs);
        let universe_ranks = pct_rank_min(&values);
        let blended_raw: Vec<Option<f64>> = (0..values.len())
            .map(|idx| {
                blend_cell(
                    grouped.ranks[idx],
                    universe_ranks[idx],
                    grouped.group_sizes[idx],
                    config,
                )
            })
            .collect();
        let blended_ranks = pct_rank_min(&blended_raw);

        peer.with_column(Series::new(name.as_str().into(), grouped.ranks))?;
        universe.with_column(Series::new(name.as_str().into(), universe_ranks))?;
        blended.with_column(Series::new(name.as_str().into(), blended_ranks))?;
    }

    Ok(RankedTables {
        peer,
        universe,
        blended,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario_frame() -> DataFrame {
        // Universe from the engine's reference scenario: two Tech assets,
        // one Energy singleton.
        df! {
            "ticker" => &["A", "B", "C"],
            "sector" => &["Tech", "Tech", "Energy"],
            "cagr" => &[Some(0.10), Some(0.20), Some(0.05)],
            "max_drawdown" => &[Some(0.30), Some(0.10), Some(0.50)],
        }
        .unwrap()
    }

    fn config() -> RankConfig {
        RankConfig::new("sector")
            .with_minimize(&["max_drawdown"])
            .with_exclude(&["ticker", "sector"])
    }

    fn ranks(frame: &DataFrame, column: &str) -> Vec<Option<f64>> {
        frame
            .column(column)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_peer_ranks_within_groups() {
        let tables = rank_tables(&scenario_frame(), &config()).unwrap();
        let cagr = ranks(&tables.peer, "cagr");

        // Two-member Tech group: lower value 0.5, higher 1.0; the Energy
        // singleton ranks 1.0 against itself.
        assert_eq!(cagr, vec![Some(0.5), Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_universe_ranks_ignore_groups() {
        let tables = rank_tables(&scenario_frame(), &config()).unwrap();
        let cagr = ranks(&tables.universe, "cagr");
        assert_eq!(
            cagr,
            vec![Some(2.0 / 3.0), Some(1.0), Some(1.0 / 3.0)]
        );
    }

    #[test]
    fn test_minimize_column_is_negated() {
        let tables = rank_tables(&scenario_frame(), &config()).unwrap();
        let drawdown = ranks(&tables.universe, "max_drawdown");

        // C has the worst (largest) drawdown, so the lowest percentile.
        assert_eq!(
            drawdown,
            vec![Some(2.0 / 3.0), Some(1.0), Some(1.0 / 3.0)]
        );
    }

    #[test]
    fn test_singleton_group_blends_to_universe() {
        let tables = rank_tables(&scenario_frame(), &config()).unwrap();
        let blended = ranks(&tables.blended, "cagr");
        let universe = ranks(&tables.universe, "cagr");

        // The Energy singleton falls back to its universe rank; here the
        // blend preserves the universe ordering so the whole column
        // matches.
        assert_relative_eq!(blended[2].unwrap(), universe[2].unwrap());
        assert_eq!(blended, universe);
    }

    #[test]
    fn test_thin_group_uses_blend_weights() {
        // Four assets: a two-member Tech group (thin, blended) and two
        // singletons. Check the blended raw ordering that results.
        let frame = df! {
            "ticker" => &["A", "B", "C", "D"],
            "sector" => &["Tech", "Tech", "Energy", "Utilities"],
            "cagr" => &[Some(0.10), Some(0.20), Some(0.05), Some(0.15)],
        }
        .unwrap();
        let config = RankConfig::new("sector").with_exclude(&["ticker"]);
        let tables = rank_tables(&frame, &config).unwrap();

        // Raw blend values: A = 0.65*0.5 + 0.35*0.5 = 0.5,
        // B = 0.65*1.0 + 0.35*1.0 = 1.0, C = 0.25, D = 0.75.
        // Re-ranked: C < A < D < B.
        let blended = ranks(&tables.blended, "cagr");
        assert_eq!(
            blended,
            vec![Some(0.5), Some(1.0), Some(0.25), Some(0.75)]
        );
    }

    #[test]
    fn test_all_singletons_blend_equals_universe() {
        let frame = df! {
            "ticker" => &["A", "B", "C"],
            "sector" => &["Tech", "Energy", "Utilities"],
            "cagr" => &[Some(0.10), Some(0.20), Some(0.05)],
        }
        .unwrap();
        let config = RankConfig::new("sector").with_exclude(&["ticker"]);
        let tables = rank_tables(&frame, &config).unwrap();

        assert_eq!(ranks(&tables.blended, "cagr"), ranks(&tables.universe, "cagr"));
    }

    #[test]
    fn test_missing_values_stay_missing() {
        let frame = df! {
            "ticker" => &["A", "B", "C"],
            "sector" => &["Tech", "Tech", "Tech"],
            "cagr" => &[Some(0.10), None, Some(0.05)],
        }
        .unwrap();
        let tables = rank_tables(&frame, &config()).unwrap();

        for table in [&tables.peer, &tables.universe, &tables.blended] {
            let cagr = ranks(table, "cagr");
            assert!(cagr[1].is_none());
            assert!(cagr[0].is_some());
        }
    }

    #[test]
    fn test_degenerate_all_missing_column() {
        let frame = df! {
            "ticker" => &["A", "B"],
            "sector" => &["Tech", "Tech"],
            "cagr" => &[None::<f64>, None::<f64>],
        }
        .unwrap();
        let tables = rank_tables(&frame, &config()).unwrap();

        assert_eq!(ranks(&tables.peer, "cagr"), vec![None, None]);
        assert_eq!(ranks(&tables.universe, "cagr"), vec![None, None]);
        assert_eq!(ranks(&tables.blended, "cagr"), vec![None, None]);
    }

    #[test]
    fn test_excluded_columns_pass_through() {
        let frame = df! {
            "ticker" => &["A", "B"],
            "sector" => &["Tech", "Tech"],
            "analyst_count" => &[Some(12.0), Some(3.0)],
            "cagr" => &[Some(0.10), Some(0.20)],
        }
        .unwrap();
        let config = RankConfig::new("sector").with_exclude(&["ticker", "analyst_count"]);
        let tables = rank_tables(&frame, &config).unwrap();

        let counts = ranks(&tables.peer, "analyst_count");
        assert_eq!(counts, vec![Some(12.0), Some(3.0)]);
    }

    #[test]
    fn test_missing_group_column_errors() {
        let frame = df! {
            "ticker" => &["A"],
            "cagr" => &[Some(0.1)],
        }
        .unwrap();
        let result = rank_tables(&frame, &RankConfig::new("sector"));
        assert!(matches!(result, Err(RankError::MissingGroupColumn(_))));
    }

    #[test]
    fn test_negation_convention_through_transform() {
        // Ranking a minimize column must equal ranking its negation as a
        // maximize column.
        let frame_min = df! {
            "ticker" => &["A", "B", "C"],
            "sector" => &["X", "X", "X"],
            "metric" => &[Some(3.0), Some(1.0), Some(2.0)],
        }
        .unwrap();
        let frame_neg = df! {
            "ticker" => &["A", "B", "C"],
            "sector" => &["X", "X", "X"],
            "metric" => &[Some(-3.0), Some(-1.0), Some(-2.0)],
        }
        .unwrap();

        let minimized = rank_tables(
            &frame_min,
            &RankConfig::new("sector")
                .with_minimize(&["metric"])
                .with_exclude(&["ticker"]),
        )
        .unwrap();
        let negated = rank_tables(
            &frame_neg,
            &RankConfig::new("sector").with_exclude(&["ticker"]),
        )
        .unwrap();

        assert_eq!(
            ranks(&minimized.universe, "metric"),
            ranks(&negated.universe, "metric")
        );
    }
}
