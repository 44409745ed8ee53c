//! Assembly of the final wide table.

use crate::error::Result;
use hobart_data::schema;
use hobart_rank::{RankConfig, RankedTables, rankable_columns};
use polars::prelude::*;

fn suffixed(frame: &DataFrame, name: &str, suffix: &str) -> Result<Series> {
    Ok(frame
        .column(name)?
        .as_materialized_series()
        .clone()
        .with_name(format!("{name}{suffix}").into()))
}

/// Concatenate raw metrics, rank variants and composite scores into one
/// wide table.
///
/// Every ranked raw metric and every composite score contributes a
/// `_SECT` (peer) and `_OVER` (universe) column next to its unsuffixed
/// value. Columns carrying the adjustment marker are intermediate-only
/// and are dropped at the end, suffixed variants included.
pub fn assemble_wide_table(
    raw: &DataFrame,
    raw_ranks: &RankedTables,
    raw_config: &RankConfig,
    scores: &DataFrame,
    score_ranks: &RankedTables,
    score_config: &RankConfig,
) -> Result<DataFrame> {
    let mut wide = raw.clone();

    for name in rankable_columns(raw, raw_config) {
        wide.with_column(suffixed(&raw_ranks.peer, &name, schema::PEER_RANK_SUFFIX)?)?;
        wide.with_column(suffixed(
            &raw_ranks.universe,
            &name,
            schema::UNIVERSE_RANK_SUFFIX,
        )?)?;
    }

    // Composite scores; the ticker and grouping labels they carry are
    // already present from the raw table.
    for column in scores.get_columns() {
        if wide.column(column.name().as_str()).is_err() {
            wide.with_column(column.as_materialized_series().clone())?;
        }
    }

    for name in rankable_columns(scores, score_config) {
        wide.with_column(suffixed(&score_ranks.peer, &name, schema::PEER_RANK_SUFFIX)?)?;
        wide.with_column(suffixed(
            &score_ranks.universe,
            &name,
            schema::UNIVERSE_RANK_SUFFIX,
        )?)?;
    }

    let adjustment_columns: Vec<String> = wide
        .get_column_names()
        .iter()
        .filter(|name| name.contains(schema::ADJUSTMENT_MARKER))
        .map(|name| name.to_string())
        .collect();
    Ok(wide.drop_many(adjustment_columns))
}
