//! Composite score computation.

use crate::error::{Result, ScoreError};
use crate::weights;
use hobart_data::schema;
use hobart_data::types::AssetFamily;
use hobart_rank::pct_rank_min;
use polars::prelude::*;

fn percentile_column(ranked: &DataFrame, name: &str, height: usize) -> Vec<Option<f64>> {
    ranked
        .column(name)
        .ok()
        .and_then(|column| {
            column
                .cast(&DataType::Float64)
                .ok()?
                .as_materialized_series()
                .f64()
                .ok()
                .map(|ca| ca.into_iter().collect::<Vec<Option<f64>>>())
        })
        .unwrap_or_else(|| vec![None; height])
}

/// Zero-fill a percentile column.
///
/// An asset lacking data for a sub-metric is scored as if it ranked at the
/// bottom for it. This worst-case-on-missing-data policy is part of the
/// contract, deliberate and documented, not an accidental default.
fn filled_column(ranked: &DataFrame, name: &str, height: usize) -> Vec<f64> {
    percentile_column(ranked, name, height)
        .into_iter()
        .map(|value| value.filter(|v| v.is_finite()).unwrap_or(0.0))
        .collect()
}

fn weighted_sum(ranked: &DataFrame, table: &[(&str, f64)], height: usize) -> Vec<f64> {
    let mut out = vec![0.0; height];
    for (name, weight) in table {
        for (acc, value) in out.iter_mut().zip(filled_column(ranked, name, height)) {
            *acc += weight * value;
        }
    }
    out
}

fn rank_raw_score(raw: Vec<f64>) -> Vec<Option<f64>> {
    let wrapped: Vec<Option<f64>> = raw.into_iter().map(Some).collect();
    pct_rank_min(&wrapped)
}

fn growth_score(ranked: &DataFrame, height: usize) -> Vec<Option<f64>> {
    let dividend_growth = percentile_column(ranked, schema::DIVIDEND_GROWTH, height);
    let three_year = filled_column(ranked, schema::THREE_YEAR_CAGR, height);
    let mut raw = weighted_sum(ranked, weights::GROWTH_WEIGHTS, height);
    for idx in 0..height {
        // Redirect the dividend-growth weight where it is missing; the
        // mask is taken before the zero-fill.
        if !dividend_growth[idx].is_some_and(f64::is_finite) {
            raw[idx] += weights::DIVIDEND_GROWTH_WEIGHT * three_year[idx];
        }
    }
    rank_raw_score(raw)
}

fn score_over_scores(
    scores: &[(&str, &Vec<Option<f64>>)],
    table: &[(&str, f64)],
    height: usize,
) -> Vec<Option<f64>> {
    let mut raw = vec![0.0; height];
    for (name, weight) in table {
        let column = scores
            .iter()
            .find(|(score_name, _)| score_name == name)
            .map(|(_, values)| *values);
        if let Some(values) = column {
            for idx in 0..height {
                raw[idx] += weight * values[idx].unwrap_or(0.0);
            }
        }
    }
    rank_raw_score(raw)
}

/// Compute category sub-scores and the Overall score.
///
/// The input must be a ranked table (percentiles in `(0, 1]`, missing
/// where the raw value was absent); use the blended variant for equities
/// and the universe variant for fund-like assets. Every sub-score is
/// itself percentile-ranked across the universe, so the output columns
/// are valid percentile distributions, not raw weighted sums.
///
/// The output carries the ticker key, the sub-scores, `OVERALL` and the
/// grouping label columns passed through for traceability.
pub fn composite_scores(ranked: &DataFrame, family: AssetFamily) -> Result<DataFrame> {
    let height = ranked.height();
    let ticker = ranked
        .column(schema::TICKER)
        .map_err(|_| ScoreError::MissingColumn(schema::TICKER.to_string()))?
        .clone();

    let growth = growth_score(ranked, height);
    let risk = rank_raw_score(weighted_sum(ranked, weights::RISK_WEIGHTS, height));
    let performance = rank_raw_score(weighted_sum(ranked, weights::PERFORMANCE_WEIGHTS, height));

    let mut columns = vec![
        ticker,
        Series::new(schema::SCORE_GROWTH.into(), growth.clone()).into_column(),
        Series::new(schema::SCORE_RISK.into(), risk.clone()).into_column(),
        Series::new(schema::SCORE_PERFORMANCE.into(), performance.clone()).into_column(),
    ];

    let overall = if family.is_equity_like() {
        let valuation = rank_raw_score(weighted_sum(ranked, weights::VALUATION_WEIGHTS, height));
        let profitability =
            rank_raw_score(weighted_sum(ranked, weights::PROFITABILITY_WEIGHTS, height));
        let leverage = rank_raw_score(weighted_sum(ranked, weights::LEVERAGE_WEIGHTS, height));

        let overall = score_over_scores(
            &[
                (schema::SCORE_GROWTH, &growth),
                (schema::SCORE_RISK, &risk),
                (schema::SCORE_PERFORMANCE, &performance),
                (schema::SCORE_VALUATION, &valuation),
                (schema::SCORE_PROFITABILITY, &profitability),
                (schema::SCORE_LEVERAGE, &leverage),
            ],
            weights::OVERALL_EQUITY_WEIGHTS,
            height,
        );
        columns.push(Series::new(schema::SCORE_VALUATION.into(), valuation).into_column());
        columns.push(Series::new(schema::SCORE_PROFITABILITY.into(), profitability).into_column());
        columns.push(Series::new(schema::SCORE_LEVERAGE.into(), leverage).into_column());
        overall
    } else {
        score_over_scores(
            &[
                (schema::SCORE_GROWTH, &growth),
                (schema::SCORE_RISK, &risk),
                (schema::SCORE_PERFORMANCE, &performance),
            ],
            weights::OVERALL_FUND_WEIGHTS,
            height,
        )
    };
    columns.push(Series::new(schema::SCORE_OVERALL.into(), overall).into_column());

    // Grouping labels ride along so the score table can itself be ranked.
    for label in [schema::SECTOR, schema::CATEGORY] {
        if let Ok(column) = ranked.column(label) {
            columns.push(column.clone());
        }
    }

    Ok(DataFrame::new(columns)?)
}
