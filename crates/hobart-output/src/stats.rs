//! Descriptive-statistics side file.
//!
//! After assembly the pipeline writes count, mean, standard deviation and
//! quartiles for every numeric lowercase-named column to a CSV keyed by
//! asset-class family. Uppercase names (composite scores and the
//! `_SECT`/`_OVER` rank variants) are excluded by construction.

use crate::error::Result;
use hobart_data::table::is_numeric_dtype;
use polars::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Descriptive statistics of one column.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnSummary {
    /// Column name.
    pub column: String,
    /// Number of finite values.
    pub count: usize,
    /// Mean of finite values.
    pub mean: Option<f64>,
    /// Sample standard deviation.
    pub std: Option<f64>,
    /// Minimum.
    pub min: Option<f64>,
    /// Lower quartile.
    pub q25: Option<f64>,
    /// Median.
    pub median: Option<f64>,
    /// Upper quartile.
    pub q75: Option<f64>,
    /// Maximum.
    pub max: Option<f64>,
}

/// Whether a column name qualifies for the statistics file: at least one
/// lowercase letter and no uppercase ones.
fn is_lowercase_name(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_lowercase()) && !name.chars().any(|c| c.is_ascii_uppercase())
}

/// Linearly interpolated quantile of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let below = position.floor() as usize;
    let above = position.ceil() as usize;
    if below == above {
        sorted[below]
    } else {
        sorted[below] + (position - below as f64) * (sorted[above] - sorted[below])
    }
}

fn summarize_column(name: &str, values: &[f64]) -> ColumnSummary {
    if values.is_empty() {
        return ColumnSummary {
            column: name.to_string(),
            count: 0,
            mean: None,
            std: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };
    }
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    ColumnSummary {
        column: name.to_string(),
        count,
        mean: Some(mean),
        std,
        min: Some(sorted[0]),
        q25: Some(quantile(&sorted, 0.25)),
        median: Some(quantile(&sorted, 0.5)),
        q75: Some(quantile(&sorted, 0.75)),
        max: Some(sorted[count - 1]),
    }
}

/// Summarize every numeric lowercase-named column of a table.
pub fn summarize(frame: &DataFrame) -> Result<Vec<ColumnSummary>> {
    let mut summaries = Vec::new();
    for column in frame.get_columns() {
        let name = column.name().as_str();
        if !is_lowercase_name(name) || !is_numeric_dtype(column.dtype()) {
            continue;
        }
        let values: Vec<f64> = column
            .cast(&DataType::Float64)?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect();
        summaries.push(summarize_column(name, &values));
    }
    Ok(summaries)
}

/// Write the statistics side file for a table.
pub fn write_summary(frame: &DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for summary in summarize(frame)? {
        writer.serialize(&summary)?;
    }
    writer.flush()?;
    Ok(())
}
