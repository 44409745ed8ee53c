//! Ticker-keyed metrics table.

use crate::error::{DataError, Result};
use crate::schema;
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// Whether a dtype participates in ranking and statistics.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
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

/// Cast every non-text column of a metrics frame to `Float64`.
///
/// CSV schema inference can type integer-valued metrics as `Int64` and
/// all-null columns as `String`; every consumer downstream assumes
/// `Float64` metrics.
pub fn normalize_metric_dtypes(frame: &DataFrame) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(frame.width());
    for column in frame.get_columns() {
        let name = column.name().as_str();
        if schema::TEXT_COLUMNS.contains(&name) {
            columns.push(column.cast(&DataType::String)?);
        } else {
            columns.push(column.cast(&DataType::Float64)?);
        }
    }
    Ok(DataFrame::new(columns)?)
}

/// Align a frame to a target schema, filling absent columns with nulls.
///
/// Used by the cache merge so that two frames with drifted schemas can be
/// stacked row-wise.
pub(crate) fn align_to_schema(
    frame: &DataFrame,
    target: &[(PlSmallStr, DataType)],
) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(target.len());
    for (name, dtype) in target {
        match frame.column(name.as_str()) {
            Ok(column) => columns.push(column.cast(dtype)?),
            Err(_) => {
                columns.push(Series::full_null(name.clone(), frame.height(), dtype).into_column());
            }
        }
    }
    Ok(DataFrame::new(columns)?)
}

/// A metrics table: one row per ticker, ticker as the sole primary key.
///
/// The table may retain rows for tickers outside the currently requested
/// universe (stale cache entries survive across runs); a pipeline run
/// projects the requested universe out with [`MetricsTable::restrict_to`]
/// without touching the underlying table.
#[derive(Debug, Clone, Default)]
pub struct MetricsTable {
    frame: DataFrame,
}

impl MetricsTable {
    /// Create an empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an existing metrics frame.
    ///
    /// A non-empty frame must carry the `ticker` column.
    pub fn new(frame: DataFrame) -> Result<Self> {
        if frame.width() > 0 && frame.column(schema::TICKER).is_err() {
            return Err(DataError::MissingColumn(schema::TICKER.to_string()));
        }
        Ok(Self { frame })
    }

    /// Returns the underlying frame.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consumes self and returns the underlying frame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0 || self.frame.width() == 0
    }

    /// All tickers currently in the table.
    pub fn tickers(&self) -> Result<HashSet<String>> {
        if self.is_empty() {
            return Ok(HashSet::new());
        }
        Ok(self
            .frame
            .column(schema::TICKER)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .flatten()
            .map(String::from)
            .collect())
    }

    /// Whether a ticker is present in the table.
    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers()
            .map(|tickers| tickers.contains(ticker))
            .unwrap_or(false)
    }

    /// Project the rows belonging to a requested universe, sorted by
    /// ticker.
    ///
    /// Rows outside the universe are left untouched in the table; they are
    /// only absent from the projection.
    pub fn restrict_to(&self, universe: &BTreeSet<String>) -> Result<DataFrame> {
        if self.is_empty() {
            return Ok(self.frame.clone());
        }
        let mask: BooleanChunked = self
            .frame
            .column(schema::TICKER)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|ticker| Some(ticker.is_some_and(|t| universe.contains(t))))
            .collect();
        let restricted = self.frame.filter(&mask)?;
        Ok(restricted.sort([schema::TICKER], SortMultipleOptions::default())?)
    }
}
