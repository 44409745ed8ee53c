//! The metric-record collaborator boundary.

use crate::error::Result;
use crate::record::{AssetMetricRecord, records_from_frame};
use crate::table::normalize_metric_dtypes;
use crate::types::{AssetClassKind, MarketContext};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// Source of per-asset metric records.
///
/// Implementations own all metric computation (prices, financials,
/// derived ratios). The contract at this boundary: per-asset data
/// unavailability is `Ok(None)`, never an error; an `Err` is reserved for
/// failures the whole run cannot recover from, and aborts the pipeline.
pub trait MetricSource {
    /// Compute the metric record for one ticker.
    fn compute_metrics(
        &self,
        ticker: &str,
        asset_class: AssetClassKind,
        context: &MarketContext,
    ) -> Result<Option<AssetMetricRecord>>;
}

/// Metric source backed by a prepared wide CSV of raw metrics.
///
/// One row per ticker, columns per [`crate::schema`]. Useful for driving
/// the pipeline from an exported metrics file without any upstream
/// provider.
#[derive(Debug)]
pub struct CsvMetricSource {
    records: HashMap<String, AssetMetricRecord>,
}

impl CsvMetricSource {
    /// Read a metrics CSV into a source.
    ///
    /// Rows without an `asset_class` column are assigned `default_class`.
    pub fn from_path(path: &Path, default_class: AssetClassKind) -> Result<Self> {
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(500))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;
        let frame = normalize_metric_dtypes(&frame)?;
        let records = records_from_frame(&frame, default_class)?
            .into_iter()
            .map(|record| (record.ticker.clone(), record))
            .collect();
        Ok(Self { records })
    }

    /// Number of records available.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the source holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl MetricSource for CsvMetricSource {
    fn compute_metrics(
        &self,
        ticker: &str,
        _asset_class: AssetClassKind,
        _context: &MarketContext,
    ) -> Result<Option<AssetMetricRecord>> {
        Ok(self.records.get(&ticker.trim().to_uppercase()).cloned())
    }
}
