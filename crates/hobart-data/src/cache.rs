//! File-backed incremental cache for metric records.
//!
//! One serialized table per asset-class family, whole-table overwrite on
//! every flush. The flush is atomic from the caller's perspective: the
//! table is written to a temporary file and renamed over the previous
//! one, so no reader ever observes a half-written file.

use crate::error::{DataError, Result};
use crate::record::{AssetMetricRecord, records_to_frame};
use crate::schema;
use crate::table::{MetricsTable, align_to_schema, normalize_metric_dtypes};
use crate::types::AssetFamily;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do with persisted columns that a new batch no longer produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaPolicy {
    /// Keep stale columns; new rows carry nulls for them.
    #[default]
    RetainStale,

    /// Drop stale columns from the table.
    DropStale,
}

/// Outcome of a merge, including any schema reconciliation performed.
///
/// Schema drift is never resolved silently: the report names every column
/// that was retained or dropped so the caller can surface the decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Tickers newly added to the table.
    pub inserted: usize,
    /// Tickers that already existed and were overwritten.
    pub replaced: usize,
    /// Columns the batch introduced that the table did not have.
    pub added_columns: Vec<String>,
    /// Stale columns kept under [`SchemaPolicy::RetainStale`].
    pub stale_columns: Vec<String>,
    /// Stale columns removed under [`SchemaPolicy::DropStale`].
    pub dropped_columns: Vec<String>,
}

impl MergeReport {
    /// Whether the merge encountered any schema drift.
    pub fn has_drift(&self) -> bool {
        !self.added_columns.is_empty()
            || !self.stale_columns.is_empty()
            || !self.dropped_columns.is_empty()
    }
}

/// Persisted, ticker-keyed table of previously computed metric records.
#[derive(Debug)]
pub struct MetricsCache {
    path: PathBuf,
    policy: SchemaPolicy,
    table: MetricsTable,
}

impl MetricsCache {
    /// Load a cache from its backing file.
    ///
    /// An absent file is not an error: the cache starts empty and the file
    /// appears on the first flush.
    pub fn load(path: impl Into<PathBuf>, policy: SchemaPolicy) -> Result<Self> {
        let path = path.into();
        let table = if path.exists() {
            let frame = CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(500))
                .try_into_reader_with_file_path(Some(path.clone()))?
                .finish()?;
            MetricsTable::new(normalize_metric_dtypes(&frame)?)?
        } else {
            MetricsTable::empty()
        };
        Ok(Self {
            path,
            policy,
            table,
        })
    }

    /// Load the cache for an asset-class family from its fixed path under
    /// `dir`.
    pub fn for_family(dir: &Path, family: AssetFamily, policy: SchemaPolicy) -> Result<Self> {
        Self::load(Self::family_path(dir, family), policy)
    }

    /// The backing-file path for a family under `dir`.
    pub fn family_path(dir: &Path, family: AssetFamily) -> PathBuf {
        dir.join(format!("{}_metrics.csv", family.as_str()))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory table.
    pub const fn table(&self) -> &MetricsTable {
        &self.table
    }

    /// Whether a ticker has a cached record.
    pub fn contains(&self, ticker: &str) -> bool {
        self.table.contains(ticker)
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Merge a batch of records into the table and persist it.
    ///
    /// Records are keyed by ticker; a ticker appearing twice in the batch
    /// resolves last-write-wins, and a ticker already in the table is
    /// overwritten. Safe to call repeatedly with small batches: each call
    /// leaves a durable, fully reconciled table behind, so an interrupted
    /// run loses at most the records not yet flushed.
    ///
    /// # Errors
    ///
    /// Any storage failure is returned as-is; the caller must treat it as
    /// fatal since the on-disk state may no longer match later merges.
    pub fn merge_and_flush(&mut self, records: &[AssetMetricRecord]) -> Result<MergeReport> {
        if records.is_empty() {
            return Ok(MergeReport::default());
        }

        // Last write wins within the batch.
        let mut deduped: Vec<AssetMetricRecord> = Vec::with_capacity(records.len());
        let mut positions: HashMap<String, usize> = HashMap::new();
        for record in records {
            match positions.get(&record.ticker) {
                Some(&at) => deduped[at] = record.clone(),
                None => {
                    positions.insert(record.ticker.clone(), deduped.len());
                    deduped.push(record.clone());
                }
            }
        }
        let batch = records_to_frame(&deduped)?;
        let batch_tickers: HashSet<String> = positions.into_keys().collect();

        let existing = self.table.tickers()?;
        let mut report = MergeReport {
            replaced: batch_tickers.intersection(&existing).count(),
            ..MergeReport::default()
        };
        report.inserted = batch_tickers.len() - report.replaced;

        let merged = if self.table.is_empty() {
            batch
        } else {
            self.reconcile_and_stack(batch, &batch_tickers, &mut report)?
        };
        self.table = MetricsTable::new(merged)?;
        self.flush()?;
        Ok(report)
    }

    /// Reconcile schemas between the table and a batch, then stack them.
    fn reconcile_and_stack(
        &self,
        batch: DataFrame,
        batch_tickers: &HashSet<String>,
        report: &mut MergeReport,
    ) -> Result<DataFrame> {
        let cached = self.table.frame();
        let batch_names: HashSet<&str> = batch
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();

        // The batch schema is canonical; stale columns are appended or
        // dropped behind it depending on policy.
        let mut target: Vec<(PlSmallStr, DataType)> = batch
            .get_columns()
            .iter()
            .map(|column| (column.name().clone(), column.dtype().clone()))
            .collect();
        for column in cached.get_columns() {
            let name = column.name();
            if batch_names.contains(name.as_str()) {
                continue;
            }
            match self.policy {
                SchemaPolicy::RetainStale => {
                    report.stale_columns.push(name.to_string());
                    target.push((name.clone(), column.dtype().clone()));
                }
                SchemaPolicy::DropStale => report.dropped_columns.push(name.to_string()),
            }
        }
        let cached_names: HashSet<&str> = cached
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();
        report.added_columns = batch_names
            .iter()
            .filter(|name| !cached_names.contains(*name))
            .map(|name| name.to_string())
            .collect();
        report.added_columns.sort_unstable();

        // Overwritten tickers leave the table before the batch lands.
        let kept_mask: BooleanChunked = cached
            .column(schema::TICKER)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|ticker| Some(!ticker.is_some_and(|t| batch_tickers.contains(t))))
            .collect();
        let kept = align_to_schema(&cached.filter(&kept_mask)?, &target)?;
        let batch = align_to_schema(&batch, &target)?;

        Ok(kept
            .vstack(&batch)?
            .sort([schema::TICKER], SortMultipleOptions::default())?)
    }

    /// Write the table to disk, atomically from the caller's perspective.
    fn flush(&self) -> Result<()> {
        if self.table.frame().width() == 0 {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("csv.tmp");
        let mut frame = self.table.frame().clone();
        {
            let mut file = fs::File::create(&tmp)?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut frame)
                .map_err(|e| DataError::Cache(format!("flush failed: {e}")))?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
