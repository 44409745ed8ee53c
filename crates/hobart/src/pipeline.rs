//! End-to-end ranking pipeline.
//!
//! One run per asset-class family:
//! load cache → fetch missing → merge and persist → rank raw → score →
//! rank scores → assemble → split views. Fetches are strictly sequential;
//! the upstream collaborator sits behind a shared rate limit and is not
//! safe for concurrent use. Periodic flushes bound what an interrupted
//! run can lose to the records of one unflushed batch.

use crate::assemble::assemble_wide_table;
use crate::error::Result;
use hobart_data::cache::{MergeReport, MetricsCache, SchemaPolicy};
use hobart_data::record::records_to_frame;
use hobart_data::schema;
use hobart_data::source::MetricSource;
use hobart_data::types::{AssetClassKind, MarketContext};
use hobart_output::{AssetViews, split_views, write_summary};
use hobart_rank::{RankConfig, rank_tables};
use hobart_score::composite_scores;
use indicatif::ProgressBar;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Configuration of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding one cache file per asset-class family.
    pub cache_dir: PathBuf,
    /// Directory for the statistics side files; `None` disables them.
    pub tables_dir: Option<PathBuf>,
    /// How many newly fetched records to accumulate between flushes.
    pub flush_every: usize,
    /// Reconciliation policy for cached columns a new batch no longer
    /// produces.
    pub schema_policy: SchemaPolicy,
}

impl PipelineConfig {
    /// Create a configuration with default cadence and policy.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            tables_dir: None,
            flush_every: 10,
            schema_policy: SchemaPolicy::default(),
        }
    }

    /// Enable the statistics side file under `dir`.
    #[must_use]
    pub fn with_tables_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tables_dir = Some(dir.into());
        self
    }

    /// Set the flush cadence.
    #[must_use]
    pub const fn with_flush_every(mut self, flush_every: usize) -> Self {
        self.flush_every = flush_every;
        self
    }

    /// Set the schema reconciliation policy.
    #[must_use]
    pub const fn with_schema_policy(mut self, policy: SchemaPolicy) -> Self {
        self.schema_policy = policy;
        self
    }
}

/// Drives one asset-class family from ticker universe to finished views.
#[derive(Debug)]
pub struct RankingPipeline<S> {
    source: S,
    config: PipelineConfig,
}

fn warn(progress: Option<&ProgressBar>, message: &str) {
    match progress {
        Some(bar) => bar.suspend(|| eprintln!("Warning: {message}")),
        None => eprintln!("Warning: {message}"),
    }
}

fn report_drift(progress: Option<&ProgressBar>, report: &MergeReport) {
    if !report.stale_columns.is_empty() {
        warn(
            progress,
            &format!(
                "cache retains stale columns: {}",
                report.stale_columns.join(", ")
            ),
        );
    }
    if !report.dropped_columns.is_empty() {
        warn(
            progress,
            &format!(
                "cache dropped stale columns: {}",
                report.dropped_columns.join(", ")
            ),
        );
    }
}

impl<S: MetricSource> RankingPipeline<S> {
    /// Create a pipeline over a metric source.
    pub const fn new(source: S, config: PipelineConfig) -> Self {
        Self { source, config }
    }

    /// Build the three views for a ticker universe.
    ///
    /// See [`RankingPipeline::build_with_progress`].
    pub fn build(
        &self,
        tickers: &BTreeSet<String>,
        asset_class: AssetClassKind,
        context: &MarketContext,
    ) -> Result<AssetViews> {
        self.build_with_progress(tickers, asset_class, context, None)
    }

    /// Build the three views for a ticker universe, reporting fetch
    /// progress.
    ///
    /// Tickers already cached are never re-fetched. A ticker the
    /// collaborator cannot produce a record for is omitted from this
    /// run's output, not retried and not fatal; it stays absent from the
    /// cache, so a later run will try it again. Cache rows outside the
    /// requested universe survive in the store but never reach the output
    /// or the percentile populations.
    ///
    /// # Errors
    ///
    /// Storage failures and collaborator errors (as opposed to per-asset
    /// unavailability) abort the run.
    pub fn build_with_progress(
        &self,
        tickers: &BTreeSet<String>,
        asset_class: AssetClassKind,
        context: &MarketContext,
        progress: Option<&ProgressBar>,
    ) -> Result<AssetViews> {
        let family = asset_class.family();
        let universe: BTreeSet<String> = tickers
            .iter()
            .map(|ticker| ticker.trim().to_uppercase())
            .collect();

        let mut cache =
            MetricsCache::for_family(&self.config.cache_dir, family, self.config.schema_policy)?;
        let cached = cache.table().tickers()?;
        let missing: Vec<&String> = universe
            .iter()
            .filter(|ticker| !cached.contains(ticker.as_str()))
            .collect();

        if let Some(bar) = progress {
            bar.set_length(universe.len() as u64);
            bar.set_position((universe.len() - missing.len()) as u64);
        }

        let mut batch = Vec::new();
        for ticker in missing {
            match self.source.compute_metrics(ticker, asset_class, context)? {
                Some(record) => batch.push(record),
                None => warn(progress, &format!("no metrics for {ticker}, skipping")),
            }
            if let Some(bar) = progress {
                bar.inc(1);
            }
            if batch.len() >= self.config.flush_every {
                report_drift(progress, &cache.merge_and_flush(&batch)?);
                batch.clear();
            }
        }
        if !batch.is_empty() {
            report_drift(progress, &cache.merge_and_flush(&batch)?);
        }

        // An empty cache has no schema yet; rank against the canonical
        // empty table instead.
        let restricted = if cache.is_empty() {
            records_to_frame(&[])?
        } else {
            cache.table().restrict_to(&universe)?
        };

        let raw_config = RankConfig::new(family.group_column())
            .with_minimize(schema::MINIMIZE_COLUMNS)
            .with_exclude(schema::NO_RANK_COLUMNS);
        let raw_ranks = rank_tables(&restricted, &raw_config)?;

        // Equities are scored against their blended peer comparison;
        // fund-like families have thin category peer sets and use the
        // universe ranks directly.
        let score_input = if family.is_equity_like() {
            &raw_ranks.blended
        } else {
            &raw_ranks.universe
        };
        let scores = composite_scores(score_input, family)?;

        let score_config =
            RankConfig::new(family.group_column()).with_exclude(schema::NO_RANK_COLUMNS);
        let score_ranks = rank_tables(&scores, &score_config)?;

        let wide = assemble_wide_table(
            &restricted,
            &raw_ranks,
            &raw_config,
            &scores,
            &score_ranks,
            &score_config,
        )?;

        if let Some(tables_dir) = &self.config.tables_dir {
            write_summary(&wide, &tables_dir.join(format!("{}.csv", family.as_str())))?;
        }

        Ok(split_views(&wide)?)
    }
}
