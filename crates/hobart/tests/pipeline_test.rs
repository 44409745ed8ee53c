//! End-to-end pipeline tests against a stubbed metric source.

use chrono::NaiveDate;
use hobart::{
    AssetClassKind, AssetMetricRecord, MarketContext, MetricSource, MetricsCache, PipelineConfig,
    RankingPipeline, SchemaPolicy,
};
use hobart_data::schema;
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::PathBuf;

struct StubSource {
    records: HashMap<String, AssetMetricRecord>,
    fail_all: bool,
}

impl StubSource {
    fn new(records: Vec<AssetMetricRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.ticker.clone(), record))
                .collect(),
            fail_all: false,
        }
    }

    /// A source that errors on any fetch; runs that are fully served by
    /// the cache never notice it.
    fn failing() -> Self {
        Self {
            records: HashMap::new(),
            fail_all: true,
        }
    }
}

impl MetricSource for StubSource {
    fn compute_metrics(
        &self,
        ticker: &str,
        _asset_class: AssetClassKind,
        _context: &MarketContext,
    ) -> hobart_data::Result<Option<AssetMetricRecord>> {
        if self.fail_all {
            return Err(hobart_data::DataError::Source {
                ticker: ticker.to_string(),
                reason: "stub configured to fail".to_string(),
            });
        }
        Ok(self.records.get(ticker).cloned())
    }
}

fn equity(ticker: &str, sector: &str, cagr: f64, max_drawdown: f64) -> AssetMetricRecord {
    AssetMetricRecord {
        name: Some(format!("{ticker} Corp")),
        sector: Some(sector.to_string()),
        market_cap_usd: Some(1.0e9),
        cagr: Some(cagr),
        max_drawdown: Some(max_drawdown),
        alpha_adj: Some(0.01),
        ..AssetMetricRecord::new(ticker, AssetClassKind::Equity)
    }
}

fn fund(ticker: &str, category: &str, cagr: f64) -> AssetMetricRecord {
    AssetMetricRecord {
        name: Some(format!("{ticker} Fund")),
        category: Some(category.to_string()),
        net_assets_usd: Some(5.0e8),
        cagr: Some(cagr),
        ..AssetMetricRecord::new(ticker, AssetClassKind::MutualFund)
    }
}

fn scenario_records() -> Vec<AssetMetricRecord> {
    vec![
        equity("AAA", "Tech", 0.10, 0.30),
        equity("BBB", "Tech", 0.20, 0.10),
        equity("CCC", "Energy", 0.05, 0.50),
    ]
}

fn universe(tickers: &[&str]) -> BTreeSet<String> {
    tickers.iter().map(|t| t.to_string()).collect()
}

fn context() -> MarketContext {
    MarketContext::new(0.04, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
}

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hobart_pipeline_{}_{}", tag, std::process::id()));
    fs::remove_dir_all(&dir).ok();
    dir
}

fn column_values(frame: &DataFrame, name: &str) -> Vec<Option<f64>> {
    frame
        .column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn tickers_of(frame: &DataFrame) -> Vec<String> {
    frame
        .column(schema::TICKER)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .map(String::from)
        .collect()
}

#[test]
fn test_end_to_end_equity_ranking() {
    let dir = temp_dir("e2e");
    let config = PipelineConfig::new(dir.join("cache")).with_tables_dir(dir.join("tables"));
    let pipeline = RankingPipeline::new(StubSource::new(scenario_records()), config);

    let views = pipeline
        .build(
            &universe(&["AAA", "BBB", "CCC"]),
            AssetClassKind::Equity,
            &context(),
        )
        .unwrap();

    assert_eq!(tickers_of(&views.full), vec!["AAA", "BBB", "CCC"]);

    // Peer ranks: two-member Tech group ranks 0.5/1.0, the Energy
    // singleton ranks 1.0 against itself.
    assert_eq!(
        column_values(&views.full, "cagr_SECT"),
        vec![Some(0.5), Some(1.0), Some(1.0)]
    );
    // Universe ranks ignore sectors.
    assert_eq!(
        column_values(&views.full, "cagr_OVER"),
        vec![Some(2.0 / 3.0), Some(1.0), Some(1.0 / 3.0)]
    );
    // Minimize convention: the deepest drawdown ranks lowest.
    assert_eq!(
        column_values(&views.full, "max_drawdown_OVER"),
        vec![Some(2.0 / 3.0), Some(1.0), Some(1.0 / 3.0)]
    );

    // Composite scores exist and are valid percentiles.
    for value in column_values(&views.full, schema::SCORE_OVERALL)
        .into_iter()
        .flatten()
    {
        assert!(value > 0.0 && value <= 1.0);
    }

    // Adjusted intermediates never reach the output.
    assert!(views.full.column(schema::ALPHA_ADJ).is_err());
    assert!(views.full.column("alpha_adj_SECT").is_err());

    // The views project the same rows.
    assert_eq!(views.light.height(), 3);
    assert!(views.light.column(schema::SCORE_OVERALL).is_err());
    assert!(views.table.column(schema::SCORE_OVERALL).is_ok());

    // Statistics side file for the family.
    let stats = fs::read_to_string(dir.join("tables/equities.csv")).unwrap();
    assert!(stats.contains("cagr"));
    assert!(!stats.contains("OVERALL"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_cache_prevents_refetch_and_retains_dropped_tickers() {
    let dir = temp_dir("cache_retention");
    let cache_dir = dir.join("cache");

    let first = RankingPipeline::new(
        StubSource::new(scenario_records()),
        PipelineConfig::new(&cache_dir),
    );
    first
        .build(
            &universe(&["AAA", "BBB", "CCC"]),
            AssetClassKind::Equity,
            &context(),
        )
        .unwrap();

    // Second run shrinks the universe. The failing source proves nothing
    // is re-fetched; the output drops CCC but the cache keeps it.
    let second = RankingPipeline::new(StubSource::failing(), PipelineConfig::new(&cache_dir));
    let views = second
        .build(&universe(&["AAA", "BBB"]), AssetClassKind::Equity, &context())
        .unwrap();
    assert_eq!(tickers_of(&views.full), vec!["AAA", "BBB"]);
    assert_eq!(tickers_of(&views.light), vec!["AAA", "BBB"]);
    assert_eq!(tickers_of(&views.table), vec!["AAA", "BBB"]);

    let cache = MetricsCache::for_family(
        &cache_dir,
        hobart::AssetFamily::Equities,
        SchemaPolicy::default(),
    )
    .unwrap();
    assert!(cache.contains("CCC"));

    // Re-including CCC works entirely from the cache.
    let third = RankingPipeline::new(StubSource::failing(), PipelineConfig::new(&cache_dir));
    let views = third
        .build(
            &universe(&["AAA", "BBB", "CCC"]),
            AssetClassKind::Equity,
            &context(),
        )
        .unwrap();
    assert_eq!(tickers_of(&views.full), vec!["AAA", "BBB", "CCC"]);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_unavailable_asset_is_skipped_not_fatal() {
    let dir = temp_dir("skip");
    let source = StubSource::new(scenario_records());
    let pipeline = RankingPipeline::new(source, PipelineConfig::new(dir.join("cache")));

    let views = pipeline
        .build(
            &universe(&["AAA", "BBB", "CCC", "NOPE"]),
            AssetClassKind::Equity,
            &context(),
        )
        .unwrap();

    // The unavailable ticker is omitted from the run, everything else
    // proceeds.
    assert_eq!(tickers_of(&views.full), vec!["AAA", "BBB", "CCC"]);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_source_error_aborts_run() {
    let dir = temp_dir("fatal");
    let pipeline = RankingPipeline::new(StubSource::failing(), PipelineConfig::new(dir.join("cache")));

    let result = pipeline.build(&universe(&["AAA"]), AssetClassKind::Equity, &context());
    assert!(result.is_err());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_case_normalization_of_requested_tickers() {
    let dir = temp_dir("case");
    let source = StubSource::new(scenario_records());
    let pipeline = RankingPipeline::new(source, PipelineConfig::new(dir.join("cache")));

    let views = pipeline
        .build(
            &universe(&["aaa", " bbb ", "CCC"]),
            AssetClassKind::Equity,
            &context(),
        )
        .unwrap();
    assert_eq!(tickers_of(&views.full), vec!["AAA", "BBB", "CCC"]);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_fund_family_uses_fund_scoring() {
    let dir = temp_dir("funds");
    let records = vec![
        fund("FAAA", "Mid Blend", 0.08),
        fund("FBBB", "Mid Blend", 0.12),
        fund("FCCC", "Large Growth", 0.15),
    ];
    let pipeline = RankingPipeline::new(
        StubSource::new(records),
        PipelineConfig::new(dir.join("cache")),
    );

    let views = pipeline
        .build(
            &universe(&["FAAA", "FBBB", "FCCC"]),
            AssetClassKind::MutualFund,
            &context(),
        )
        .unwrap();

    // Fund-like scoring: no equity-only categories.
    assert!(views.full.column(schema::SCORE_OVERALL).is_ok());
    assert!(views.full.column(schema::SCORE_VALUATION).is_err());

    // Peer grouping is by category: the two Mid Blend funds rank against
    // each other, the Large Growth singleton ranks alone.
    assert_eq!(
        column_values(&views.full, "cagr_SECT"),
        vec![Some(0.5), Some(1.0), Some(1.0)]
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_flush_cadence_persists_partial_progress() {
    let dir = temp_dir("flush");
    let cache_dir = dir.join("cache");
    let source = StubSource::new(scenario_records());
    let pipeline =
        RankingPipeline::new(source, PipelineConfig::new(&cache_dir).with_flush_every(1));

    pipeline
        .build(
            &universe(&["AAA", "BBB", "CCC"]),
            AssetClassKind::Equity,
            &context(),
        )
        .unwrap();

    let cache = MetricsCache::for_family(
        &cache_dir,
        hobart::AssetFamily::Equities,
        SchemaPolicy::default(),
    )
    .unwrap();
    assert_eq!(cache.len(), 3);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_empty_universe_produces_empty_views() {
    let dir = temp_dir("empty");
    let pipeline = RankingPipeline::new(
        StubSource::new(Vec::new()),
        PipelineConfig::new(dir.join("cache")),
    );

    let views = pipeline
        .build(&BTreeSet::new(), AssetClassKind::Equity, &context())
        .unwrap();
    assert_eq!(views.full.height(), 0);
    assert_eq!(views.light.height(), 0);

    fs::remove_dir_all(&dir).ok();
}
