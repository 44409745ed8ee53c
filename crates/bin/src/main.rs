//! Hobart CLI binary.
//!
//! Ranks a ticker universe against a prepared metrics file and writes the
//! light, table and full views plus the statistics side file.

mod integration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use hobart::{AssetClassKind, MarketContext, MetricsCache, PipelineConfig, RankingPipeline, SchemaPolicy};
use hobart_data::schema;
use hobart_data::source::CsvMetricSource;
use hobart_output::write_views;
use indicatif::{ProgressBar, ProgressStyle};
use integration::cache_manager::default_cache_dir;
use polars::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration as StdDuration;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: cross-sectional asset ranking and composite scoring", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank a ticker universe and write the result views
    Rank {
        /// Asset class of the universe (equity, etf, fund)
        #[arg(long)]
        class: String,

        /// File with one ticker per line
        #[arg(long)]
        tickers: PathBuf,

        /// Wide CSV of raw metrics serving as the metric source
        #[arg(long)]
        metrics: PathBuf,

        /// Output directory for views and statistics
        #[arg(long, default_value = "./output")]
        out: PathBuf,

        /// Cache directory (defaults to the platform cache dir)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Newly fetched records per cache flush
        #[arg(long, default_value = "10")]
        flush_every: usize,

        /// Drop cached columns the metric source no longer produces
        #[arg(long)]
        drop_stale: bool,

        /// Annualized risk-free rate
        #[arg(long, default_value = "0.04")]
        risk_free_rate: f64,

        /// Rows of the ranked table to print
        #[arg(long, default_value = "15")]
        top: usize,
    },

    /// Inspect or clear the metrics cache
    Cache {
        /// Asset class (equity, etf, fund)
        #[arg(long)]
        class: String,

        /// Remove the cache file for the class
        #[arg(long)]
        clear: bool,

        /// Cache directory (defaults to the platform cache dir)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            class,
            tickers,
            metrics,
            out,
            cache_dir,
            flush_every,
            drop_stale,
            risk_free_rate,
            top,
        } => {
            let asset_class = AssetClassKind::parse(&class)?;
            let policy = if drop_stale {
                SchemaPolicy::DropStale
            } else {
                SchemaPolicy::RetainStale
            };
            rank_universe(
                asset_class,
                &tickers,
                &metrics,
                &out,
                cache_dir.unwrap_or_else(default_cache_dir),
                flush_every,
                policy,
                risk_free_rate,
                top,
            )
        }
        Commands::Cache {
            class,
            clear,
            cache_dir,
        } => {
            let asset_class = AssetClassKind::parse(&class)?;
            cache_command(
                asset_class,
                clear,
                cache_dir.unwrap_or_else(default_cache_dir),
            )
        }
    }
}

fn read_tickers(path: &Path) -> Result<BTreeSet<String>, std::io::Error> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

#[allow(clippy::too_many_arguments)]
fn rank_universe(
    asset_class: AssetClassKind,
    tickers_path: &Path,
    metrics_path: &Path,
    out: &Path,
    cache_dir: PathBuf,
    flush_every: usize,
    policy: SchemaPolicy,
    risk_free_rate: f64,
    top: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let family = asset_class.family();

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", format!("HOBART RANKING: {}", family));
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let universe = read_tickers(tickers_path)?;
    println!("Universe: {} ticker(s) from {}", universe.len(), tickers_path.display());

    let source = CsvMetricSource::from_path(metrics_path, asset_class)?;
    println!(
        "Metric source: {} record(s) from {}",
        source.len(),
        metrics_path.display()
    );
    println!(
        "Cache: {}",
        MetricsCache::family_path(&cache_dir, family).display()
    );
    println!();

    let config = PipelineConfig::new(cache_dir)
        .with_tables_dir(out)
        .with_flush_every(flush_every)
        .with_schema_policy(policy);
    let pipeline = RankingPipeline::new(source, config);
    let context = MarketContext::new(risk_free_rate, Utc::now().date_naive());

    let pb = ProgressBar::new(universe.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(StdDuration::from_millis(100));
    pb.set_message("Building metric records...");

    let views = match pipeline.build_with_progress(&universe, asset_class, &context, Some(&pb)) {
        Ok(views) => {
            pb.finish_with_message(format!("Ranked {} asset(s)", views.full.height()));
            views
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(format!("Pipeline failed: {}", e).into());
        }
    };

    write_views(&views, out, family)?;
    println!("\nViews written to {}", out.display());
    println!(
        "Statistics written to {}",
        out.join(format!("{}.csv", family.as_str())).display()
    );

    if views.table.column(schema::SCORE_OVERALL).is_ok() && views.table.height() > 0 {
        let ranked = views.table.sort(
            [schema::SCORE_OVERALL],
            SortMultipleOptions::default().with_order_descending(true),
        )?;
        println!("\nTop {} by overall score:", top.min(ranked.height()));
        println!("{}", ranked.head(Some(top)));
    }

    Ok(())
}

fn cache_command(
    asset_class: AssetClassKind,
    clear: bool,
    cache_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let family = asset_class.family();
    let path = MetricsCache::family_path(&cache_dir, family);

    if clear {
        if path.exists() {
            fs::remove_file(&path)?;
            println!("Removed {}", path.display());
        } else {
            println!("No cache at {}", path.display());
        }
        return Ok(());
    }

    println!("Cache location: {}", path.display());
    let cache = MetricsCache::load(&path, SchemaPolicy::default())?;
    if cache.is_empty() {
        println!("Cached data: none");
    } else {
        println!(
            "Cached data: {} record(s), {} column(s)",
            cache.len(),
            cache.table().frame().width()
        );
    }
    Ok(())
}
