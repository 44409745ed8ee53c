//! Per-asset metric record and columnar conversion.

use crate::error::{DataError, Result};
use crate::schema;
use crate::types::AssetClassKind;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One row of the metrics table: every raw metric computed for a single
/// asset.
///
/// Produced by the external metric-record collaborator, persisted once
/// into the cache and immutable afterwards. Every metric field is
/// `Option<f64>`; absent means "not available", never zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetMetricRecord {
    /// Ticker symbol, uppercased on construction.
    pub ticker: String,
    /// Asset class of the instrument.
    pub asset_class: AssetClassKind,
    /// Long display name.
    pub name: Option<String>,
    /// Listing region.
    pub region: Option<String>,
    /// Exchange code.
    pub exchange: Option<String>,
    /// Trading currency.
    pub currency: Option<String>,
    /// Sector label (equities and ETFs).
    pub sector: Option<String>,
    /// Size×valuation category label (ETFs and mutual funds).
    pub category: Option<String>,

    /// Market capitalization in listing currency.
    pub market_cap: Option<f64>,
    /// Market capitalization in USD.
    pub market_cap_usd: Option<f64>,
    /// Fund net assets in USD.
    pub net_assets_usd: Option<f64>,
    /// Average daily volume.
    pub volume: Option<f64>,
    /// Trailing dividend yield.
    pub dividend_yield: Option<f64>,
    /// Fund expense ratio.
    pub expense_ratio: Option<f64>,
    /// Fund holdings turnover.
    pub turnover: Option<f64>,
    /// Concentration of fund holdings.
    pub holding_diversity: Option<f64>,
    /// Concentration of fund sector weights.
    pub sector_diversity: Option<f64>,

    /// Five-year compound annual growth rate.
    pub cagr: Option<f64>,
    /// Trailing twelve-month return.
    pub yoy_return: Option<f64>,
    /// Three-year annualized return.
    pub three_year_cagr: Option<f64>,
    /// Annualized six-month return.
    pub six_month_return: Option<f64>,
    /// Dividend growth rate.
    pub dividend_growth: Option<f64>,

    /// Market beta.
    pub beta: Option<f64>,
    /// Correlation-adjusted beta (intermediate only).
    pub beta_adj: Option<f64>,
    /// Standard deviation of returns.
    pub std_dev: Option<f64>,
    /// Maximum drawdown.
    pub max_drawdown: Option<f64>,
    /// Average drawdown.
    pub avg_drawdown: Option<f64>,
    /// 1% value at risk.
    pub var_1: Option<f64>,
    /// 5% value at risk.
    pub var_5: Option<f64>,
    /// 10% value at risk.
    pub var_10: Option<f64>,
    /// Correlation with the market benchmark.
    pub market_corr: Option<f64>,

    /// CAPM alpha.
    pub alpha: Option<f64>,
    /// Alpha under the adjusted beta (intermediate only).
    pub alpha_adj: Option<f64>,
    /// Sharpe ratio.
    pub sharpe: Option<f64>,
    /// Sortino ratio.
    pub sortino: Option<f64>,
    /// Sharpe/Sortino blend (intermediate only).
    pub sharpe_sortino_adj: Option<f64>,
    /// Modigliani risk-adjusted performance.
    pub m_squared: Option<f64>,
    /// M² under the Sharpe/Sortino blend (intermediate only).
    pub m_squared_adj: Option<f64>,
    /// Omega ratio.
    pub omega: Option<f64>,
    /// Calmar ratio.
    pub calmar: Option<f64>,
    /// Martin (Ulcer performance) ratio.
    pub martin: Option<f64>,

    /// Price-to-earnings ratio.
    pub pe_ratio: Option<f64>,
    /// Price-to-book ratio.
    pub pb_ratio: Option<f64>,
    /// Price-to-sales ratio.
    pub ps_ratio: Option<f64>,
    /// Price/earnings-to-growth ratio.
    pub peg_ratio: Option<f64>,
    /// Weighted average cost of capital.
    pub wacc: Option<f64>,

    /// Net profit margin.
    pub profit_margin: Option<f64>,
    /// Consensus growth estimate.
    pub growth_estimate: Option<f64>,
    /// Return on equity.
    pub roe: Option<f64>,
    /// Return on assets.
    pub roa: Option<f64>,
    /// Earnings growth.
    pub earnings_growth: Option<f64>,
    /// Revenue growth.
    pub revenue_growth: Option<f64>,

    /// Debt-to-equity ratio.
    pub debt_to_equity: Option<f64>,
    /// Debt-to-assets ratio.
    pub debt_to_assets: Option<f64>,
    /// Debt-to-EBITDA ratio.
    pub debt_to_ebitda: Option<f64>,
    /// Current ratio.
    pub current_ratio: Option<f64>,
    /// Altman Z-score.
    pub altman_z: Option<f64>,

    /// Number of covering analysts.
    pub analyst_count: Option<f64>,
    /// Mean analyst recommendation.
    pub analyst_rating: Option<f64>,
    /// Lowest analyst price target.
    pub target_low: Option<f64>,
    /// Highest analyst price target.
    pub target_high: Option<f64>,
    /// Mean analyst price target.
    pub target_mean: Option<f64>,
}

impl AssetMetricRecord {
    /// Create an empty record for a ticker.
    ///
    /// The ticker is case-normalized to uppercase here; every table keyed
    /// by ticker relies on that.
    pub fn new(ticker: &str, asset_class: AssetClassKind) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            asset_class,
            ..Self::default()
        }
    }
}

fn text_column(
    name: &str,
    records: &[AssetMetricRecord],
    get: fn(&AssetMetricRecord) -> Option<&str>,
) -> Column {
    let values: Vec<Option<&str>> = records.iter().map(get).collect();
    Series::new(name.into(), values).into_column()
}

fn metric_column(
    name: &str,
    records: &[AssetMetricRecord],
    get: fn(&AssetMetricRecord) -> Option<f64>,
) -> Column {
    let values: Vec<Option<f64>> = records.iter().map(get).collect();
    Series::new(name.into(), values).into_column()
}

/// Convert records into a metrics `DataFrame`, one row per record.
///
/// Column order is the canonical schema order; label columns are typed
/// `String`, every metric column `Float64`.
pub fn records_to_frame(records: &[AssetMetricRecord]) -> Result<DataFrame> {
    let columns = vec![
        text_column(schema::TICKER, records, |r| Some(r.ticker.as_str())),
        text_column(schema::NAME, records, |r| r.name.as_deref()),
        text_column(schema::ASSET_CLASS, records, |r| {
            Some(r.asset_class.as_str())
        }),
        text_column(schema::REGION, records, |r| r.region.as_deref()),
        text_column(schema::EXCHANGE, records, |r| r.exchange.as_deref()),
        text_column(schema::CURRENCY, records, |r| r.currency.as_deref()),
        text_column(schema::SECTOR, records, |r| r.sector.as_deref()),
        text_column(schema::CATEGORY, records, |r| r.category.as_deref()),
        metric_column(schema::MARKET_CAP, records, |r| r.market_cap),
        metric_column(schema::MARKET_CAP_USD, records, |r| r.market_cap_usd),
        metric_column(schema::NET_ASSETS_USD, records, |r| r.net_assets_usd),
        metric_column(schema::VOLUME, records, |r| r.volume),
        metric_column(schema::DIVIDEND_YIELD, records, |r| r.dividend_yield),
        metric_column(schema::EXPENSE_RATIO, records, |r| r.expense_ratio),
        metric_column(schema::TURNOVER, records, |r| r.turnover),
        metric_column(schema::HOLDING_DIVERSITY, records, |r| r.holding_diversity),
        metric_column(schema::SECTOR_DIVERSITY, records, |r| r.sector_diversity),
        metric_column(schema::CAGR, records, |r| r.cagr),
        metric_column(schema::YOY_RETURN, records, |r| r.yoy_return),
        metric_column(schema::THREE_YEAR_CAGR, records, |r| r.three_year_cagr),
        metric_column(schema::SIX_MONTH_RETURN, records, |r| r.six_month_return),
        metric_column(schema::DIVIDEND_GROWTH, records, |r| r.dividend_growth),
        metric_column(schema::BETA, records, |r| r.beta),
        metric_column(schema::BETA_ADJ, records, |r| r.beta_adj),
        metric_column(schema::STD_DEV, records, |r| r.std_dev),
        metric_column(schema::MAX_DRAWDOWN, records, |r| r.max_drawdown),
        metric_column(schema::AVG_DRAWDOWN, records, |r| r.avg_drawdown),
        metric_column(schema::VAR_1, records, |r| r.var_1),
        metric_column(schema::VAR_5, records, |r| r.var_5),
        metric_column(schema::VAR_10, records, |r| r.var_10),
        metric_column(schema::MARKET_CORR, records, |r| r.market_corr),
        metric_column(schema::ALPHA, records, |r| r.alpha),
        metric_column(schema::ALPHA_ADJ, records, |r| r.alpha_adj),
        metric_column(schema::SHARPE, records, |r| r.sharpe),
        metric_column(schema::SORTINO, records, |r| r.sortino),
        metric_column(schema::SHARPE_SORTINO_ADJ, records, |r| {
            r.sharpe_sortino_adj
        }),
        metric_column(schema::M_SQUARED, records, |r| r.m_squared),
        metric_column(schema::M_SQUARED_ADJ, records, |r| r.m_squared_adj),
        metric_column(schema::OMEGA, records, |r| r.omega),
        metric_column(schema::CALMAR, records, |r| r.calmar),
        metric_column(schema::MARTIN, records, |r| r.martin),
        metric_column(schema::PE_RATIO, records, |r| r.pe_ratio),
        metric_column(schema::PB_RATIO, records, |r| r.pb_ratio),
        metric_column(schema::PS_RATIO, records, |r| r.ps_ratio),
        metric_column(schema::PEG_RATIO, records, |r| r.peg_ratio),
        metric_column(schema::WACC, records, |r| r.wacc),
        metric_column(schema::PROFIT_MARGIN, records, |r| r.profit_margin),
        metric_column(schema::GROWTH_ESTIMATE, records, |r| r.growth_estimate),
        metric_column(schema::ROE, records, |r| r.roe),
        metric_column(schema::ROA, records, |r| r.roa),
        metric_column(schema::EARNINGS_GROWTH, records, |r| r.earnings_growth),
        metric_column(schema::REVENUE_GROWTH, records, |r| r.revenue_growth),
        metric_column(schema::DEBT_TO_EQUITY, records, |r| r.debt_to_equity),
        metric_column(schema::DEBT_TO_ASSETS, records, |r| r.debt_to_assets),
        metric_column(schema::DEBT_TO_EBITDA, records, |r| r.debt_to_ebitda),
        metric_column(schema::CURRENT_RATIO, records, |r| r.current_ratio),
        metric_column(schema::ALTMAN_Z, records, |r| r.altman_z),
        metric_column(schema::ANALYST_COUNT, records, |r| r.analyst_count),
        metric_column(schema::ANALYST_RATING, records, |r| r.analyst_rating),
        metric_column(schema::TARGET_LOW, records, |r| r.target_low),
        metric_column(schema::TARGET_HIGH, records, |r| r.target_high),
        metric_column(schema::TARGET_MEAN, records, |r| r.target_mean),
    ];
    Ok(DataFrame::new(columns)?)
}

fn opt_text(frame: &DataFrame, name: &str, idx: usize) -> Option<String> {
    frame
        .column(name)
        .ok()?
        .as_materialized_series()
        .str()
        .ok()?
        .get(idx)
        .map(String::from)
}

fn opt_metric(frame: &DataFrame, name: &str, idx: usize) -> Option<f64> {
    frame
        .column(name)
        .ok()?
        .as_materialized_series()
        .f64()
        .ok()?
        .get(idx)
}

/// Convert a metrics frame back into records.
///
/// The frame must carry a `ticker` column; metric columns must already be
/// `Float64` (see [`crate::table::normalize_metric_dtypes`]). A missing
/// `asset_class` column falls back to `default_class`.
pub fn records_from_frame(
    frame: &DataFrame,
    default_class: AssetClassKind,
) -> Result<Vec<AssetMetricRecord>> {
    let tickers = frame
        .column(schema::TICKER)
        .map_err(|_| DataError::MissingColumn(schema::TICKER.to_string()))?
        .as_materialized_series()
        .str()?
        .clone();

    let mut records = Vec::with_capacity(frame.height());
    for idx in 0..frame.height() {
        let ticker = tickers
            .get(idx)
            .ok_or_else(|| DataError::Parse(format!("null ticker at row {idx}")))?;
        let asset_class = match opt_text(frame, schema::ASSET_CLASS, idx) {
            Some(label) => AssetClassKind::parse(&label)?,
            None => default_class,
        };
        records.push(AssetMetricRecord {
            name: opt_text(frame, schema::NAME, idx),
            region: opt_text(frame, schema::REGION, idx),
            exchange: opt_text(frame, schema::EXCHANGE, idx),
            currency: opt_text(frame, schema::CURRENCY, idx),
            sector: opt_text(frame, schema::SECTOR, idx),
            category: opt_text(frame, schema::CATEGORY, idx),
            market_cap: opt_metric(frame, schema::MARKET_CAP, idx),
            market_cap_usd: opt_metric(frame, schema::MARKET_CAP_USD, idx),
            net_assets_usd: opt_metric(frame, schema::NET_ASSETS_USD, idx),
            volume: opt_metric(frame, schema::VOLUME, idx),
            dividend_yield: opt_metric(frame, schema::DIVIDEND_YIELD, idx),
            expense_ratio: opt_metric(frame, schema::EXPENSE_RATIO, idx),
            turnover: opt_metric(frame, schema::TURNOVER, idx),
            holding_diversity: opt_metric(frame, schema::HOLDING_DIVERSITY, idx),
            sector_diversity: opt_metric(frame, schema::SECTOR_DIVERSITY, idx),
            cagr: opt_metric(frame, schema::CAGR, idx),
            yoy_return: opt_metric(frame, schema::YOY_RETURN, idx),
            three_year_cagr: opt_metric(frame, schema::THREE_YEAR_CAGR, idx),
            six_month_return: opt_metric(frame, schema::SIX_MONTH_RETURN, idx),
            dividend_growth: opt_metric(frame, schema::DIVIDEND_GROWTH, idx),
            beta: opt_metric(frame, schema::BETA, idx),
            beta_adj: opt_metric(frame, schema::BETA_ADJ, idx),
            std_dev: opt_metric(frame, schema::STD_DEV, idx),
            max_drawdown: opt_metric(frame, schema::MAX_DRAWDOWN, idx),
            avg_drawdown: opt_metric(frame, schema::AVG_DRAWDOWN, idx),
            var_1: opt_metric(frame, schema::VAR_1, idx),
            var_5: opt_metric(frame, schema::VAR_5, idx),
            var_10: opt_metric(frame, schema::VAR_10, idx),
            market_corr: opt_metric(frame, schema::MARKET_CORR, idx),
            alpha: opt_metric(frame, schema::ALPHA, idx),
            alpha_adj: opt_metric(frame, schema::ALPHA_ADJ, idx),
            sharpe: opt_metric(frame, schema::SHARPE, idx),
            sortino: opt_metric(frame, schema::SORTINO, idx),
            sharpe_sortino_adj: opt_metric(frame, schema::SHARPE_SORTINO_ADJ, idx),
            m_squared: opt_metric(frame, schema::M_SQUARED, idx),
            m_squared_adj: opt_metric(frame, schema::M_SQUARED_ADJ, idx),
            omega: opt_metric(frame, schema::OMEGA, idx),
            calmar: opt_metric(frame, schema::CALMAR, idx),
            martin: opt_metric(frame, schema::MARTIN, idx),
            pe_ratio: opt_metric(frame, schema::PE_RATIO, idx),
            pb_ratio: opt_metric(frame, schema::PB_RATIO, idx),
            ps_ratio: opt_metric(frame, schema::PS_RATIO, idx),
            peg_ratio: opt_metric(frame, schema::PEG_RATIO, idx),
            wacc: opt_metric(frame, schema::WACC, idx),
            profit_margin: opt_metric(frame, schema::PROFIT_MARGIN, idx),
            growth_estimate: opt_metric(frame, schema::GROWTH_ESTIMATE, idx),
            roe: opt_metric(frame, schema::ROE, idx),
            roa: opt_metric(frame, schema::ROA, idx),
            earnings_growth: opt_metric(frame, schema::EARNINGS_GROWTH, idx),
            revenue_growth: opt_metric(frame, schema::REVENUE_GROWTH, idx),
            debt_to_equity: opt_metric(frame, schema::DEBT_TO_EQUITY, idx),
            debt_to_assets: opt_metric(frame, schema::DEBT_TO_ASSETS, idx),
            debt_to_ebitda: opt_metric(frame, schema::DEBT_TO_EBITDA, idx),
            current_ratio: opt_metric(frame, schema::CURRENT_RATIO, idx),
            altman_z: opt_metric(frame, schema::ALTMAN_Z, idx),
            analyst_count: opt_metric(frame, schema::ANALYST_COUNT, idx),
            analyst_rating: opt_metric(frame, schema::ANALYST_RATING, idx),
            target_low: opt_metric(frame, schema::TARGET_LOW, idx),
            target_high: opt_metric(frame, schema::TARGET_HIGH, idx),
            target_mean: opt_metric(frame, schema::TARGET_MEAN, idx),
            ..AssetMetricRecord::new(ticker, asset_class)
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ticker: &str, cagr: Option<f64>) -> AssetMetricRecord {
        AssetMetricRecord {
            sector: Some("Technology".to_string()),
            cagr,
            max_drawdown: Some(0.3),
            ..AssetMetricRecord::new(ticker, AssetClassKind::Equity)
        }
    }

    #[test]
    fn test_new_uppercases_ticker() {
        let record = AssetMetricRecord::new(" aapl ", AssetClassKind::Equity);
        assert_eq!(record.ticker, "AAPL");
    }

    #[test]
    fn test_records_to_frame_shape() {
        let frame = records_to_frame(&[sample("AAPL", Some(0.1)), sample("MSFT", None)]).unwrap();
        assert_eq!(frame.height(), 2);
        assert!(frame.column(schema::TICKER).is_ok());
        assert!(frame.column(schema::CAGR).is_ok());
    }

    #[test]
    fn test_missing_stays_null() {
        let frame = records_to_frame(&[sample("AAPL", None)]).unwrap();
        let cagr = frame
            .column(schema::CAGR)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .get(0);
        assert!(cagr.is_none());
    }

    #[test]
    fn test_frame_round_trip() {
        let original = vec![sample("AAPL", Some(0.1)), sample("MSFT", Some(0.2))];
        let frame = records_to_frame(&original).unwrap();
        let back = records_from_frame(&frame, AssetClassKind::Equity).unwrap();

        assert_eq!(back.len(), 2);
        assert_eq!(back[0].ticker, "AAPL");
        assert_eq!(back[0].cagr, Some(0.1));
        assert_eq!(back[0].sector.as_deref(), Some("Technology"));
        assert_eq!(back[1].asset_class, AssetClassKind::Equity);
        assert!(back[1].pe_ratio.is_none());
    }
}
