//! Column schema for the metrics table.
//!
//! Column names are the single source of truth shared by the record
//! conversion, the rank transform configuration and the presentation
//! views. Three sets matter downstream: the minimize set (lower raw value
//! is better, negated before ranking), the no-rank set (identifiers,
//! labels and raw counts that never receive a percentile) and the view
//! projections.

/// Ticker symbol, the sole primary key of every table.
pub const TICKER: &str = "ticker";
/// Long display name.
pub const NAME: &str = "name";
/// Asset class label (`equity`, `etf`, `mutual_fund`).
pub const ASSET_CLASS: &str = "asset_class";
/// Listing region derived from the exchange suffix.
pub const REGION: &str = "region";
/// Exchange code.
pub const EXCHANGE: &str = "exchange";
/// Trading currency.
pub const CURRENCY: &str = "currency";
/// Sector label (equities and ETFs).
pub const SECTOR: &str = "sector";
/// Size×valuation category label (ETFs and mutual funds), e.g. "Mid Blend".
pub const CATEGORY: &str = "category";

/// Market capitalization in listing currency.
pub const MARKET_CAP: &str = "market_cap";
/// Market capitalization converted to USD.
pub const MARKET_CAP_USD: &str = "market_cap_usd";
/// Fund net assets converted to USD.
pub const NET_ASSETS_USD: &str = "net_assets_usd";
/// Average daily volume.
pub const VOLUME: &str = "volume";
/// Trailing dividend yield.
pub const DIVIDEND_YIELD: &str = "dividend_yield";
/// Fund expense ratio.
pub const EXPENSE_RATIO: &str = "expense_ratio";
/// Fund holdings turnover.
pub const TURNOVER: &str = "turnover";
/// Concentration of fund holdings.
pub const HOLDING_DIVERSITY: &str = "holding_diversity";
/// Concentration of fund sector weights.
pub const SECTOR_DIVERSITY: &str = "sector_diversity";

/// Five-year compound annual growth rate.
pub const CAGR: &str = "cagr";
/// Trailing twelve-month return.
pub const YOY_RETURN: &str = "yoy_return";
/// Three-year annualized return.
pub const THREE_YEAR_CAGR: &str = "three_year_cagr";
/// Annualized six-month return.
pub const SIX_MONTH_RETURN: &str = "six_month_return";
/// Dividend growth rate.
pub const DIVIDEND_GROWTH: &str = "dividend_growth";

/// Market beta.
pub const BETA: &str = "beta";
/// Correlation-adjusted beta (intermediate only).
pub const BETA_ADJ: &str = "beta_adj";
/// Standard deviation of returns.
pub const STD_DEV: &str = "std_dev";
/// Maximum drawdown.
pub const MAX_DRAWDOWN: &str = "max_drawdown";
/// Average drawdown.
pub const AVG_DRAWDOWN: &str = "avg_drawdown";
/// 1% value at risk.
pub const VAR_1: &str = "var_1";
/// 5% value at risk.
pub const VAR_5: &str = "var_5";
/// 10% value at risk.
pub const VAR_10: &str = "var_10";
/// Correlation with the market benchmark.
pub const MARKET_CORR: &str = "market_corr";

/// CAPM alpha.
pub const ALPHA: &str = "alpha";
/// Alpha under the adjusted beta (intermediate only).
pub const ALPHA_ADJ: &str = "alpha_adj";
/// Sharpe ratio.
pub const SHARPE: &str = "sharpe";
/// Sortino ratio.
pub const SORTINO: &str = "sortino";
/// Sharpe/Sortino blend (intermediate only).
pub const SHARPE_SORTINO_ADJ: &str = "sharpe_sortino_adj";
/// Modigliani risk-adjusted performance.
pub const M_SQUARED: &str = "m_squared";
/// M² under the Sharpe/Sortino blend (intermediate only).
pub const M_SQUARED_ADJ: &str = "m_squared_adj";
/// Omega ratio.
pub const OMEGA: &str = "omega";
/// Calmar ratio.
pub const CALMAR: &str = "calmar";
/// Martin (Ulcer performance) ratio.
pub const MARTIN: &str = "martin";

/// Price-to-earnings ratio.
pub const PE_RATIO: &str = "pe_ratio";
/// Price-to-book ratio.
pub const PB_RATIO: &str = "pb_ratio";
/// Price-to-sales ratio.
pub const PS_RATIO: &str = "ps_ratio";
/// Price/earnings-to-growth ratio.
pub const PEG_RATIO: &str = "peg_ratio";
/// Weighted average cost of capital.
pub const WACC: &str = "wacc";

/// Net profit margin.
pub const PROFIT_MARGIN: &str = "profit_margin";
/// Consensus growth estimate.
pub const GROWTH_ESTIMATE: &str = "growth_estimate";
/// Return on equity.
pub const ROE: &str = "roe";
/// Return on assets.
pub const ROA: &str = "roa";
/// Earnings growth.
pub const EARNINGS_GROWTH: &str = "earnings_growth";
/// Revenue growth.
pub const REVENUE_GROWTH: &str = "revenue_growth";

/// Debt-to-equity ratio.
pub const DEBT_TO_EQUITY: &str = "debt_to_equity";
/// Debt-to-assets ratio.
pub const DEBT_TO_ASSETS: &str = "debt_to_assets";
/// Debt-to-EBITDA ratio.
pub const DEBT_TO_EBITDA: &str = "debt_to_ebitda";
/// Current ratio.
pub const CURRENT_RATIO: &str = "current_ratio";
/// Altman Z-score.
pub const ALTMAN_Z: &str = "altman_z";

/// Number of covering analysts.
pub const ANALYST_COUNT: &str = "analyst_count";
/// Mean analyst recommendation.
pub const ANALYST_RATING: &str = "analyst_rating";
/// Lowest analyst price target.
pub const TARGET_LOW: &str = "target_low";
/// Highest analyst price target.
pub const TARGET_HIGH: &str = "target_high";
/// Mean analyst price target.
pub const TARGET_MEAN: &str = "target_mean";

/// Text-typed columns; everything else in the table is `Float64`.
pub const TEXT_COLUMNS: &[&str] = &[
    TICKER, NAME, ASSET_CLASS, REGION, EXCHANGE, CURRENCY, SECTOR, CATEGORY,
];

/// Columns where a lower raw value is preferable.
///
/// These are negated before ranking so that "higher percentile = better"
/// holds for every ranked column.
pub const MINIMIZE_COLUMNS: &[&str] = &[
    EXPENSE_RATIO,
    MAX_DRAWDOWN,
    AVG_DRAWDOWN,
    STD_DEV,
    VAR_1,
    VAR_5,
    VAR_10,
    PE_RATIO,
    PB_RATIO,
    PS_RATIO,
    PEG_RATIO,
    WACC,
    DEBT_TO_EQUITY,
    DEBT_TO_ASSETS,
    DEBT_TO_EBITDA,
];

/// Columns excluded from ranking entirely.
///
/// Identifiers and labels, plus numeric columns that are counts or raw
/// price levels rather than comparable metrics. `market_cap` is excluded
/// because its USD-normalized sibling is the comparable one.
pub const NO_RANK_COLUMNS: &[&str] = &[
    TICKER,
    NAME,
    ASSET_CLASS,
    REGION,
    EXCHANGE,
    CURRENCY,
    SECTOR,
    CATEGORY,
    MARKET_CAP,
    ANALYST_COUNT,
    ANALYST_RATING,
    TARGET_LOW,
    TARGET_HIGH,
    TARGET_MEAN,
];

/// Growth composite score.
pub const SCORE_GROWTH: &str = "G";
/// Risk composite score.
pub const SCORE_RISK: &str = "R";
/// Performance composite score.
pub const SCORE_PERFORMANCE: &str = "PE";
/// Valuation composite score (equities only).
pub const SCORE_VALUATION: &str = "V";
/// Profitability composite score (equities only).
pub const SCORE_PROFITABILITY: &str = "PR";
/// Leverage composite score (equities only).
pub const SCORE_LEVERAGE: &str = "L";
/// Overall composite score.
pub const SCORE_OVERALL: &str = "OVERALL";

/// Suffix of peer-group-ranked columns in the assembled table.
pub const PEER_RANK_SUFFIX: &str = "_SECT";
/// Suffix of universe-ranked columns in the assembled table.
pub const UNIVERSE_RANK_SUFFIX: &str = "_OVER";

/// Marker of intermediate-only adjusted metrics.
///
/// Columns whose name contains this marker are dropped from the assembled
/// table before the views are split.
pub const ADJUSTMENT_MARKER: &str = "_adj";

/// Columns of the minimal display view.
pub const LIGHT_COLUMNS: &[&str] = &[
    TICKER,
    NAME,
    REGION,
    MARKET_CAP_USD,
    NET_ASSETS_USD,
    SECTOR,
    CATEGORY,
    ASSET_CLASS,
];

/// Columns of the detailed tabular view.
pub const TABLE_COLUMNS: &[&str] = &[
    TICKER,
    NAME,
    REGION,
    MARKET_CAP_USD,
    NET_ASSETS_USD,
    SECTOR,
    VOLUME,
    CATEGORY,
    TURNOVER,
    EXPENSE_RATIO,
    DIVIDEND_YIELD,
    HOLDING_DIVERSITY,
    SECTOR_DIVERSITY,
    SCORE_OVERALL,
    SCORE_GROWTH,
    SCORE_RISK,
    SCORE_PERFORMANCE,
    SCORE_VALUATION,
    SCORE_PROFITABILITY,
    SCORE_LEVERAGE,
    CAGR,
    THREE_YEAR_CAGR,
    SIX_MONTH_RETURN,
    YOY_RETURN,
    DIVIDEND_GROWTH,
    ALPHA,
    SORTINO,
    SHARPE,
    M_SQUARED,
    OMEGA,
    CALMAR,
    MARTIN,
    MAX_DRAWDOWN,
    AVG_DRAWDOWN,
    STD_DEV,
    BETA,
    VAR_1,
    VAR_5,
    VAR_10,
    PE_RATIO,
    PB_RATIO,
    PS_RATIO,
    PEG_RATIO,
    PROFIT_MARGIN,
    ROE,
    ROA,
    EARNINGS_GROWTH,
    REVENUE_GROWTH,
    WACC,
    DEBT_TO_EQUITY,
    DEBT_TO_ASSETS,
    DEBT_TO_EBITDA,
    CURRENT_RATIO,
    ALTMAN_Z,
];
