//! Category weight tables.
//!
//! The weights are part of the scoring contract, not tunable per asset.
//! Every input column is already percentile-ranked and maximize-oriented
//! when these are applied.

use hobart_data::schema;

/// Growth inputs. If `dividend_growth` is missing for an asset, its
/// weight is redirected to `three_year_cagr`.
pub const GROWTH_WEIGHTS: &[(&str, f64)] = &[
    (schema::CAGR, 0.2),
    (schema::YOY_RETURN, 0.2),
    (schema::SIX_MONTH_RETURN, 0.2),
    (schema::THREE_YEAR_CAGR, 0.2),
    (schema::DIVIDEND_GROWTH, 0.2),
];

/// Weight redirected from `dividend_growth` to `three_year_cagr` when the
/// former is missing.
pub const DIVIDEND_GROWTH_WEIGHT: f64 = 0.2;

/// Risk inputs.
pub const RISK_WEIGHTS: &[(&str, f64)] = &[
    (schema::MAX_DRAWDOWN, 0.3),
    (schema::AVG_DRAWDOWN, 0.2),
    (schema::STD_DEV, 0.1),
    (schema::VAR_10, 0.2),
    (schema::VAR_5, 0.1),
    (schema::VAR_1, 0.1),
];

/// Performance inputs: an unweighted sum of the adjusted performance
/// measures, with Calmar and Martin at half weight.
pub const PERFORMANCE_WEIGHTS: &[(&str, f64)] = &[
    (schema::ALPHA_ADJ, 1.0),
    (schema::SHARPE_SORTINO_ADJ, 1.0),
    (schema::M_SQUARED_ADJ, 1.0),
    (schema::OMEGA, 1.0),
    (schema::CALMAR, 0.5),
    (schema::MARTIN, 0.5),
];

/// Valuation inputs (equities only).
pub const VALUATION_WEIGHTS: &[(&str, f64)] = &[
    (schema::PE_RATIO, 0.2),
    (schema::PB_RATIO, 0.1),
    (schema::PS_RATIO, 0.1),
    (schema::PEG_RATIO, 0.3),
    (schema::GROWTH_ESTIMATE, 0.2),
    (schema::WACC, 0.1),
];

/// Profitability inputs (equities only).
pub const PROFITABILITY_WEIGHTS: &[(&str, f64)] = &[
    (schema::PROFIT_MARGIN, 0.3),
    (schema::GROWTH_ESTIMATE, 0.3),
    (schema::ROE, 0.2),
    (schema::ROA, 0.2),
];

/// Leverage inputs (equities only).
pub const LEVERAGE_WEIGHTS: &[(&str, f64)] = &[
    (schema::DEBT_TO_EQUITY, 0.2),
    (schema::DEBT_TO_ASSETS, 0.2),
    (schema::DEBT_TO_EBITDA, 0.1),
    (schema::CURRENT_RATIO, 0.3),
    (schema::ALTMAN_Z, 0.2),
];

/// Overall weights for fund-like assets.
pub const OVERALL_FUND_WEIGHTS: &[(&str, f64)] = &[
    (schema::SCORE_GROWTH, 0.3),
    (schema::SCORE_RISK, 0.3),
    (schema::SCORE_PERFORMANCE, 0.4),
];

/// Overall weights for equity-like assets.
pub const OVERALL_EQUITY_WEIGHTS: &[(&str, f64)] = &[
    (schema::SCORE_GROWTH, 0.2),
    (schema::SCORE_RISK, 0.1),
    (schema::SCORE_PERFORMANCE, 0.1),
    (schema::SCORE_VALUATION, 0.2),
    (schema::SCORE_PROFITABILITY, 0.3),
    (schema::SCORE_LEVERAGE, 0.1),
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn total(weights: &[(&str, f64)]) -> f64 {
        weights.iter().map(|(_, w)| w).sum()
    }

    #[test]
    fn test_category_weights_sum_to_one() {
        assert_relative_eq!(total(GROWTH_WEIGHTS), 1.0);
        assert_relative_eq!(total(RISK_WEIGHTS), 1.0);
        assert_relative_eq!(total(VALUATION_WEIGHTS), 1.0);
        assert_relative_eq!(total(PROFITABILITY_WEIGHTS), 1.0);
        assert_relative_eq!(total(LEVERAGE_WEIGHTS), 1.0);
    }

    #[test]
    fn test_overall_weights_sum_to_one() {
        assert_relative_eq!(total(OVERALL_FUND_WEIGHTS), 1.0);
        assert_relative_eq!(total(OVERALL_EQUITY_WEIGHTS), 1.0);
    }

    #[test]
    fn test_redirect_weight_matches_table() {
        let declared = GROWTH_WEIGHTS
            .iter()
            .find(|(name, _)| *name == hobart_data::schema::DIVIDEND_GROWTH)
            .map(|(_, w)| *w)
            .unwrap();
        assert_relative_eq!(declared, DIVIDEND_GROWTH_WEIGHT);
    }
}
