//! Asset classification and market context types.

use crate::error::DataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset class of a single instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClassKind {
    /// Common stock
    #[default]
    Equity,

    /// Exchange-traded fund
    Etf,

    /// Mutual fund
    MutualFund,
}

impl AssetClassKind {
    /// Returns all asset classes.
    pub const fn all() -> [Self; 3] {
        [Self::Equity, Self::Etf, Self::MutualFund]
    }

    /// Returns the canonical label used in tables and cache files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equity => "equity",
            Self::Etf => "etf",
            Self::MutualFund => "mutual_fund",
        }
    }

    /// Parse an asset class from its label.
    ///
    /// Accepts the canonical labels plus the common short forms used on
    /// the command line (`stock`, `fund`).
    pub fn parse(label: &str) -> Result<Self, DataError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "equity" | "stock" => Ok(Self::Equity),
            "etf" => Ok(Self::Etf),
            "mutual_fund" | "mutual-fund" | "fund" => Ok(Self::MutualFund),
            other => Err(DataError::InvalidAssetClass(other.to_string())),
        }
    }

    /// Returns the family this asset class is ranked and scored with.
    pub const fn family(&self) -> AssetFamily {
        match self {
            Self::Equity => AssetFamily::Equities,
            Self::Etf => AssetFamily::Etfs,
            Self::MutualFund => AssetFamily::Funds,
        }
    }
}

impl fmt::Display for AssetClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Asset-class family.
///
/// A family shares one cache table, one statistics side file and one
/// scoring formula. Equities are scored with the full six-category
/// composite against sector peers; ETFs and mutual funds are fund-like:
/// three categories, compared against their size×valuation `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetFamily {
    /// Common stocks
    Equities,

    /// Exchange-traded funds
    Etfs,

    /// Mutual funds
    Funds,
}

impl AssetFamily {
    /// Returns the file-name stem for this family.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equities => "equities",
            Self::Etfs => "etfs",
            Self::Funds => "funds",
        }
    }

    /// Returns the peer-grouping column for this family.
    pub const fn group_column(&self) -> &'static str {
        match self {
            Self::Equities => crate::schema::SECTOR,
            Self::Etfs | Self::Funds => crate::schema::CATEGORY,
        }
    }

    /// Whether this family is scored with the equity composite formula.
    pub const fn is_equity_like(&self) -> bool {
        matches!(self, Self::Equities)
    }
}

impl fmt::Display for AssetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Market-wide context handed to the metric-record collaborator.
///
/// The collaborator owns all per-asset metric computation; this carries
/// only the shared inputs every asset is measured against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketContext {
    /// Annualized risk-free rate.
    pub risk_free_rate: f64,

    /// Date the metrics are computed as of.
    pub as_of: NaiveDate,
}

impl MarketContext {
    /// Create a new market context.
    pub const fn new(risk_free_rate: f64, as_of: NaiveDate) -> Self {
        Self {
            risk_free_rate,
            as_of,
        }
    }
}
