//! Market data bundle types
//!
//! Numeric bundle fields are plain `f64`s defaulted to zero at the provider
//! boundary, so downstream rule logic never branches on presence.

use serde::{Deserialize, Serialize};

/// Basic stock snapshot used as chat context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockInfo {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub volume: u64,
    pub market_cap: f64,
    pub sector: String,
    pub industry: String,
    pub currency: String,
}

/// Fundamental analysis metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FundamentalMetrics {
    pub pe_ratio: f64,
    pub forward_pe: f64,
    pub peg_ratio: f64,
    pub price_to_book: f64,
    pub debt_to_equity: f64,
    pub roe: f64,
    pub profit_margin: f64,
    pub revenue_growth: f64,
    pub earnings_growth: f64,
    pub dividend_yield: f64,
}

/// Technical analysis metrics derived from daily bars
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalMetrics {
    pub current_price: f64,
    pub sma_20: f64,
    pub sma_50: f64,
    pub volatility: f64,
    pub price_change_1w: f64,
    pub price_change_1m: f64,
    pub volume_avg: f64,
    pub high_52w: f64,
    pub low_52w: f64,
}

/// Risk metrics derived from one year of daily bars
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskMetrics {
    pub beta: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub volatility: f64,
}

/// Historical price data for charting
///
/// Parallel sequences of equal length, ascending by date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSeries {
    pub dates: Vec<String>,
    pub currency: String,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<u64>,
}

impl PriceSeries {
    /// Number of data points in the series
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series holds no data points
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_defaults_to_zero() {
        let metrics = FundamentalMetrics::default();
        assert_eq!(metrics.pe_ratio, 0.0);
        assert_eq!(metrics.roe, 0.0);

        let metrics: TechnicalMetrics = serde_json::from_str("{}").unwrap_or_default();
        assert_eq!(metrics.sma_20, 0.0);
    }
}
