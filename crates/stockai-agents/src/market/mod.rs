//! Market data access
//!
//! [`MarketData`] is the seam between the agents and the upstream market
//! data service. The production implementation is [`yahoo::YahooMarketData`];
//! tests substitute a mock. Every accessor resolves the ticker independently
//! (the probe is idempotent and deliberately uncached).

pub mod chart;
pub mod resolver;
pub mod summary;
pub mod types;
pub mod yahoo;

use crate::error::Result;
use async_trait::async_trait;

pub use resolver::resolve_ticker;
pub use types::{FundamentalMetrics, PriceSeries, RiskMetrics, StockInfo, TechnicalMetrics};
pub use yahoo::YahooMarketData;

/// Per-ticker market data accessors required by the agents
///
/// Implementations resolve the raw ticker themselves and collapse every
/// failure mode - not found, transient, parse - into
/// [`crate::error::AgentError::DataUnavailable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Basic stock snapshot (name, price, day change, sector)
    async fn get_info(&self, ticker: &str) -> Result<StockInfo>;

    /// Fundamental metrics bundle
    async fn get_fundamentals(&self, ticker: &str) -> Result<FundamentalMetrics>;

    /// Technical metrics bundle over the given period (e.g. "6mo")
    async fn get_technicals(&self, ticker: &str, period: &str) -> Result<TechnicalMetrics>;

    /// Risk metrics bundle over one year of history
    async fn get_risk(&self, ticker: &str) -> Result<RiskMetrics>;

    /// Daily OHLCV history over the given period, for charting
    async fn get_price_history(&self, ticker: &str, period: &str) -> Result<PriceSeries>;
}
