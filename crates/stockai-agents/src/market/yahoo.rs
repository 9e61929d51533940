//! Production market data implementation backed by Yahoo Finance
//!
//! Snapshot and fundamental statistics come from the quoteSummary endpoint,
//! bar-derived metrics from the chart endpoint. Derivations mirror the
//! upstream service contract: SMA with a current-price fallback below the
//! window, annualized volatility and Sharpe from daily returns, max drawdown
//! from the cumulative-return running peak.

use async_trait::async_trait;
use ta::Next;
use ta::indicators::SimpleMovingAverage;
use tracing::debug;

use crate::error::{AgentError, Result};
use crate::market::chart::{Bar, ChartClient};
use crate::market::summary::{SummaryClient, raw_or_zero};
use crate::market::types::{
    FundamentalMetrics, PriceSeries, RiskMetrics, StockInfo, TechnicalMetrics,
};
use crate::market::{MarketData, resolve_ticker};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Yahoo Finance-backed [`MarketData`] implementation
pub struct YahooMarketData {
    chart: ChartClient,
    summary: SummaryClient,
}

impl YahooMarketData {
    /// Create a new Yahoo market data source
    pub fn new() -> Self {
        Self {
            chart: ChartClient::new(),
            summary: SummaryClient::new(),
        }
    }
}

impl Default for YahooMarketData {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketData for YahooMarketData {
    async fn get_info(&self, ticker: &str) -> Result<StockInfo> {
        let ticker = resolve_ticker(ticker).await;
        let summary = self.summary.fetch(&ticker).await?;

        let price = summary.price.unwrap_or_default();
        let profile = summary.asset_profile.unwrap_or_default();

        Ok(StockInfo {
            name: price
                .long_name
                .or(price.short_name)
                .unwrap_or_else(|| ticker.clone()),
            price: raw_or_zero(price.regular_market_price),
            change: raw_or_zero(price.regular_market_change_percent) * 100.0,
            volume: raw_or_zero(price.regular_market_volume) as u64,
            market_cap: raw_or_zero(price.market_cap),
            sector: profile.sector.unwrap_or_else(|| "N/A".to_string()),
            industry: profile.industry.unwrap_or_else(|| "N/A".to_string()),
            currency: price.currency.unwrap_or_else(|| "USD".to_string()),
            symbol: ticker,
        })
    }

    async fn get_fundamentals(&self, ticker: &str) -> Result<FundamentalMetrics> {
        let ticker = resolve_ticker(ticker).await;
        let summary = self.summary.fetch(&ticker).await?;
        debug!(%ticker, "Fetched fundamental summary");

        let detail = summary.summary_detail.unwrap_or_default();
        let stats = summary.default_key_statistics.unwrap_or_default();
        let financial = summary.financial_data.unwrap_or_default();

        Ok(FundamentalMetrics {
            pe_ratio: raw_or_zero(detail.trailing_pe),
            forward_pe: raw_or_zero(detail.forward_pe),
            peg_ratio: raw_or_zero(stats.peg_ratio),
            price_to_book: raw_or_zero(stats.price_to_book),
            debt_to_equity: raw_or_zero(financial.debt_to_equity),
            roe: raw_or_zero(financial.return_on_equity),
            profit_margin: raw_or_zero(financial.profit_margins),
            revenue_growth: raw_or_zero(financial.revenue_growth),
            earnings_growth: raw_or_zero(financial.earnings_growth),
            dividend_yield: raw_or_zero(detail.dividend_yield),
        })
    }

    async fn get_technicals(&self, ticker: &str, period: &str) -> Result<TechnicalMetrics> {
        let ticker = resolve_ticker(ticker).await;
        let data = self.chart.fetch_daily(&ticker, period).await?;
        let bars = &data.bars;

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let current = closes.last().copied().unwrap_or(0.0);
        let returns = daily_returns(&closes);

        let price_change_1w = if closes.len() >= 5 {
            percent_change(closes[closes.len() - 5], current)
        } else {
            0.0
        };
        let price_change_1m = percent_change(closes[0], current);

        let volume_sum: u64 = bars.iter().map(|b| b.volume).sum();
        let volume_avg = volume_sum as f64 / bars.len() as f64;

        Ok(TechnicalMetrics {
            current_price: round2(current),
            sma_20: round2(simple_moving_average(&closes, 20)?),
            sma_50: round2(simple_moving_average(&closes, 50)?),
            volatility: round2(annualized_volatility(&returns) * 100.0),
            price_change_1w: round2(price_change_1w),
            price_change_1m: round2(price_change_1m),
            volume_avg: volume_avg.round(),
            high_52w: round2(bars.iter().map(|b| b.high).fold(f64::MIN, f64::max)),
            low_52w: round2(bars.iter().map(|b| b.low).fold(f64::MAX, f64::min)),
        })
    }

    async fn get_risk(&self, ticker: &str) -> Result<RiskMetrics> {
        let ticker = resolve_ticker(ticker).await;
        let summary = self.summary.fetch(&ticker).await?;
        let data = self.chart.fetch_daily(&ticker, "1y").await?;

        // Beta is supplied by Yahoo; a missing value means market-average
        let beta = summary
            .summary_detail
            .and_then(|d| d.beta)
            .and_then(|v| v.raw)
            .unwrap_or(1.0);

        let closes: Vec<f64> = data.bars.iter().map(|b| b.close).collect();
        let returns = daily_returns(&closes);

        Ok(RiskMetrics {
            beta: round2(beta),
            max_drawdown: round2(max_drawdown(&returns) * 100.0),
            sharpe_ratio: round2(sharpe_ratio(&returns)),
            volatility: round2(annualized_volatility(&returns) * 100.0),
        })
    }

    async fn get_price_history(&self, ticker: &str, period: &str) -> Result<PriceSeries> {
        let ticker = resolve_ticker(ticker).await;
        let data = self.chart.fetch_daily(&ticker, period).await?;
        Ok(price_series_from_bars(&data.bars, data.currency))
    }
}

/// Build a charting series from daily bars
fn price_series_from_bars(bars: &[Bar], currency: String) -> PriceSeries {
    PriceSeries {
        dates: bars
            .iter()
            .map(|b| b.date.format("%Y-%m-%d").to_string())
            .collect(),
        currency,
        open: bars.iter().map(|b| round2(b.open)).collect(),
        high: bars.iter().map(|b| round2(b.high)).collect(),
        low: bars.iter().map(|b| round2(b.low)).collect(),
        close: bars.iter().map(|b| round2(b.close)).collect(),
        volume: bars.iter().map(|b| b.volume).collect(),
    }
}

/// Round to two decimal places for display parity
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Percent change from `base` to `value`, zero-safe
fn percent_change(base: f64, value: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        (value - base) / base * 100.0
    }
}

/// Simple moving average of the last `window` closes
///
/// Falls back to the latest close when fewer bars than the window exist.
fn simple_moving_average(closes: &[f64], window: usize) -> Result<f64> {
    let current = closes.last().copied().unwrap_or(0.0);
    if closes.len() < window {
        return Ok(current);
    }

    let mut sma = SimpleMovingAverage::new(window)
        .map_err(|e| AgentError::IndicatorError(e.to_string()))?;
    let mut value = current;
    for &close in closes {
        value = sma.next(close);
    }
    Ok(value)
}

/// Day-over-day fractional returns
fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Sample standard deviation
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Annualized volatility from daily returns
fn annualized_volatility(returns: &[f64]) -> f64 {
    sample_std(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Simplified Sharpe ratio (no risk-free rate)
fn sharpe_ratio(returns: &[f64]) -> f64 {
    let std = sample_std(returns);
    if std == 0.0 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    mean / std * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Deepest drop from a running peak of cumulative returns, as a fraction
fn max_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 1.0;
    let mut peak = f64::MIN;
    let mut worst: f64 = 0.0;
    for r in returns {
        cumulative *= 1.0 + r;
        peak = peak.max(cumulative);
        worst = worst.min((cumulative - peak) / peak);
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(2.675), 2.68);
    }

    #[test]
    fn test_sma_with_enough_bars() {
        let closes: Vec<f64> = (1..=25).map(f64::from).collect();
        // Mean of 6..=25
        assert_eq!(simple_moving_average(&closes, 20).unwrap(), 15.5);
    }

    #[test]
    fn test_sma_falls_back_to_current_price() {
        let closes = vec![10.0, 12.0, 14.0];
        assert_eq!(simple_moving_average(&closes, 20).unwrap(), 14.0);
    }

    #[test]
    fn test_daily_returns() {
        let returns = daily_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-9);
        assert!((returns[1] + 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_max_drawdown() {
        // 100 -> 110 -> 99: deepest drop is 10% off the 110 peak
        let returns = daily_returns(&[100.0, 110.0, 99.0]);
        assert!((max_drawdown(&returns) + 0.1).abs() < 1e-9);

        // Monotonic climb never draws down
        let returns = daily_returns(&[100.0, 105.0, 111.0]);
        assert_eq!(max_drawdown(&returns), 0.0);
    }

    #[test]
    fn test_sharpe_zero_when_flat() {
        assert_eq!(sharpe_ratio(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(sharpe_ratio(&[]), 0.0);
    }

    #[test]
    fn test_percent_change_zero_base() {
        assert_eq!(percent_change(0.0, 50.0), 0.0);
        assert_eq!(percent_change(100.0, 120.0), 20.0);
    }

    #[test]
    fn test_price_series_from_bars_is_parallel() {
        let bars = vec![
            Bar {
                date: chrono::NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
                open: 10.0,
                high: 11.0,
                low: 9.5,
                close: 10.5,
                volume: 1000,
            },
            Bar {
                date: chrono::NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
                open: 10.5,
                high: 12.0,
                low: 10.0,
                close: 11.75,
                volume: 1500,
            },
        ];
        let series = price_series_from_bars(&bars, "USD".to_string());
        assert_eq!(series.len(), 2);
        assert_eq!(series.dates[0], "2026-01-02");
        assert_eq!(series.close[1], 11.75);
        assert_eq!(series.volume, vec![1000, 1500]);
    }
}
