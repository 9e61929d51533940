//! Technical analysis agent

use std::sync::Arc;
use tracing::{debug, warn};

use crate::agents::{DATA_UNAVAILABLE, fmt_dollars, fmt_percent, metrics_json};
use crate::config::LlmOptions;
use crate::market::{MarketData, TechnicalMetrics};
use crate::prompts;
use crate::result::{AnalysisKind, AnalysisResult, Rating};
use stockai_llm::LlmGateway;

/// Agent rating a stock on price trend relative to its moving averages
pub struct TechnicalAgent {
    market: Arc<dyn MarketData>,
    gateway: LlmGateway,
}

impl TechnicalAgent {
    /// Create a new technical agent over a market data source
    pub fn new(market: Arc<dyn MarketData>) -> Self {
        Self {
            market,
            gateway: LlmGateway::new(),
        }
    }

    /// Analyze a ticker's technicals over the given period (e.g. "6mo")
    pub async fn analyze(&self, ticker: &str, period: &str, llm: &LlmOptions) -> AnalysisResult {
        let metrics = match self.market.get_technicals(ticker, period).await {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!(%ticker, error = %e, "Technical metrics unavailable");
                return AnalysisResult::failure(ticker, AnalysisKind::Technical, DATA_UNAVAILABLE);
            }
        };

        let (rating, trend) = rate_technicals(&metrics);
        let mut summary = format!(
            "{ticker} is currently at ${}, showing {trend}. Trading relative to SMA20 (${}). Volatility: {}%.",
            metrics.current_price, metrics.sma_20, metrics.volatility,
        );

        if let Some((provider, api_key, model)) = llm.resolved() {
            if let Ok(system) = prompts::technical(ticker, &metrics_json(&metrics), period) {
                let outcome = self
                    .gateway
                    .call(
                        provider,
                        api_key,
                        model,
                        &system,
                        &format!("Analyze the technicals for {ticker}."),
                    )
                    .await;
                if let Some(narrative) = outcome.narrative() {
                    summary = narrative.to_string();
                }
            }
        }

        // Chart data rides along for the dashboard; its absence is not an error
        let chart_data = match self.market.get_price_history(ticker, period).await {
            Ok(series) => Some(series),
            Err(e) => {
                debug!(%ticker, error = %e, "Price history unavailable for chart");
                None
            }
        };

        let mut result = AnalysisResult::report(ticker, AnalysisKind::Technical, rating, summary)
            .with_key_metric("Current Price", fmt_dollars(metrics.current_price))
            .with_key_metric("SMA 20", fmt_dollars(metrics.sma_20))
            .with_key_metric("SMA 50", fmt_dollars(metrics.sma_50))
            .with_key_metric("Volatility", fmt_percent(metrics.volatility))
            .with_key_metric("1W Change", fmt_percent(metrics.price_change_1w))
            .with_key_metric("1M Change", fmt_percent(metrics.price_change_1m));
        if let Some(series) = chart_data {
            result = result.with_chart_data(series);
        }
        result
    }
}

/// Fixed-threshold trend rule; the trend label follows the rating branch
pub(crate) fn rate_technicals(metrics: &TechnicalMetrics) -> (Rating, &'static str) {
    let price = metrics.current_price;
    let sma_20 = metrics.sma_20;
    let sma_50 = metrics.sma_50;

    if price > sma_20 && sma_20 > sma_50 {
        (Rating::StrongBuy, "strong uptrend")
    } else if price > sma_20 {
        (Rating::Buy, "uptrend")
    } else if price < sma_20 && sma_20 < sma_50 {
        (Rating::Sell, "downtrend")
    } else {
        (Rating::Hold, "sideways")
    }
}
