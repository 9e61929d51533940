//! Risk profile agent

use std::sync::Arc;
use tracing::warn;

use crate::agents::{DATA_UNAVAILABLE, fmt_num, fmt_percent, metrics_json};
use crate::config::LlmOptions;
use crate::market::{MarketData, RiskMetrics};
use crate::prompts;
use crate::result::{AnalysisKind, AnalysisResult, Rating};
use stockai_llm::LlmGateway;

/// Agent classifying a stock's risk from beta and drawdown
pub struct RiskAgent {
    market: Arc<dyn MarketData>,
    gateway: LlmGateway,
}

impl RiskAgent {
    /// Create a new risk agent over a market data source
    pub fn new(market: Arc<dyn MarketData>) -> Self {
        Self {
            market,
            gateway: LlmGateway::new(),
        }
    }

    /// Analyze a ticker's risk profile
    pub async fn analyze(&self, ticker: &str, llm: &LlmOptions) -> AnalysisResult {
        let metrics = match self.market.get_risk(ticker).await {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!(%ticker, error = %e, "Risk metrics unavailable");
                return AnalysisResult::failure(ticker, AnalysisKind::Risk, DATA_UNAVAILABLE);
            }
        };

        let rating = rate_risk(&metrics);
        let relative = if metrics.beta > 1.0 { "more" } else { "less" };
        let mut summary = format!(
            "{ticker} has a Beta of {}, indicating it is {relative} volatile than the market. Max drawdown is {}%. Sharpe Ratio: {}.",
            metrics.beta, metrics.max_drawdown, metrics.sharpe_ratio,
        );

        if let Some((provider, api_key, model)) = llm.resolved() {
            if let Ok(system) = prompts::risk(ticker, &metrics_json(&metrics)) {
                let outcome = self
                    .gateway
                    .call(
                        provider,
                        api_key,
                        model,
                        &system,
                        &format!("Analyze the risk profile for {ticker}."),
                    )
                    .await;
                if let Some(narrative) = outcome.narrative() {
                    summary = narrative.to_string();
                }
            }
        }

        AnalysisResult::report(ticker, AnalysisKind::Risk, rating, summary)
            .with_key_metric("Beta", fmt_num(metrics.beta))
            .with_key_metric("Max Drawdown", fmt_percent(metrics.max_drawdown))
            .with_key_metric("Sharpe Ratio", fmt_num(metrics.sharpe_ratio))
            .with_key_metric("Volatility", fmt_percent(metrics.volatility))
    }
}

/// Fixed-threshold risk classification
///
/// A high beta or a deep drawdown alone is enough for the high-risk bucket;
/// the low-risk bucket needs both conditions.
pub(crate) fn rate_risk(metrics: &RiskMetrics) -> Rating {
    if metrics.beta > 1.5 || metrics.max_drawdown < -30.0 {
        Rating::HighRisk
    } else if metrics.beta < 0.8 && metrics.max_drawdown > -15.0 {
        Rating::LowRisk
    } else {
        Rating::ModerateRisk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketData;

    fn metrics(beta: f64, max_drawdown: f64) -> RiskMetrics {
        RiskMetrics {
            beta,
            max_drawdown,
            ..Default::default()
        }
    }

    #[test]
    fn test_risk_classification() {
        // Beta alone dominates even with a shallow drawdown
        assert_eq!(rate_risk(&metrics(2.0, -10.0)), Rating::HighRisk);
        // Deep drawdown alone dominates
        assert_eq!(rate_risk(&metrics(1.0, -45.0)), Rating::HighRisk);
        assert_eq!(rate_risk(&metrics(0.5, -5.0)), Rating::LowRisk);
        assert_eq!(rate_risk(&metrics(1.0, -20.0)), Rating::ModerateRisk);
        // Low beta with a mid drawdown is only moderate
        assert_eq!(rate_risk(&metrics(0.5, -20.0)), Rating::ModerateRisk);
    }

    #[tokio::test]
    async fn test_analyze_phrases_beta_direction() {
        let mut mock = MockMarketData::new();
        mock.expect_get_risk().returning(|_| {
            Ok(RiskMetrics {
                beta: 0.6,
                max_drawdown: -8.0,
                sharpe_ratio: 1.4,
                volatility: 18.0,
            })
        });

        let agent = RiskAgent::new(Arc::new(mock));
        let result = agent.analyze("KO", &LlmOptions::none()).await;

        assert_eq!(result.rating(), Some(Rating::LowRisk));
        assert!(result.summary().unwrap().contains("less volatile than the market"));
        assert_eq!(result.key_metrics.get("Max Drawdown"), Some("-8%"));
    }
}
