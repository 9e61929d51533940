//! Fundamental analysis agent

use std::sync::Arc;
use tracing::warn;

use crate::agents::{DATA_UNAVAILABLE, fmt_fraction_percent, fmt_num, metrics_json, round2};
use crate::config::LlmOptions;
use crate::market::{FundamentalMetrics, MarketData};
use crate::prompts;
use crate::result::{AnalysisKind, AnalysisResult, Rating};
use stockai_llm::LlmGateway;

/// Agent rating a stock on valuation and profitability fundamentals
pub struct FundamentalAgent {
    market: Arc<dyn MarketData>,
    gateway: LlmGateway,
}

impl FundamentalAgent {
    /// Create a new fundamental agent over a market data source
    pub fn new(market: Arc<dyn MarketData>) -> Self {
        Self {
            market,
            gateway: LlmGateway::new(),
        }
    }

    /// Analyze a ticker's fundamentals
    pub async fn analyze(&self, ticker: &str, llm: &LlmOptions) -> AnalysisResult {
        let metrics = match self.market.get_fundamentals(ticker).await {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!(%ticker, error = %e, "Fundamental metrics unavailable");
                return AnalysisResult::failure(ticker, AnalysisKind::Fundamental, DATA_UNAVAILABLE);
            }
        };

        let mut rating = rate_fundamentals(&metrics);
        let mut summary = format!(
            "{ticker} has a P/E ratio of {} and ROE of {}%. The valuation logic suggests a {rating}.",
            round2(metrics.pe_ratio),
            round2(metrics.roe * 100.0),
        );

        if let Some((provider, api_key, model)) = llm.resolved() {
            if let Ok(system) = prompts::fundamental(ticker, &metrics_json(&metrics)) {
                let outcome = self
                    .gateway
                    .call(
                        provider,
                        api_key,
                        model,
                        &system,
                        &format!("Analyze the fundamentals for {ticker}."),
                    )
                    .await;
                if let Some(narrative) = outcome.narrative() {
                    summary = narrative.to_string();
                    if let Some(upgrade) = rating_override_from_narrative(&summary) {
                        rating = upgrade;
                    }
                }
            }
        }

        AnalysisResult::report(ticker, AnalysisKind::Fundamental, rating, summary)
            .with_key_metric("P/E Ratio", fmt_num(metrics.pe_ratio))
            .with_key_metric("ROE", fmt_fraction_percent(metrics.roe))
            .with_key_metric("Debt/Equity", fmt_num(metrics.debt_to_equity))
            .with_key_metric("Profit Margin", fmt_fraction_percent(metrics.profit_margin))
            .with_key_metric("Rev Growth", fmt_fraction_percent(metrics.revenue_growth))
    }
}

/// Fixed-threshold fundamental rating rule
pub(crate) fn rate_fundamentals(metrics: &FundamentalMetrics) -> Rating {
    if metrics.pe_ratio > 0.0 && metrics.pe_ratio < 15.0 && metrics.roe > 0.15 {
        Rating::Buy
    } else if metrics.pe_ratio > 35.0 {
        Rating::Sell
    } else {
        Rating::Hold
    }
}

/// Closed-vocabulary rating upgrade scanned from the LLM narrative
///
/// The trigger literals are part of the product contract between prompt
/// wording and rating semantics; they live only here.
pub(crate) fn rating_override_from_narrative(narrative: &str) -> Option<Rating> {
    if narrative.contains("Strong Buy") {
        Some(Rating::StrongBuy)
    } else if narrative.contains("Strong Sell") {
        Some(Rating::StrongSell)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;
    use crate::market::MockMarketData;

    fn metrics(pe_ratio: f64, roe: f64) -> FundamentalMetrics {
        FundamentalMetrics {
            pe_ratio,
            roe,
            ..Default::default()
        }
    }

    #[test]
    fn test_rating_rule() {
        assert_eq!(rate_fundamentals(&metrics(12.0, 0.2)), Rating::Buy);
        assert_eq!(rate_fundamentals(&metrics(40.0, 0.2)), Rating::Sell);
        assert_eq!(rate_fundamentals(&metrics(20.0, 0.2)), Rating::Hold);
        // Negative P/E never qualifies as Buy
        assert_eq!(rate_fundamentals(&metrics(-5.0, 0.5)), Rating::Hold);
    }

    #[test]
    fn test_rating_rule_boundaries() {
        // pe == 15 is not Buy, pe == 35 is not Sell
        assert_eq!(rate_fundamentals(&metrics(15.0, 0.5)), Rating::Hold);
        assert_eq!(rate_fundamentals(&metrics(35.0, 0.0)), Rating::Hold);
        // roe must strictly exceed 0.15
        assert_eq!(rate_fundamentals(&metrics(12.0, 0.15)), Rating::Hold);
    }

    #[test]
    fn test_rating_override_matcher() {
        assert_eq!(
            rating_override_from_narrative("This looks like a Strong Buy to me."),
            Some(Rating::StrongBuy)
        );
        assert_eq!(
            rating_override_from_narrative("Strong Sell signal on debt load."),
            Some(Rating::StrongSell)
        );
        assert_eq!(rating_override_from_narrative("A plain buy."), None);
    }

    #[tokio::test]
    async fn test_analyze_produces_deterministic_report() {
        let mut mock = MockMarketData::new();
        mock.expect_get_fundamentals()
            .returning(|_| Ok(metrics(12.0, 0.2)));

        let agent = FundamentalAgent::new(Arc::new(mock));
        let result = agent.analyze("AAPL", &LlmOptions::none()).await;

        assert_eq!(result.rating(), Some(Rating::Buy));
        let summary = result.summary().unwrap();
        assert!(summary.contains("P/E ratio of 12"));
        assert!(summary.contains("suggests a Buy"));
        assert_eq!(result.key_metrics.get("ROE"), Some("20%"));
        assert_eq!(result.key_metrics.len(), 5);
    }

    #[tokio::test]
    async fn test_analyze_reports_data_unavailable() {
        let mut mock = MockMarketData::new();
        mock.expect_get_fundamentals().returning(|ticker| {
            Err(AgentError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "nothing".to_string(),
            })
        });

        let agent = FundamentalAgent::new(Arc::new(mock));
        let result = agent.analyze("NOPE", &LlmOptions::none()).await;

        assert_eq!(result.error(), Some("Could not fetch data"));
        assert!(result.rating().is_none());
    }
}
