//! Advisor agent
//!
//! Fans out to the four scoring agents, aggregates their ratings with a
//! plurality-plus-quorum vote, and optionally asks the LLM to synthesize the
//! four summaries into one narrative.

use std::sync::Arc;

use crate::agents::{FundamentalAgent, RiskAgent, SentimentAgent, TechnicalAgent};
use crate::config::LlmOptions;
use crate::market::MarketData;
use crate::prompts;
use crate::result::{AnalysisKind, AnalysisResult, Rating};
use stockai_llm::LlmGateway;

/// Period used for the technical leg of the combined analysis
const ADVISOR_TECHNICAL_PERIOD: &str = "6mo";
/// Minimum votes on one side before a non-neutral verdict is emitted
const VERDICT_QUORUM: usize = 2;

/// Agent synthesizing the four scoring perspectives into one verdict
pub struct AdvisorAgent {
    fundamental: FundamentalAgent,
    technical: TechnicalAgent,
    risk: RiskAgent,
    sentiment: SentimentAgent,
    gateway: LlmGateway,
}

impl AdvisorAgent {
    /// Create a new advisor over a market data source
    pub fn new(market: Arc<dyn MarketData>) -> Self {
        Self {
            fundamental: FundamentalAgent::new(Arc::clone(&market)),
            technical: TechnicalAgent::new(Arc::clone(&market)),
            risk: RiskAgent::new(Arc::clone(&market)),
            sentiment: SentimentAgent::new(),
            gateway: LlmGateway::new(),
        }
    }

    /// Produce the combined advisory verdict for a ticker
    pub async fn analyze(&self, ticker: &str, llm: &LlmOptions) -> AnalysisResult {
        let fund = self.fundamental.analyze(ticker, llm).await;
        let tech = self
            .technical
            .analyze(ticker, ADVISOR_TECHNICAL_PERIOD, llm)
            .await;
        let risk = self.risk.analyze(ticker, llm).await;
        let sent = self.sentiment.analyze(ticker, llm).await;

        // A sub-agent that failed contributes a neutral rating, never an error
        let ratings = [
            fund.rating().unwrap_or(Rating::Hold),
            tech.rating().unwrap_or(Rating::Hold),
            risk.rating().unwrap_or(Rating::ModerateRisk),
            sent.rating().unwrap_or(Rating::Neutral),
        ];
        let (buy_votes, sell_votes) = tally_votes(&ratings);
        let verdict = verdict(buy_votes, sell_votes);

        let mut summary = None;
        if let Some((provider, api_key, model)) = llm.resolved() {
            if let Ok(system) = prompts::advisor(
                ticker,
                fund.summary().unwrap_or("N/A"),
                tech.summary().unwrap_or("N/A"),
                risk.summary().unwrap_or("N/A"),
                sent.summary().unwrap_or("N/A"),
            ) {
                let outcome = self
                    .gateway
                    .call(
                        provider,
                        api_key,
                        model,
                        &system,
                        &format!("Provide a final investment decision for {ticker}."),
                    )
                    .await;
                if let Some(narrative) = outcome.narrative() {
                    summary = Some(narrative.to_string());
                }
            }
        }
        let summary =
            summary.unwrap_or_else(|| fallback_summary(verdict, &fund, &tech, &risk, &sent));

        let confidence = if buy_votes > 3 || sell_votes > 3 {
            "High"
        } else {
            "Medium"
        };
        let primary_driver = if matches!(fund.rating(), Some(Rating::Buy | Rating::Sell)) {
            "Fundamentals"
        } else {
            "Technicals"
        };

        AnalysisResult::report(ticker, AnalysisKind::Advisor, verdict, summary)
            .with_key_metric("Overall Score", format!("{buy_votes}/5"))
            .with_key_metric("Confidence", confidence)
            .with_key_metric("Primary Driver", primary_driver)
    }
}

/// Count buy-side and sell-side votes across sub-agent ratings
///
/// Risk labels match neither side; they participate in the tally without
/// moving it.
pub(crate) fn tally_votes(ratings: &[Rating]) -> (usize, usize) {
    let buy_votes = ratings
        .iter()
        .filter(|r| matches!(r, Rating::StrongBuy | Rating::Buy | Rating::Positive))
        .count();
    let sell_votes = ratings
        .iter()
        .filter(|r| matches!(r, Rating::Sell | Rating::StrongSell))
        .count();
    (buy_votes, sell_votes)
}

/// Plurality-with-minimum-quorum verdict rule
///
/// A side must both outnumber the other and reach the quorum; a single
/// dissenting vote can never flip the verdict on its own.
pub(crate) fn verdict(buy_votes: usize, sell_votes: usize) -> Rating {
    if buy_votes > sell_votes && buy_votes >= VERDICT_QUORUM {
        Rating::Bullish
    } else if sell_votes > buy_votes && sell_votes >= VERDICT_QUORUM {
        Rating::Bearish
    } else {
        Rating::Hold
    }
}

/// Deterministic summary used when no LLM synthesis is available
fn fallback_summary(
    verdict: Rating,
    fund: &AnalysisResult,
    tech: &AnalysisResult,
    risk: &AnalysisResult,
    sent: &AnalysisResult,
) -> String {
    let mut summary = format!("**AI Advisor Verdict: {verdict}**\n\n");
    summary += &format!("• **Fundamental**: {}\n", fund.summary().unwrap_or("N/A"));
    summary += &format!("• **Technical**: {}\n", tech.summary().unwrap_or("N/A"));
    summary += &format!("• **Risk**: {}\n", risk.summary().unwrap_or("N/A"));
    summary += &format!("• **Sentiment**: {}\n", sent.summary().unwrap_or("N/A"));
    summary
}
