//! The two request operations served to clients
//!
//! [`AgentService`] is what the (external) HTTP layer calls: `analyze`
//! dispatches to the agent matching the requested kind and always returns a
//! well-formed result; `chat` answers free-form questions with a live stock
//! snapshot as context, falling back to canned keyword responses when no LLM
//! is configured or the call fails.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::agents::{
    AdvisorAgent, FundamentalAgent, NewsAgent, RiskAgent, SentimentAgent, TechnicalAgent,
};
use crate::config::{LlmOptions, NewsProvider};
use crate::error::{AgentError, Result};
use crate::market::{MarketData, YahooMarketData};
use crate::prompts;
use crate::result::{AnalysisKind, AnalysisResult, Rating};
use stockai_llm::{LlmGateway, LlmProvider};

/// Default history window for technical analysis
const DEFAULT_PERIOD: &str = "6mo";
/// Sender label on every chat response
const CHAT_SENDER: &str = "AI Advisor";

/// Free-form chat request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Chat response envelope
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub sender: String,
    pub text: String,
    pub timestamp: String,
}

/// Single-agent or advisor analysis request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub ticker: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
}

/// Entry point for the chat and analyze operations
pub struct AgentService {
    market: Arc<dyn MarketData>,
    gateway: LlmGateway,
}

impl AgentService {
    /// Create a service over an arbitrary market data source
    pub fn new(market: Arc<dyn MarketData>) -> Self {
        Self {
            market,
            gateway: LlmGateway::new(),
        }
    }

    /// Create a service over the production Yahoo Finance source
    pub fn yahoo() -> Self {
        Self::new(Arc::new(YahooMarketData::new()))
    }

    /// Run the analysis matching the requested kind
    ///
    /// Always returns a well-formed result; an unrecognized kind yields a
    /// neutral placeholder rather than an error.
    #[instrument(skip(self, request), fields(ticker = %request.ticker, kind = %request.kind))]
    pub async fn analyze(&self, request: &AnalyzeRequest) -> AnalysisResult {
        let llm = LlmOptions::from_request(
            request.provider.as_deref(),
            request.api_key.as_deref(),
            request.model.as_deref(),
        );
        let period = request.period.as_deref().unwrap_or(DEFAULT_PERIOD);
        let ticker = request.ticker.as_str();

        match AnalysisKind::parse(&request.kind) {
            Some(AnalysisKind::Fundamental) => {
                FundamentalAgent::new(Arc::clone(&self.market))
                    .analyze(ticker, &llm)
                    .await
            }
            Some(AnalysisKind::Technical) => {
                TechnicalAgent::new(Arc::clone(&self.market))
                    .analyze(ticker, period, &llm)
                    .await
            }
            Some(AnalysisKind::Risk) => {
                RiskAgent::new(Arc::clone(&self.market))
                    .analyze(ticker, &llm)
                    .await
            }
            Some(AnalysisKind::Sentiment) => SentimentAgent::new().analyze(ticker, &llm).await,
            Some(AnalysisKind::News) => {
                // For news requests the provider field names a news provider
                let provider = request
                    .provider
                    .as_deref()
                    .and_then(|p| p.parse::<NewsProvider>().ok())
                    .unwrap_or_default();
                NewsAgent::new()
                    .analyze(ticker, provider, request.api_key.as_deref())
                    .await
            }
            Some(AnalysisKind::Advisor) => {
                AdvisorAgent::new(Arc::clone(&self.market))
                    .analyze(ticker, &llm)
                    .await
            }
            Some(AnalysisKind::Other(_)) | None => AnalysisResult::report(
                ticker,
                AnalysisKind::Other(request.kind.clone()),
                Rating::Neutral,
                format!("Analysis type '{}' not supported yet.", request.kind),
            ),
        }
    }

    /// Answer a free-form chat message
    ///
    /// An unknown provider name here is a request-level failure (unlike the
    /// analyze path, where it degrades to deterministic output).
    #[instrument(skip(self, request))]
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let llm = match request.provider.as_deref() {
            Some(name) if !name.is_empty() && name != "none" => {
                let provider: LlmProvider = name.parse().map_err(|_| {
                    AgentError::ConfigError(format!("Unsupported provider: {name}"))
                })?;
                LlmOptions {
                    provider,
                    api_key: request.api_key.clone(),
                    model: request.model.clone().unwrap_or_default(),
                }
            }
            _ => LlmOptions::none(),
        };

        if let Some((provider, api_key, model)) = llm.resolved() {
            let mut stock_context = String::new();
            if let Some(ticker) = &request.ticker {
                if let Ok(info) = self.market.get_info(ticker).await {
                    stock_context = format!(
                        "Stock: {ticker}, Price: ${}, Change: {:.2}%, Sector: {}",
                        info.price, info.change, info.sector,
                    );
                }
            }

            let user_prompt = format!("{stock_context}\n\nUser Question: {}", request.message);
            let outcome = self
                .gateway
                .call(provider, api_key, model, prompts::chat_system(), &user_prompt)
                .await;
            if let Some(text) = outcome.narrative() {
                return Ok(chat_response(text));
            }
            warn!("Chat LLM call failed, falling back to canned response");
        }

        Ok(chat_response(self.canned_reply(request).await))
    }

    /// Keyword-triggered deterministic chat reply
    async fn canned_reply(&self, request: &ChatRequest) -> String {
        let message = request.message.to_lowercase();
        let has_key = request.api_key.as_deref().is_some_and(|k| !k.is_empty());

        let Some(ticker) = &request.ticker else {
            let mut text = "Hello! I'm your AI stock advisor. Please select a stock ticker \
                            using the input at the top, and I'll provide detailed analysis and insights."
                .to_string();
            if !has_key {
                text += " (Tip: Configure an LLM API key in the Credentials page for enhanced AI responses!)";
            }
            return text;
        };

        let Ok(info) = self.market.get_info(ticker).await else {
            return format!(
                "I'm having trouble fetching data for {ticker}. Please verify the ticker symbol is correct."
            );
        };

        let direction = if info.change > 0.0 { "up" } else { "down" };
        let mut text = format!(
            "I'm analyzing {ticker} for you. Current price is ${}, {direction} {:.2}% today. ",
            info.price,
            info.change.abs(),
        );

        if message.contains("buy") || message.contains("invest") {
            text += "Based on current market conditions, I recommend reviewing the fundamental \
                     and technical analysis tabs for a comprehensive view before making investment decisions.";
        } else if message.contains("risk") {
            text += "Check out the Risk Analysis tab to see detailed risk metrics including beta, \
                     max drawdown, and Sharpe ratio.";
        } else if message.contains("price") || message.contains("cost") {
            text += &format!(
                "The stock is currently trading at ${}. Historical data shows it's been quite active recently.",
                info.price,
            );
        } else {
            text += "What specific aspect would you like to know more about? I can help with \
                     fundamentals, technicals, or risk analysis.";
            if !has_key {
                text += " (Tip: Add an API key in Credentials for AI-powered insights!)";
            }
        }
        text
    }
}

fn chat_response(text: impl Into<String>) -> ChatResponse {
    ChatResponse {
        sender: CHAT_SENDER.to_string(),
        text: text.into(),
        timestamp: Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{MockMarketData, StockInfo};

    fn info(price: f64, change: f64) -> StockInfo {
        StockInfo {
            symbol: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            price,
            change,
            volume: 1_000_000,
            market_cap: 3.0e12,
            sector: "Technology".to_string(),
            industry: "Consumer Electronics".to_string(),
            currency: "USD".to_string(),
        }
    }

    fn chat_request(message: &str, ticker: Option<&str>) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            ticker: ticker.map(str::to_string),
            provider: None,
            api_key: None,
            model: None,
        }
    }

    #[test]
    fn test_request_deserialization_uses_camel_case() {
        let request: AnalyzeRequest = serde_json::from_str(
            r#"{"ticker": "AAPL", "type": "advisor", "apiKey": "sk-1", "provider": "openai"}"#,
        )
        .unwrap();
        assert_eq!(request.kind, "advisor");
        assert_eq!(request.api_key.as_deref(), Some("sk-1"));
        assert!(request.period.is_none());
    }

    #[tokio::test]
    async fn test_unrecognized_kind_returns_placeholder() {
        let service = AgentService::new(Arc::new(MockMarketData::new()));
        let request = AnalyzeRequest {
            ticker: "AAPL".to_string(),
            kind: "Astrology".to_string(),
            provider: None,
            api_key: None,
            model: None,
            period: None,
        };
        let result = service.analyze(&request).await;

        assert_eq!(result.rating(), Some(Rating::Neutral));
        assert_eq!(
            result.summary(),
            Some("Analysis type 'Astrology' not supported yet.")
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "Astrology");
    }

    #[tokio::test]
    async fn test_chat_rejects_unknown_provider() {
        let service = AgentService::new(Arc::new(MockMarketData::new()));
        let mut request = chat_request("hello", None);
        request.provider = Some("cohere".to_string());
        request.api_key = Some("key".to_string());

        let err = service.chat(&request).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported provider: cohere"));
    }

    #[tokio::test]
    async fn test_chat_buy_keyword_reply() {
        let mut mock = MockMarketData::new();
        mock.expect_get_info().returning(|_| Ok(info(190.5, 1.23)));

        let service = AgentService::new(Arc::new(mock));
        let response = service
            .chat(&chat_request("Should I buy this?", Some("AAPL")))
            .await
            .unwrap();

        assert_eq!(response.sender, "AI Advisor");
        assert!(response.text.contains("Current price is $190.5, up 1.23% today."));
        assert!(response.text.contains("fundamental and technical analysis tabs"));
    }

    #[tokio::test]
    async fn test_chat_risk_keyword_reply() {
        let mut mock = MockMarketData::new();
        mock.expect_get_info().returning(|_| Ok(info(50.0, -0.8)));

        let service = AgentService::new(Arc::new(mock));
        let response = service
            .chat(&chat_request("How much risk is there?", Some("F")))
            .await
            .unwrap();

        assert!(response.text.contains("down 0.80% today"));
        assert!(response.text.contains("Risk Analysis tab"));
    }

    #[tokio::test]
    async fn test_chat_without_ticker_greets_and_hints_at_key() {
        let service = AgentService::new(Arc::new(MockMarketData::new()));
        let response = service.chat(&chat_request("hi", None)).await.unwrap();

        assert!(response.text.starts_with("Hello! I'm your AI stock advisor."));
        assert!(response.text.contains("Configure an LLM API key"));
    }

    #[tokio::test]
    async fn test_chat_reports_fetch_trouble() {
        let mut mock = MockMarketData::new();
        mock.expect_get_info().returning(|ticker| {
            Err(AgentError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "not found".to_string(),
            })
        });

        let service = AgentService::new(Arc::new(mock));
        let response = service
            .chat(&chat_request("what's up", Some("NOPE")))
            .await
            .unwrap();

        assert!(response.text.contains("trouble fetching data for NOPE"));
    }

    #[tokio::test]
    async fn test_analyze_dispatches_to_sentiment() {
        // Sentiment needs no market data, so the dispatch itself is provable
        // without any expectations on the mock
        let service = AgentService::new(Arc::new(MockMarketData::new()));
        let request = AnalyzeRequest {
            ticker: "AAPL".to_string(),
            kind: "sentiment".to_string(),
            provider: None,
            api_key: None,
            model: None,
            period: None,
        };
        let result = service.analyze(&request).await;
        assert_eq!(result.rating(), Some(Rating::Positive));
    }
}
