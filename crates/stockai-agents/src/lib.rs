//! Multi-perspective stock analysis agents
//!
//! This crate produces advisory analyses for a ticker symbol by combining
//! several independent rule-based agents with an optional LLM narrative
//! overlay:
//!
//! - `FundamentalAgent`: valuation and profitability thresholds
//! - `TechnicalAgent`: price trend against 20/50-day moving averages
//! - `RiskAgent`: beta and drawdown classification
//! - `SentimentAgent`: aggregate market sentiment
//! - `NewsAgent`: provider fallback chain with normalized digests
//! - `AdvisorAgent`: quorum vote across the four scoring agents
//!
//! Agents are stateless and scoped to one call. Each resolves the ticker,
//! fetches its metrics, computes a deterministic rating, and - when an LLM
//! provider and key travel with the request - attempts to replace its
//! summary with a richer narrative, silently keeping the deterministic text
//! on any failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockai_agents::service::{AgentService, AnalyzeRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = AgentService::yahoo();
//!     let request = AnalyzeRequest {
//!         ticker: "AAPL".to_string(),
//!         kind: "advisor".to_string(),
//!         provider: None,
//!         api_key: None,
//!         model: None,
//!         period: None,
//!     };
//!     let result = service.analyze(&request).await;
//!     println!("{}", serde_json::to_string_pretty(&result).unwrap());
//! }
//! ```

pub mod agents;
pub mod config;
pub mod error;
pub mod market;
pub mod news;
pub mod prompts;
pub mod result;
pub mod service;

// Re-export main types for convenience
pub use agents::{
    AdvisorAgent, FundamentalAgent, NewsAgent, RiskAgent, SentimentAgent, TechnicalAgent,
};
pub use config::{LlmOptions, NewsProvider};
pub use error::{AgentError, Result};
pub use result::{AnalysisKind, AnalysisResult, KeyMetrics, Rating};
pub use service::{AgentService, AnalyzeRequest, ChatRequest, ChatResponse};

// Re-export the LLM provider selection from the gateway crate
pub use stockai_llm::LlmProvider;
