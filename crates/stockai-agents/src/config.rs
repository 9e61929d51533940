//! Request-scoped provider configuration
//!
//! Agents are stateless and re-created per request, so provider selection and
//! credentials travel with the request rather than living in long-lived
//! state.

use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stockai_llm::LlmProvider;

/// News retrieval provider, as sent by clients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsProvider {
    /// Firecrawl search API (requires API key)
    Firecrawl,
    /// Spider Cloud search API (requires API key)
    Spider,
    /// Crawl4AI - declared placeholder, always defers to the default
    Crawl4ai,
    /// Yahoo Finance news feed (default, no API key required)
    #[default]
    #[serde(rename = "yfinance")]
    Yahoo,
}

/// Fixed fallback priority for news providers
const NEWS_FALLBACK_ORDER: [NewsProvider; 4] = [
    NewsProvider::Firecrawl,
    NewsProvider::Spider,
    NewsProvider::Crawl4ai,
    NewsProvider::Yahoo,
];

impl NewsProvider {
    /// Wire name of the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Firecrawl => "firecrawl",
            Self::Spider => "spider",
            Self::Crawl4ai => "crawl4ai",
            Self::Yahoo => "yfinance",
        }
    }

    /// Human-readable source label used in digests and key metrics
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Firecrawl => "Firecrawl",
            Self::Spider => "Spider Cloud",
            Self::Crawl4ai => "Crawl4AI",
            Self::Yahoo => "Yahoo Finance",
        }
    }

    /// Whether this provider needs an API key to be attempted
    pub fn requires_key(&self) -> bool {
        !matches!(self, Self::Yahoo)
    }

    /// The ordered fallback chain starting from this provider
    ///
    /// The chain always ends at [`NewsProvider::Yahoo`], the key-free
    /// default.
    pub fn chain(&self) -> &'static [NewsProvider] {
        let start = NEWS_FALLBACK_ORDER
            .iter()
            .position(|p| p == self)
            .unwrap_or(NEWS_FALLBACK_ORDER.len() - 1);
        &NEWS_FALLBACK_ORDER[start..]
    }
}

impl fmt::Display for NewsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsProvider {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "firecrawl" => Ok(Self::Firecrawl),
            "spider" => Ok(Self::Spider),
            "crawl4ai" => Ok(Self::Crawl4ai),
            "yfinance" | "" => Ok(Self::Yahoo),
            other => Err(AgentError::ConfigError(format!(
                "Unknown news provider: {other}"
            ))),
        }
    }
}

/// Per-request LLM overlay configuration
#[derive(Debug, Clone, Default)]
pub struct LlmOptions {
    /// Selected provider; `None` keeps agents fully deterministic
    pub provider: LlmProvider,
    /// API key for the selected provider
    pub api_key: Option<String>,
    /// Model override; empty selects the provider default
    pub model: String,
}

impl LlmOptions {
    /// Overlay configuration with no LLM
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from the loose request fields
    ///
    /// An unknown provider name is treated as unconfigured: the agent keeps
    /// its deterministic output, matching the gateway's failure isolation.
    pub fn from_request(
        provider: Option<&str>,
        api_key: Option<&str>,
        model: Option<&str>,
    ) -> Self {
        let provider = provider
            .map(|p| p.parse::<LlmProvider>().unwrap_or(LlmProvider::None))
            .unwrap_or_default();
        Self {
            provider,
            api_key: api_key.map(str::to_string),
            model: model.unwrap_or_default().to_string(),
        }
    }

    /// The provider, key, and model - if an overlay is actually configured
    pub fn resolved(&self) -> Option<(LlmProvider, &str, &str)> {
        if self.provider == LlmProvider::None {
            return None;
        }
        let key = self.api_key.as_deref()?;
        if key.is_empty() {
            return None;
        }
        Some((self.provider, key, self.model.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_provider_parsing() {
        assert_eq!(
            "firecrawl".parse::<NewsProvider>().unwrap(),
            NewsProvider::Firecrawl
        );
        assert_eq!(
            "yfinance".parse::<NewsProvider>().unwrap(),
            NewsProvider::Yahoo
        );
        assert!("bing".parse::<NewsProvider>().is_err());
    }

    #[test]
    fn test_fallback_chain_order() {
        assert_eq!(
            NewsProvider::Firecrawl.chain(),
            &[
                NewsProvider::Firecrawl,
                NewsProvider::Spider,
                NewsProvider::Crawl4ai,
                NewsProvider::Yahoo,
            ]
        );
        assert_eq!(
            NewsProvider::Crawl4ai.chain(),
            &[NewsProvider::Crawl4ai, NewsProvider::Yahoo]
        );
        assert_eq!(NewsProvider::Yahoo.chain(), &[NewsProvider::Yahoo]);
    }

    #[test]
    fn test_llm_options_resolution() {
        let options = LlmOptions::from_request(Some("openai"), Some("sk-test"), None);
        let (provider, key, model) = options.resolved().unwrap();
        assert_eq!(provider, LlmProvider::OpenAi);
        assert_eq!(key, "sk-test");
        assert_eq!(model, "");

        // No key means no overlay
        assert!(LlmOptions::from_request(Some("openai"), None, None)
            .resolved()
            .is_none());

        // Unknown provider degrades to none
        assert!(LlmOptions::from_request(Some("cohere"), Some("k"), None)
            .resolved()
            .is_none());

        assert!(LlmOptions::none().resolved().is_none());
    }
}
