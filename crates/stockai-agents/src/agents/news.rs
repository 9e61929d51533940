//! News digest agent
//!
//! Walks the ordered provider fallback chain until one source yields raw
//! items, then normalizes and renders them into a numbered digest. A
//! provider failure advances the chain; only the terminal default failing
//! produces an error result.

use serde_json::Value;
use tracing::warn;

use crate::config::NewsProvider;
use crate::error::{AgentError, Result};
use crate::news::{FirecrawlClient, SpiderClient, YahooNewsClient, normalize_items, render_digest};
use crate::result::{AnalysisKind, AnalysisResult, Rating};

/// Display cap for the key-free default feed
const DEFAULT_DISPLAY_LIMIT: usize = 8;
/// Display cap for the keyed search providers
const SEARCH_DISPLAY_LIMIT: usize = 5;
/// Valid-item count at which activity is rated high
const HIGH_ACTIVITY_THRESHOLD: usize = 5;

/// Agent retrieving and digesting recent news for a ticker
pub struct NewsAgent;

impl NewsAgent {
    /// Create a new news agent
    pub fn new() -> Self {
        Self
    }

    /// Retrieve news starting at the requested provider
    ///
    /// The same request key is offered to each keyed strategy down the
    /// chain; the chain always terminates at the key-free Yahoo feed.
    pub async fn analyze(
        &self,
        ticker: &str,
        provider: NewsProvider,
        api_key: Option<&str>,
    ) -> AnalysisResult {
        let mut last_error: Option<AgentError> = None;

        for source in provider.chain() {
            match fetch_raw(*source, ticker, api_key).await {
                Ok(raw) => return build_report(ticker, *source, &raw),
                Err(e) => {
                    warn!(%ticker, provider = %source, error = %e, "News provider failed, falling back");
                    last_error = Some(e);
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "No news provider available".to_string());
        AnalysisResult::failure(ticker, AnalysisKind::News, reason)
    }
}

impl Default for NewsAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch raw items from a single provider strategy
async fn fetch_raw(
    source: NewsProvider,
    ticker: &str,
    api_key: Option<&str>,
) -> Result<Vec<Value>> {
    match source {
        NewsProvider::Firecrawl => {
            let key = require_key(source, api_key)?;
            FirecrawlClient::new(key).search_news(ticker).await
        }
        NewsProvider::Spider => {
            let key = require_key(source, api_key)?;
            SpiderClient::new(key).search_news(ticker).await
        }
        // Declared placeholder: needs a local crawler install, always defers
        NewsProvider::Crawl4ai => Err(AgentError::NewsProviderFailure {
            provider: source.to_string(),
            reason: "requires local crawler installation".to_string(),
        }),
        NewsProvider::Yahoo => YahooNewsClient::new().fetch_news(ticker).await,
    }
}

fn require_key<'a>(source: NewsProvider, api_key: Option<&'a str>) -> Result<&'a str> {
    api_key
        .filter(|key| !key.is_empty())
        .ok_or_else(|| AgentError::NewsProviderFailure {
            provider: source.to_string(),
            reason: "API key required".to_string(),
        })
}

/// Normalize raw items and render the digest result for one provider
pub(crate) fn build_report(
    ticker: &str,
    source: NewsProvider,
    raw: &[Value],
) -> AnalysisResult {
    if raw.is_empty() {
        return AnalysisResult::report(
            ticker,
            AnalysisKind::News,
            Rating::NotAvailable,
            format!("No recent news found via {}.", source.display_name()),
        );
    }

    let items = normalize_items(raw);
    if items.is_empty() {
        return AnalysisResult::report(
            ticker,
            AnalysisKind::News,
            Rating::NotAvailable,
            "News found but contained no valid titles.",
        );
    }

    let limit = if source == NewsProvider::Yahoo {
        DEFAULT_DISPLAY_LIMIT
    } else {
        SEARCH_DISPLAY_LIMIT
    };
    let (digest, shown) = render_digest(ticker, source.display_name(), &items, limit);

    let rating = if items.len() >= HIGH_ACTIVITY_THRESHOLD {
        Rating::HighActivity
    } else {
        Rating::ModerateActivity
    };

    let result = AnalysisResult::report(ticker, AnalysisKind::News, rating, digest);
    if source == NewsProvider::Yahoo {
        let latest = items
            .iter()
            .take(shown)
            .find(|item| item.published_at.is_some())
            .map_or_else(|| "N/A".to_string(), |item| item.date_str());
        result
            .with_key_metric("News items retrieved", shown.to_string())
            .with_key_metric("Latest Update", latest)
            .with_key_metric("Primary Source", items[0].publisher.clone())
    } else {
        result
            .with_key_metric("Source", source.display_name())
            .with_key_metric("Items", shown.to_string())
            .with_key_metric("Mode", "Search")
    }
}
