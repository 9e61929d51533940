//! News provider clients
//!
//! The keyed search providers are rate limited; the Yahoo feed is the
//! key-free default. All clients return raw `serde_json::Value` items so the
//! shared normalization layer can reconcile their differing layouts.

use crate::error::{AgentError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::{Value, json};
use std::num::NonZeroU32;
use std::sync::Arc;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const SEARCH_REQUESTS_PER_MINUTE: u32 = 60;
const SEARCH_RESULT_LIMIT: usize = 5;

fn search_rate_limiter() -> SharedRateLimiter {
    let quota =
        Quota::per_minute(NonZeroU32::new(SEARCH_REQUESTS_PER_MINUTE).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

fn provider_error(provider: &str, reason: impl ToString) -> AgentError {
    AgentError::NewsProviderFailure {
        provider: provider.to_string(),
        reason: reason.to_string(),
    }
}

/// Firecrawl search API client
pub struct FirecrawlClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl FirecrawlClient {
    /// Create a new Firecrawl client with rate limiting
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter: search_rate_limiter(),
        }
    }

    /// Search latest financial news for a ticker
    pub async fn search_news(&self, ticker: &str) -> Result<Vec<Value>> {
        self.rate_limiter.until_ready().await;

        let payload = json!({
            "query": format!("latest financial news {ticker} stock market"),
            "limit": SEARCH_RESULT_LIMIT,
            "pageOptions": {"onlyMainContent": true}
        });

        let response = self
            .client
            .post("https://api.firecrawl.dev/v0/search")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| provider_error("firecrawl", format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error("firecrawl", format!("HTTP {status}: {body}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| provider_error("firecrawl", format!("parse failed: {e}")))?;

        let items = body
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(items)
    }
}

/// Spider Cloud search API client
pub struct SpiderClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl SpiderClient {
    /// Create a new Spider Cloud client with rate limiting
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter: search_rate_limiter(),
        }
    }

    /// Search latest financial news for a ticker
    pub async fn search_news(&self, ticker: &str) -> Result<Vec<Value>> {
        self.rate_limiter.until_ready().await;

        let payload = json!({
            "search": format!("latest financial news {ticker}"),
            "limit": SEARCH_RESULT_LIMIT,
        });

        let response = self
            .client
            .post("https://api.spider.cloud/v1/search")
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| provider_error("spider", format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error("spider", format!("HTTP {status}: {body}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| provider_error("spider", format!("parse failed: {e}")))?;

        // Spider answers with either a bare list or a {"data": [...]} object
        Ok(spider_items(body))
    }
}

fn spider_items(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => map
            .remove("data")
            .and_then(|data| match data {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Yahoo Finance news feed client (key-free default provider)
pub struct YahooNewsClient {
    client: Client,
}

const YAHOO_NEWS_COUNT: usize = 10;

impl YahooNewsClient {
    /// Create a new Yahoo news client
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0 (compatible; StockAI/0.1)")
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Fetch the raw news feed for a ticker
    pub async fn fetch_news(&self, ticker: &str) -> Result<Vec<Value>> {
        let response = self
            .client
            .get("https://query1.finance.yahoo.com/v1/finance/search")
            .query(&[
                ("q", ticker),
                ("quotesCount", "0"),
                ("newsCount", &YAHOO_NEWS_COUNT.to_string()),
            ])
            .send()
            .await
            .map_err(|e| provider_error("yfinance", format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(provider_error(
                "yfinance",
                format!("HTTP {}", response.status()),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| provider_error("yfinance", format!("parse failed: {e}")))?;

        let items = body
            .get("news")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(items)
    }
}

impl Default for YahooNewsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spider_items_accepts_both_shapes() {
        let bare = json!([{"title": "a"}, {"title": "b"}]);
        assert_eq!(spider_items(bare).len(), 2);

        let wrapped = json!({"data": [{"title": "a"}]});
        assert_eq!(spider_items(wrapped).len(), 1);

        let unexpected = json!("nope");
        assert!(spider_items(unexpected).is_empty());
    }

    #[test]
    fn test_provider_error_carries_provider() {
        let err = provider_error("spider", "HTTP 500");
        assert!(err.to_string().contains("spider"));
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_yahoo_news_fetch() {
        let client = YahooNewsClient::new();
        let items = client.fetch_news("AAPL").await.unwrap();
        assert!(!items.is_empty());
    }
}
