//! Yahoo Finance v8 chart API client
//!
//! Fetches daily OHLCV bars. Only the response fields this crate consumes
//! are modeled; bars with missing closes (market holidays and the like) are
//! skipped.

use crate::error::{AgentError, Result};
use chrono::NaiveDate;
use serde::Deserialize;

const CHART_API_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// One daily OHLCV bar
#[derive(Debug, Clone, Copy)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily history plus the quote currency from the chart metadata
#[derive(Debug, Clone)]
pub struct ChartData {
    pub currency: String,
    pub bars: Vec<Bar>,
}

/// Client for the chart endpoint
pub struct ChartClient {
    client: reqwest::Client,
}

impl ChartClient {
    /// Create a new chart client
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; StockAI/0.1)")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Fetch daily bars for a range such as "1mo", "6mo", "1y"
    pub async fn fetch_daily(&self, ticker: &str, range: &str) -> Result<ChartData> {
        let url = format!("{CHART_API_BASE}/{ticker}");

        let response = self
            .client
            .get(&url)
            .query(&[("interval", "1d"), ("range", range)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AgentError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body: ChartResponse = response
            .json()
            .await
            .map_err(|e| AgentError::YahooFinanceError(format!("Chart parse failed: {e}")))?;

        if let Some(error) = body.chart.error {
            return Err(AgentError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: error.description,
            });
        }

        let result = body
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| AgentError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "No results in chart response".to_string(),
            })?;

        let currency = result.meta.currency.unwrap_or_else(|| "USD".to_string());
        let quote = result.indicators.quote.into_iter().next().ok_or_else(|| {
            AgentError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "No quote data in chart response".to_string(),
            }
        })?;

        let mut bars: Vec<Bar> = result
            .timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, ts)| {
                // Skip bars without a close (holidays, halts)
                let close = quote.close.get(i).copied().flatten()?;
                let date = chrono::DateTime::from_timestamp(*ts, 0)?.date_naive();
                Some(Bar {
                    date,
                    open: quote.open.get(i).copied().flatten().unwrap_or(close),
                    high: quote.high.get(i).copied().flatten().unwrap_or(close),
                    low: quote.low.get(i).copied().flatten().unwrap_or(close),
                    close,
                    volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
                })
            })
            .collect();

        bars.sort_by_key(|bar| bar.date);

        if bars.is_empty() {
            return Err(AgentError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "Chart response contained no usable bars".to_string(),
            });
        }

        Ok(ChartData { currency, bars })
    }
}

impl Default for ChartClient {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal response structs (only what we need)

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_response_parsing() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {"currency": "INR"},
                    "timestamp": [1704067200, 1704153600],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, 101.5],
                            "high": [102.0, 103.0],
                            "low": [99.0, 100.5],
                            "close": [101.0, null],
                            "volume": [1000, 2000]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let body: ChartResponse = serde_json::from_str(json).unwrap();
        let result = &body.chart.result.unwrap()[0];
        assert_eq!(result.meta.currency.as_deref(), Some("INR"));
        assert_eq!(result.timestamp.len(), 2);
        // Second close is null and must deserialize as None
        assert_eq!(result.indicators.quote[0].close[1], None);
    }

    #[test]
    fn test_chart_error_parsing() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;
        let body: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(body.chart.error.unwrap().description.contains("No data found"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_daily() {
        let client = ChartClient::new();
        let data = client.fetch_daily("AAPL", "1mo").await.unwrap();
        assert!(!data.bars.is_empty());
        assert_eq!(data.currency, "USD");
    }
}
