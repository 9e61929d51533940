//! Yahoo Finance v10 quoteSummary API client
//!
//! Fetches the company snapshot and fundamental/risk statistics. Yahoo wraps
//! every numeric in a `{"raw": ..., "fmt": ...}` object; only the raw value
//! is consumed here, with absent values collapsing to zero at this boundary.

use crate::error::{AgentError, Result};
use serde::Deserialize;

const SUMMARY_API_BASE: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const SUMMARY_MODULES: &str = "price,summaryDetail,assetProfile,defaultKeyStatistics,financialData";

/// Client for the quoteSummary endpoint
pub struct SummaryClient {
    client: reqwest::Client,
}

impl SummaryClient {
    /// Create a new quoteSummary client
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; StockAI/0.1)")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Fetch the summary modules for a ticker
    pub async fn fetch(&self, ticker: &str) -> Result<CompanySummary> {
        let url = format!("{SUMMARY_API_BASE}/{ticker}");

        let response = self
            .client
            .get(&url)
            .query(&[("modules", SUMMARY_MODULES)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AgentError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body: SummaryResponse = response.json().await.map_err(|e| {
            AgentError::YahooFinanceError(format!("quoteSummary parse failed: {e}"))
        })?;

        body.quote_summary
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| AgentError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "No results in quoteSummary response".to_string(),
            })
    }
}

impl Default for SummaryClient {
    fn default() -> Self {
        Self::new()
    }
}

/// A Yahoo `{"raw": ...}` numeric wrapper
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawValue {
    pub raw: Option<f64>,
}

/// Unwrap an optional raw value, defaulting to zero
pub fn raw_or_zero(value: Option<RawValue>) -> f64 {
    value.and_then(|v| v.raw).unwrap_or(0.0)
}

// Minimal response structs (only what we need)

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    result: Option<Vec<CompanySummary>>,
}

/// Parsed quoteSummary modules; each module may be absent
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanySummary {
    pub price: Option<PriceModule>,
    pub summary_detail: Option<SummaryDetailModule>,
    pub asset_profile: Option<AssetProfileModule>,
    pub default_key_statistics: Option<KeyStatisticsModule>,
    pub financial_data: Option<FinancialDataModule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PriceModule {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub currency: Option<String>,
    pub regular_market_price: Option<RawValue>,
    pub regular_market_change_percent: Option<RawValue>,
    pub regular_market_volume: Option<RawValue>,
    pub market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SummaryDetailModule {
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<RawValue>,
    #[serde(rename = "dividendYield")]
    pub dividend_yield: Option<RawValue>,
    pub beta: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssetProfileModule {
    pub sector: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyStatisticsModule {
    pub peg_ratio: Option<RawValue>,
    pub price_to_book: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialDataModule {
    pub debt_to_equity: Option<RawValue>,
    pub return_on_equity: Option<RawValue>,
    pub profit_margins: Option<RawValue>,
    pub revenue_growth: Option<RawValue>,
    pub earnings_growth: Option<RawValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_extraction() {
        let value: RawValue = serde_json::from_str(r#"{"raw": 24.5, "fmt": "24.50"}"#).unwrap();
        assert_eq!(raw_or_zero(Some(value)), 24.5);
        assert_eq!(raw_or_zero(None), 0.0);
        assert_eq!(raw_or_zero(Some(RawValue { raw: None })), 0.0);
    }

    #[test]
    fn test_summary_response_parsing() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {
                        "shortName": "Apple Inc.",
                        "currency": "USD",
                        "regularMarketPrice": {"raw": 190.5, "fmt": "190.50"},
                        "regularMarketChangePercent": {"raw": 0.0123}
                    },
                    "summaryDetail": {
                        "trailingPE": {"raw": 29.8},
                        "beta": {"raw": 1.25}
                    },
                    "assetProfile": {"sector": "Technology", "industry": "Consumer Electronics"},
                    "financialData": {
                        "returnOnEquity": {"raw": 1.47},
                        "debtToEquity": {"raw": 176.3}
                    }
                }],
                "error": null
            }
        }"#;
        let body: SummaryResponse = serde_json::from_str(json).unwrap();
        let summary = body.quote_summary.result.unwrap().remove(0);

        let price = summary.price.unwrap();
        assert_eq!(price.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(raw_or_zero(price.regular_market_price), 190.5);

        let detail = summary.summary_detail.unwrap();
        assert_eq!(raw_or_zero(detail.trailing_pe), 29.8);
        assert_eq!(raw_or_zero(detail.beta), 1.25);

        // Absent module parses as None, not an error
        assert!(summary.default_key_statistics.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_summary() {
        let client = SummaryClient::new();
        let summary = client.fetch("AAPL").await.unwrap();
        assert!(summary.price.is_some());
    }
}
