//! Ticker resolution against regional exchange suffixes
//!
//! Bare symbols are probed against the priority regional exchange (NSE
//! India) with a single low-cost quote lookup. The probe is speculative:
//! any failure falls back to the original symbol, so resolution never
//! errors.

use crate::error::{AgentError, Result};
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Priority regional exchange suffix (National Stock Exchange of India)
const REGIONAL_SUFFIX: &str = ".NS";

/// Resolve a raw symbol to its canonical form
///
/// Symbols that already carry an exchange suffix are returned unchanged
/// (uppercased). Otherwise the regional candidate is probed once; a usable
/// last price accepts it, anything else keeps the bare symbol.
pub async fn resolve_ticker(raw: &str) -> String {
    let ticker = raw.trim().to_uppercase();
    if ticker.contains('.') {
        return ticker;
    }

    let candidate = format!("{ticker}{REGIONAL_SUFFIX}");
    match probe_last_price(&candidate).await {
        Ok(price) if price.is_finite() && price > 0.0 => {
            debug!(%ticker, %candidate, "Regional suffix probe succeeded");
            candidate
        }
        Ok(_) | Err(_) => ticker,
    }
}

/// Fetch the latest close for a symbol, as a cheap existence check
async fn probe_last_price(symbol: &str) -> Result<f64> {
    let provider = yahoo::YahooConnector::new()
        .map_err(|e| AgentError::YahooFinanceError(e.to_string()))?;

    let response = provider
        .get_latest_quotes(symbol, "1d")
        .await
        .map_err(|e| AgentError::YahooFinanceError(e.to_string()))?;

    let quote = response
        .last_quote()
        .map_err(|e| AgentError::YahooFinanceError(e.to_string()))?;

    Ok(quote.close)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_suffixed_symbol_returned_unchanged() {
        // No probe is attempted for suffixed symbols, so no network needed
        assert_eq!(resolve_ticker("RELIANCE.NS").await, "RELIANCE.NS");
        assert_eq!(resolve_ticker("shop.to").await, "SHOP.TO");
    }

    #[tokio::test]
    async fn test_symbol_is_normalized() {
        assert_eq!(resolve_ticker("  brk.b ").await, "BRK.B");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_bare_us_symbol_falls_back() {
        // AAPL.NS does not trade, so the probe fails and the bare symbol wins
        assert_eq!(resolve_ticker("AAPL").await, "AAPL");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_bare_indian_symbol_gets_suffix() {
        assert_eq!(resolve_ticker("TCS").await, "TCS.NS");
    }
}
