//! Error types for the analysis agents

use thiserror::Error;

/// Agent-side errors
///
/// Agents never surface these to clients directly: every `analyze` call
/// produces a well-formed result, and errors collapse into the result's
/// `error` field at the latest possible point.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Metrics or price history fetch failed or returned empty
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// A news provider failed; callers fall back down the chain
    #[error("News provider {provider} failed: {reason}")]
    NewsProviderFailure { provider: String, reason: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    IndicatorError(String),

    /// Prompt template error
    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgentError::DataUnavailable {
            symbol: "AAPL".to_string(),
            reason: "No data found".to_string(),
        };
        assert_eq!(err.to_string(), "Data not available for AAPL: No data found");

        let err = AgentError::NewsProviderFailure {
            provider: "firecrawl".to_string(),
            reason: "HTTP 500".to_string(),
        };
        assert!(err.to_string().contains("firecrawl"));
    }
}
