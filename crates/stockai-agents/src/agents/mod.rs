//! Analysis agents
//!
//! Each agent produces one [`crate::result::AnalysisResult`] for a ticker
//! from its own analytical perspective. Agents are stateless and re-created
//! per request; the optional LLM overlay replaces the deterministic summary
//! only when the gateway reports success.

pub mod advisor;
pub mod fundamental;
pub mod news;
pub mod risk;
pub mod sentiment;
pub mod technical;

pub use advisor::AdvisorAgent;
pub use fundamental::FundamentalAgent;
pub use news::NewsAgent;
pub use risk::RiskAgent;
pub use sentiment::SentimentAgent;
pub use technical::TechnicalAgent;

use serde::Serialize;

/// Error text surfaced when an agent's metrics fetch fails
pub(crate) const DATA_UNAVAILABLE: &str = "Could not fetch data";

/// Round to two decimal places for display parity
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Display a number rounded to two decimals, without trailing zeros
pub(crate) fn fmt_num(x: f64) -> String {
    format!("{}", round2(x))
}

/// Display a fractional value as a percentage
pub(crate) fn fmt_fraction_percent(fraction: f64) -> String {
    format!("{}%", round2(fraction * 100.0))
}

/// Display an already-percent value with its sign
pub(crate) fn fmt_percent(percent: f64) -> String {
    format!("{}%", round2(percent))
}

/// Display a currency amount
pub(crate) fn fmt_dollars(x: f64) -> String {
    format!("${}", round2(x))
}

/// Metrics bundle as pretty JSON for prompt injection
pub(crate) fn metrics_json<T: Serialize>(metrics: &T) -> String {
    serde_json::to_string_pretty(metrics).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(fmt_num(25.304), "25.3");
        assert_eq!(fmt_fraction_percent(0.1547), "15.47%");
        assert_eq!(fmt_percent(-12.5), "-12.5%");
        assert_eq!(fmt_dollars(190.5), "$190.5");
    }
}
