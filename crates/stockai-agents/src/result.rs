//! Analysis result types
//!
//! Every agent call produces exactly one [`AnalysisResult`]; a result carries
//! either a rating plus summary or an error message, never both.

use crate::market::PriceSeries;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// The analytical perspective a result was produced from
///
/// `Other` only appears on the placeholder result for an unrecognized
/// request kind, echoing the raw string back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum AnalysisKind {
    Fundamental,
    Technical,
    Risk,
    Sentiment,
    News,
    Advisor,
    #[serde(untagged)]
    Other(String),
}

impl AnalysisKind {
    /// Parse a client-supplied kind, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fundamental" => Some(Self::Fundamental),
            "technical" => Some(Self::Technical),
            "risk" => Some(Self::Risk),
            "sentiment" => Some(Self::Sentiment),
            "news" => Some(Self::News),
            "advisor" => Some(Self::Advisor),
            _ => None,
        }
    }
}

/// Closed rating vocabulary across all agents
///
/// Each agent emits only the subset relevant to its domain; the advisor emits
/// `Bullish`/`Bearish`/`Hold`. Wire strings match the client contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rating {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Sell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
    Positive,
    Neutral,
    Negative,
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "Moderate Risk")]
    ModerateRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
    Informational,
    Bullish,
    Bearish,
    #[serde(rename = "High Activity")]
    HighActivity,
    #[serde(rename = "Moderate Activity")]
    ModerateActivity,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl Rating {
    /// Display string, identical to the wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongBuy => "Strong Buy",
            Self::Buy => "Buy",
            Self::Hold => "Hold",
            Self::Sell => "Sell",
            Self::StrongSell => "Strong Sell",
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::LowRisk => "Low Risk",
            Self::ModerateRisk => "Moderate Risk",
            Self::HighRisk => "High Risk",
            Self::Informational => "Informational",
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::HighActivity => "High Activity",
            Self::ModerateActivity => "Moderate Activity",
            Self::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered name -> display-value mapping
///
/// Values are pre-formatted for display (percent signs, currency symbols);
/// raw numerics never appear here. Serializes as a JSON object in insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct KeyMetrics(Vec<(String, String)>);

impl KeyMetrics {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a metric
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Look up a metric by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of metrics
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl Serialize for KeyMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Success or failure payload of a result
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    /// The agent produced a rating and summary
    Report { rating: Rating, summary: String },
    /// The agent could not produce an analysis
    Error { error: String },
}

/// One agent's complete answer for a ticker
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub ticker: String,
    #[serde(rename = "type")]
    pub kind: AnalysisKind,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
    #[serde(skip_serializing_if = "KeyMetrics::is_empty")]
    pub key_metrics: KeyMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<PriceSeries>,
}

impl AnalysisResult {
    /// Create a successful result
    pub fn report(
        ticker: impl Into<String>,
        kind: AnalysisKind,
        rating: Rating,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            kind,
            outcome: AnalysisOutcome::Report {
                rating,
                summary: summary.into(),
            },
            key_metrics: KeyMetrics::new(),
            chart_data: None,
        }
    }

    /// Create an error result
    pub fn failure(
        ticker: impl Into<String>,
        kind: AnalysisKind,
        error: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            kind,
            outcome: AnalysisOutcome::Error {
                error: error.into(),
            },
            key_metrics: KeyMetrics::new(),
            chart_data: None,
        }
    }

    /// Append a key metric
    pub fn with_key_metric(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.key_metrics.push(name, value);
        self
    }

    /// Attach chart data
    pub fn with_chart_data(mut self, series: PriceSeries) -> Self {
        self.chart_data = Some(series);
        self
    }

    /// The rating, if this is a successful result
    pub fn rating(&self) -> Option<Rating> {
        match &self.outcome {
            AnalysisOutcome::Report { rating, .. } => Some(*rating),
            AnalysisOutcome::Error { .. } => None,
        }
    }

    /// The summary text, if this is a successful result
    pub fn summary(&self) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Report { summary, .. } => Some(summary),
            AnalysisOutcome::Error { .. } => None,
        }
    }

    /// The error text, if the agent failed
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Report { .. } => None,
            AnalysisOutcome::Error { error } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(AnalysisKind::parse("Fundamental"), Some(AnalysisKind::Fundamental));
        assert_eq!(AnalysisKind::parse("ADVISOR"), Some(AnalysisKind::Advisor));
        assert_eq!(AnalysisKind::parse("astrology"), None);
    }

    #[test]
    fn test_other_kind_echoes_raw_string() {
        let kind = AnalysisKind::Other("Astrology".to_string());
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"Astrology\"");
    }

    #[test]
    fn test_rating_wire_strings() {
        assert_eq!(Rating::StrongBuy.to_string(), "Strong Buy");
        assert_eq!(Rating::NotAvailable.to_string(), "N/A");
        assert_eq!(
            serde_json::to_string(&Rating::HighActivity).unwrap(),
            "\"High Activity\""
        );
    }

    #[test]
    fn test_key_metrics_preserve_insertion_order() {
        let mut metrics = KeyMetrics::new();
        metrics.push("P/E Ratio", "24.5");
        metrics.push("ROE", "18.2%");
        metrics.push("Debt/Equity", "1.1");

        let json = serde_json::to_string(&metrics).unwrap();
        assert_eq!(
            json,
            r#"{"P/E Ratio":"24.5","ROE":"18.2%","Debt/Equity":"1.1"}"#
        );
        assert_eq!(metrics.get("ROE"), Some("18.2%"));
    }

    #[test]
    fn test_result_is_report_xor_error() {
        let report = AnalysisResult::report("AAPL", AnalysisKind::Fundamental, Rating::Buy, "ok");
        assert_eq!(report.rating(), Some(Rating::Buy));
        assert!(report.error().is_none());

        let failed = AnalysisResult::failure("AAPL", AnalysisKind::Risk, "Could not fetch data");
        assert!(failed.rating().is_none());
        assert_eq!(failed.error(), Some("Could not fetch data"));

        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("\"error\""));
        assert!(!json.contains("\"rating\""));
        assert!(!json.contains("key_metrics"));
    }

    #[test]
    fn test_result_serialization_shape() {
        let result = AnalysisResult::report("TCS.NS", AnalysisKind::Technical, Rating::Hold, "flat")
            .with_key_metric("Current Price", "$3500.1");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ticker"], "TCS.NS");
        assert_eq!(json["type"], "Technical");
        assert_eq!(json["rating"], "Hold");
        assert_eq!(json["key_metrics"]["Current Price"], "$3500.1");
    }
}
