//! News retrieval and normalization
//!
//! Raw items arrive in different field layouts depending on the provider:
//! flat (`title`/`link`/`url` at the top level) or nested under `content`
//! (newer Yahoo feed shape). Normalization reconciles both into
//! [`NewsItem`]s; items without a title are discarded.

pub mod providers;

pub use providers::{FirecrawlClient, SpiderClient, YahooNewsClient};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A normalized news item
#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub publisher: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl NewsItem {
    /// Display date for the digest
    pub fn date_str(&self) -> String {
        self.published_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "Date Unknown".to_string())
    }
}

/// Normalize a batch of raw provider items, dropping title-less ones
pub fn normalize_items(raw: &[Value]) -> Vec<NewsItem> {
    raw.iter().filter_map(normalize_item).collect()
}

fn normalize_item(value: &Value) -> Option<NewsItem> {
    let content = value.get("content");

    let title = value
        .get("title")
        .and_then(Value::as_str)
        .or_else(|| content?.get("title")?.as_str())?
        .to_string();
    if title.is_empty() {
        return None;
    }

    let publisher = value
        .get("publisher")
        .and_then(Value::as_str)
        .or_else(|| {
            content?
                .get("provider")?
                .get("displayName")?
                .as_str()
        })
        .unwrap_or("Unknown Source")
        .to_string();

    let link = value
        .get("link")
        .and_then(Value::as_str)
        .or_else(|| value.get("url").and_then(Value::as_str))
        .or_else(|| content?.get("canonicalUrl")?.get("url")?.as_str())
        .or_else(|| content?.get("clickThroughUrl")?.get("url")?.as_str())
        .map(str::to_string);

    Some(NewsItem {
        title,
        publisher,
        published_at: extract_timestamp(value),
        link,
    })
}

/// Pull a publish timestamp out of either raw shape
///
/// Top-level `providerPublishTime` is epoch seconds; the nested `pubDate` is
/// an ISO-8601 string. Malformed timestamps are swallowed and the item
/// proceeds without one.
fn extract_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let epoch = value
        .get("providerPublishTime")
        .and_then(Value::as_f64)
        .filter(|ts| *ts > 0.0);
    if let Some(seconds) = epoch {
        return DateTime::from_timestamp(seconds as i64, 0);
    }

    let pub_date = value.get("content")?.get("pubDate")?.as_str()?;
    DateTime::parse_from_rfc3339(pub_date)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Render normalized items into the numbered markdown digest
///
/// At most `limit` items are rendered; the returned count is the number
/// actually shown.
pub fn render_digest(
    ticker: &str,
    source_label: &str,
    items: &[NewsItem],
    limit: usize,
) -> (String, usize) {
    let mut digest = format!("Latest News Analysis for {ticker} (via {source_label}):\n\n");
    let mut shown = 0;
    for (i, item) in items.iter().take(limit).enumerate() {
        digest += &format!(
            "{}. **{}** | _{}_\n{}\n",
            i + 1,
            item.date_str(),
            item.publisher,
            item.title
        );
        if let Some(link) = &item.link {
            digest += &format!("[Read more]({link})\n\n");
        } else {
            digest += "\n";
        }
        shown += 1;
    }
    (digest, shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_item_normalization() {
        let raw = json!({
            "title": "Quarterly results beat estimates",
            "publisher": "Reuters",
            "providerPublishTime": 1706000000,
            "link": "https://example.com/a"
        });
        let item = normalize_item(&raw).unwrap();
        assert_eq!(item.title, "Quarterly results beat estimates");
        assert_eq!(item.publisher, "Reuters");
        assert!(item.published_at.is_some());
        assert_eq!(item.link.as_deref(), Some("https://example.com/a"));
    }

    #[test]
    fn test_nested_item_normalization() {
        let raw = json!({
            "content": {
                "title": "Shares slide on guidance cut",
                "provider": {"displayName": "Bloomberg"},
                "pubDate": "2026-01-23T21:46:00Z",
                "canonicalUrl": {"url": "https://example.com/b"}
            }
        });
        let item = normalize_item(&raw).unwrap();
        assert_eq!(item.publisher, "Bloomberg");
        assert_eq!(item.date_str(), "2026-01-23 21:46");
        assert_eq!(item.link.as_deref(), Some("https://example.com/b"));
    }

    #[test]
    fn test_click_through_url_fallback() {
        let raw = json!({
            "title": "t",
            "content": {"clickThroughUrl": {"url": "https://example.com/c"}}
        });
        let item = normalize_item(&raw).unwrap();
        assert_eq!(item.link.as_deref(), Some("https://example.com/c"));
    }

    #[test]
    fn test_titleless_item_discarded() {
        let items = normalize_items(&[
            json!({"publisher": "Reuters"}),
            json!({"content": {"pubDate": "2026-01-23T21:46:00Z"}}),
            json!({"title": "kept"}),
        ]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "kept");
        assert_eq!(items[0].publisher, "Unknown Source");
    }

    #[test]
    fn test_malformed_timestamp_swallowed() {
        let raw = json!({
            "title": "t",
            "content": {"pubDate": "yesterday-ish"}
        });
        let item = normalize_item(&raw).unwrap();
        assert!(item.published_at.is_none());
        assert_eq!(item.date_str(), "Date Unknown");
    }

    #[test]
    fn test_digest_numbering_and_cap() {
        let items: Vec<NewsItem> = (1..=10)
            .map(|i| NewsItem {
                title: format!("Headline {i}"),
                publisher: "Wire".to_string(),
                published_at: None,
                link: None,
            })
            .collect();
        let (digest, shown) = render_digest("AAPL", "Yahoo Finance", &items, 8);
        assert_eq!(shown, 8);
        assert!(digest.starts_with("Latest News Analysis for AAPL (via Yahoo Finance):"));
        assert!(digest.contains("8. **Date Unknown** | _Wire_\nHeadline 8"));
        assert!(!digest.contains("Headline 9"));
    }
}
