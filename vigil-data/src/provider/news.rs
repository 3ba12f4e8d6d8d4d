//! Multi-feed RSS headlines with keyword tagging.
//!
//! Three feeds (crypto, finance, geopolitics) are fetched independently,
//! the top entries of each are merged, tagged, sorted newest-first and
//! truncated. When every feed fails the caller gets the canned fallback
//! set with a leading alert row.

use std::io::Cursor;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use rss::Channel;
use tracing::warn;

use crate::error::DataError;
use crate::mock;
use crate::types::NewsItem;

/// Feed source definition
struct FeedSource {
    url: &'static str,
    category: &'static str,
    source_name: &'static str,
}

const RSS_FEEDS: [FeedSource; 3] = [
    FeedSource {
        url: "https://cointelegraph.com/rss",
        category: "Crypto",
        source_name: "CoinTelegraph",
    },
    FeedSource {
        url: "https://www.cnbc.com/id/10000664/device/rss/rss.html",
        category: "Finance",
        source_name: "CNBC Finance",
    },
    FeedSource {
        url: "http://feeds.bbci.co.uk/news/world/rss.xml",
        category: "Geopolitics",
        source_name: "BBC World",
    },
];

/// Entries taken from each feed before merging
const PER_FEED_LIMIT: usize = 5;
/// Titles shorter than this are treated as broken and skipped
const MIN_TITLE_LEN: usize = 15;

/// Fetch, merge and tag headlines across all feeds, newest first.
///
/// Always returns something renderable: the mock set stands in when every
/// feed is unreachable.
pub async fn fetch_headlines(limit: usize) -> Vec<NewsItem> {
    let mut items = Vec::new();

    for feed in &RSS_FEEDS {
        match fetch_feed(feed).await {
            Ok(mut feed_items) => items.append(&mut feed_items),
            Err(e) => warn!(source = feed.source_name, error = %e, "feed failed"),
        }
    }

    if items.is_empty() {
        return mock::headlines();
    }

    items
        .into_iter()
        .sorted_by(|a, b| b.time.cmp(&a.time))
        .take(limit)
        .collect()
}

async fn fetch_feed(feed: &FeedSource) -> Result<Vec<NewsItem>, DataError> {
    let client = reqwest::Client::new();
    let response = client
        .get(feed.url)
        .header("User-Agent", "vigil-tv")
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!("feed status {}", response.status())));
    }

    let bytes = response.bytes().await?;
    let channel = Channel::read_from(Cursor::new(bytes)).map_err(|e| DataError::Feed(e.to_string()))?;

    let now = Utc::now();
    let items = channel
        .items()
        .iter()
        .take(PER_FEED_LIMIT)
        .filter_map(|entry| {
            let title = entry.title()?.trim().to_string();
            if title.len() < MIN_TITLE_LEN {
                return None;
            }

            // Some feeds omit pubDate; fall back to "now"
            let time = entry
                .pub_date()
                .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or(now);

            Some(NewsItem {
                source: feed.source_name.to_string(),
                tags: smart_tags(&title, feed.category),
                title,
                link: entry.link().unwrap_or("#").to_string(),
                time,
            })
        })
        .collect();

    Ok(items)
}

/// Scan the title for priority keywords; fall back to the feed category.
fn smart_tags(title: &str, category_default: &str) -> Vec<String> {
    let t = title.to_lowercase();
    let mut tags = Vec::new();

    let any = |keywords: &[&str]| keywords.iter().any(|k| t.contains(k));

    if any(&["bitcoin", "btc", "satoshi", "etf", "halving"]) {
        tags.push("Bitcoin".to_string());
    }
    if any(&["gold", "silver", "commodity", "oil"]) {
        tags.push("Commodities".to_string());
    }
    if any(&["fed", "powell", "rate", "inflation", "cpi", "recession"]) {
        tags.push("Macro".to_string());
    }
    if any(&["war", "missile", "army", "treaty", "china", "russia"]) {
        tags.push("Conflict".to_string());
    }
    if any(&["sec", "gensler", "lawsuit", "ban", "regulation", "tax"]) {
        tags.push("Regulation".to_string());
    }

    if tags.is_empty() {
        tags.push(category_default.to_string());
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_tags_keyword_hits() {
        struct TestCase {
            title: &'static str,
            expected: Vec<&'static str>,
        }

        let tests = vec![
            TestCase {
                // TC0: single keyword
                title: "Bitcoin breaks above the halving range",
                expected: vec!["Bitcoin"],
            },
            TestCase {
                // TC1: multiple categories in one title
                title: "Fed rate decision rattles gold and oil markets",
                expected: vec!["Commodities", "Macro"],
            },
            TestCase {
                // TC2: no keywords, feed category wins
                title: "Parliament reconvenes after the summer recess",
                expected: vec!["Geopolitics"],
            },
            TestCase {
                // TC3: regulation keywords
                title: "SEC lawsuit targets exchange over unregistered listings",
                expected: vec!["Regulation"],
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let tags = smart_tags(test.title, "Geopolitics");
            assert_eq!(tags, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_smart_tags_case_insensitive() {
        assert_eq!(smart_tags("BITCOIN ETF APPROVED", "Crypto"), vec!["Bitcoin"]);
    }
}
