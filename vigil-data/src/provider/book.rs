//! Multi-exchange order-book fallback cascade.
//!
//! Cascade order: Kraken -> Coinbase -> Bitstamp. Each venue is stateless
//! and independent; the first parseable snapshot wins. When all three fail
//! (typically a cloud-IP block) the caller gets a synthetic book around the
//! last known price, marked `simulated` so the UI shows the warning banner.

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use crate::error::DataError;
use crate::mock;
use crate::types::{Level, OrderBook};

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Fetch an order book snapshot, trying each venue in order.
pub async fn fetch_order_book(limit: usize) -> Result<OrderBook, DataError> {
    match fetch_kraken_book(limit).await {
        Ok(book) => return Ok(book),
        Err(e) => warn!(venue = "kraken", error = %e, "order book failed"),
    }

    match fetch_coinbase_book().await {
        Ok(book) => return Ok(book),
        Err(e) => warn!(venue = "coinbase", error = %e, "order book failed"),
    }

    match fetch_bitstamp_book().await {
        Ok(book) => return Ok(book),
        Err(e) => warn!(venue = "bitstamp", error = %e, "order book failed"),
    }

    Err(DataError::ProvidersExhausted("order_book"))
}

/// Cascade with the mock fallback applied: always yields a renderable book.
pub async fn fetch_order_book_or_mock(last_price: f64, limit: usize) -> OrderBook {
    match fetch_order_book(limit).await {
        Ok(book) => book,
        Err(e) => {
            warn!(error = %e, "all order book venues failed, generating mock book");
            mock::order_book(last_price, limit.min(200))
        }
    }
}

async fn fetch_kraken_book(limit: usize) -> Result<OrderBook, DataError> {
    let url = format!(
        "https://api.kraken.com/0/public/Depth?pair=XBTUSD&count={}",
        limit.clamp(1, 500)
    );

    let payload = get_json(&url, "kraken").await?;

    if let Some(errors) = payload.get("error").and_then(|e| e.as_array()) {
        if !errors.is_empty() {
            return Err(DataError::Payload {
                provider: "kraken",
                detail: format!("{:?}", errors),
            });
        }
    }

    let sides = payload
        .get("result")
        .and_then(|r| r.as_object())
        .and_then(|result| result.iter().find(|(key, _)| *key != "last"))
        .map(|(_, value)| value)
        .ok_or_else(|| DataError::Payload {
            provider: "kraken",
            detail: "missing depth object".to_string(),
        })?;

    build_book("kraken", sides.get("bids"), sides.get("asks"))
}

async fn fetch_coinbase_book() -> Result<OrderBook, DataError> {
    let payload = get_json(
        "https://api.exchange.coinbase.com/products/BTC-USD/book?level=2",
        "coinbase",
    )
    .await?;

    build_book("coinbase", payload.get("bids"), payload.get("asks"))
}

async fn fetch_bitstamp_book() -> Result<OrderBook, DataError> {
    let payload = get_json("https://www.bitstamp.net/api/v2/order_book/btcusd/", "bitstamp").await?;

    build_book("bitstamp", payload.get("bids"), payload.get("asks"))
}

async fn get_json(url: &str, provider: &'static str) -> Result<Value, DataError> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .header("User-Agent", "vigil-tv")
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!("{} status {}", provider, response.status())));
    }

    response.json().await.map_err(|e| DataError::Payload {
        provider,
        detail: e.to_string(),
    })
}

fn build_book(
    venue: &str,
    bids: Option<&Value>,
    asks: Option<&Value>,
) -> Result<OrderBook, DataError> {
    let bids = parse_levels(bids);
    let asks = parse_levels(asks);

    if bids.is_empty() && asks.is_empty() {
        return Err(DataError::Payload {
            provider: "order_book",
            detail: format!("{} served an empty book", venue),
        });
    }

    Ok(OrderBook {
        venue: venue.to_string(),
        bids,
        asks,
        time: Utc::now(),
        simulated: false,
    })
}

/// Parse `[["price", "amount", ...], ...]` rows; unparseable rows are skipped.
fn parse_levels(side: Option<&Value>) -> Vec<Level> {
    let Some(rows) = side.and_then(|s| s.as_array()) else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let row = row.as_array()?;
            let price: Decimal = row.first()?.as_str()?.parse().ok()?;
            let amount: Decimal = row.get(1)?.as_str()?.parse().ok()?;
            Some(Level { price, amount })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels_skips_malformed_rows() {
        let side = serde_json::json!([
            ["37000.5", "1.25", 1700000000],
            ["garbage", "1.0"],
            ["36999.0", "0.5"]
        ]);

        let levels = parse_levels(Some(&side));
        assert_eq!(levels.len(), 2);
        assert!((levels[0].price_f64() - 37000.5).abs() < 1e-9);
        assert!((levels[1].amount_f64() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_levels_missing_side() {
        assert!(parse_levels(None).is_empty());
        assert!(parse_levels(Some(&serde_json::json!("not-an-array"))).is_empty());
    }

    #[test]
    fn test_build_book_rejects_empty() {
        let empty = serde_json::json!([]);
        let result = build_book("kraken", Some(&empty), Some(&empty));
        assert!(matches!(result, Err(DataError::Payload { .. })));
    }

    #[test]
    fn test_build_book_real_marker() {
        let bids = serde_json::json!([["37000.0", "1.0"]]);
        let asks = serde_json::json!([["37010.0", "2.0"]]);

        let book = build_book("bitstamp", Some(&bids), Some(&asks)).unwrap();
        assert!(!book.simulated);
        assert_eq!(book.venue, "bitstamp");
        assert_eq!(book.mid_price(), Some(37005.0));
    }
}
