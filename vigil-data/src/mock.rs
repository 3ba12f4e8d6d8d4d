//! Synthetic fallbacks used when every live provider has failed.
//!
//! Fabricated data always carries an explicit simulation marker so the UI
//! can warn the viewer instead of silently showing invented numbers.

use chrono::Utc;
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::types::{DerivativesSnapshot, Level, NewsItem, OrderBook};

/// Static realistic derivatives figures shown when the venues are blocked.
pub fn derivatives() -> DerivativesSnapshot {
    DerivativesSnapshot {
        funding_rate_pct: 0.0102,
        open_interest_billions: 19.45,
        oi_change_pct: 1.25,
        put_call_ratio: 0.75,
        simulated: true,
    }
}

/// Generate a plausible order book around the last known price.
///
/// Sizes decay exponentially away from the mid with multiplicative jitter,
/// which is roughly how resting liquidity looks on the real venues.
pub fn order_book(last_price: f64, levels_per_side: usize) -> OrderBook {
    let mut rng = rand::rng();
    let mid = if last_price > 0.0 { last_price } else { 60_000.0 };
    let step = (mid * 0.0001).max(0.5);

    let mut bids = Vec::with_capacity(levels_per_side);
    let mut asks = Vec::with_capacity(levels_per_side);

    for i in 0..levels_per_side {
        let offset = step * (i + 1) as f64;
        let decay = (-(i as f64) / 80.0).exp();
        let bid_amount = rng.random_range(0.05..2.5) * decay;
        let ask_amount = rng.random_range(0.05..2.5) * decay;

        bids.push(level(mid - offset, bid_amount));
        asks.push(level(mid + offset, ask_amount));
    }

    OrderBook {
        venue: "mock".to_string(),
        bids,
        asks,
        time: Utc::now(),
        simulated: true,
    }
}

fn level(price: f64, amount: f64) -> Level {
    Level {
        price: Decimal::from_f64(price).unwrap_or_default(),
        amount: Decimal::from_f64(amount).unwrap_or_default(),
    }
}

/// Canned headlines shown when every feed is unreachable.
///
/// The first row tells the viewer the feeds are down.
pub fn headlines() -> Vec<NewsItem> {
    let now = Utc::now();
    let item = |secs_ago: i64, source: &str, title: &str, tags: &[&str]| NewsItem {
        source: source.to_string(),
        title: title.to_string(),
        link: "#".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        time: now - chrono::Duration::seconds(secs_ago),
    };

    vec![
        item(
            0,
            "System",
            "Live feeds unreachable - displaying cached data",
            &["Alert"],
        ),
        item(
            100,
            "CoinDesk",
            "Bitcoin reclaims $96k as institutional outflows stabilize",
            &["Bitcoin", "Market"],
        ),
        item(
            200,
            "CNBC",
            "Fed signals \"higher for longer\" rates amid sticky inflation data",
            &["Macro", "Finance"],
        ),
        item(
            300,
            "Reuters",
            "Gold hits new highs as central banks increase reserves",
            &["Commodities"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_book_shape() {
        let book = order_book(65_000.0, 100);

        assert!(book.simulated);
        assert_eq!(book.bids.len(), 100);
        assert_eq!(book.asks.len(), 100);

        // Bids below mid, asks above, both sorted best-first
        let best_bid = book.best_bid().unwrap();
        let best_ask = book.best_ask().unwrap();
        assert!(best_bid < 65_000.0);
        assert!(best_ask > 65_000.0);
        assert!(best_bid < best_ask);

        for pair in book.bids.windows(2) {
            assert!(pair[0].price_f64() > pair[1].price_f64());
        }
        for pair in book.asks.windows(2) {
            assert!(pair[0].price_f64() < pair[1].price_f64());
        }
    }

    #[test]
    fn test_mock_book_zero_last_price() {
        // A dashboard that never saw a real price still gets a usable book
        let book = order_book(0.0, 10);
        assert!(book.mid_price().unwrap() > 0.0);
    }

    #[test]
    fn test_mock_headlines_lead_with_alert() {
        let news = headlines();
        assert!(news.len() >= 4);
        assert_eq!(news[0].tags, vec!["Alert".to_string()]);
    }

    #[test]
    fn test_mock_derivatives_marked_simulated() {
        assert!(derivatives().simulated);
    }
}
