/// Core data types shared by all providers.
///
/// Providers normalise whatever their venue serves into these shapes so the
/// analytics and UI layers never see venue-specific payloads.
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Candle {
    /// Bar open time
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Close-only sample for long-horizon series (power-law input, hash rate).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PricePoint {
    pub time: DateTime<Utc>,
    pub close: f64,
}

/// Price/quantity level in an order book.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Level {
    /// Price level
    pub price: Decimal,
    /// Quantity resting at this level
    pub amount: Decimal,
}

impl Level {
    /// Convert price to f64 for calculations
    pub fn price_f64(&self) -> f64 {
        self.price.to_string().parse().unwrap_or(0.0)
    }

    /// Convert amount to f64 for calculations
    pub fn amount_f64(&self) -> f64 {
        self.amount.to_string().parse().unwrap_or(0.0)
    }
}

/// Aggregated order book snapshot from one venue.
///
/// `simulated` marks books fabricated by the mock fallback after every venue
/// in the cascade failed - the UI must surface that to the viewer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderBook {
    /// Venue that served the snapshot (or "mock")
    pub venue: String,
    /// Buy side, best bid first
    pub bids: Vec<Level>,
    /// Sell side, best ask first
    pub asks: Vec<Level>,
    /// Snapshot time
    pub time: DateTime<Utc>,
    /// True when the book was synthesised rather than fetched
    pub simulated: bool,
}

impl OrderBook {
    /// Best bid price, if the side is non-empty.
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(Level::price_f64)
    }

    /// Best ask price, if the side is non-empty.
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(Level::price_f64)
    }

    /// Mid price between best bid and best ask.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    /// Bid-ask spread in quote currency.
    pub fn spread(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }
}

/// Fear & Greed index reading.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FearGreed {
    /// 0 (extreme fear) to 100 (extreme greed)
    pub value: u8,
    /// Human classification served alongside the value
    pub classification: String,
}

impl FearGreed {
    /// Neutral reading used when the index is unreachable.
    pub fn neutral() -> Self {
        Self {
            value: 50,
            classification: "Neutral".to_string(),
        }
    }
}

/// Derivatives metrics snapshot.
///
/// Each leg is best-effort; `simulated` is set when the static fallback
/// values had to stand in for live data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DerivativesSnapshot {
    /// Perpetual funding rate, percent per interval
    pub funding_rate_pct: f64,
    /// Open interest notional, billions of USD
    pub open_interest_billions: f64,
    /// 24h open interest / price change proxy, percent
    pub oi_change_pct: f64,
    /// Put volume / call volume
    pub put_call_ratio: f64,
    pub simulated: bool,
}

/// Spot-ETF proxy snapshot (price, relative volume, daily change).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EtfSnapshot {
    pub symbol: String,
    pub price: f64,
    /// Last session volume / 30-session average volume
    pub rvol: f64,
    /// Fractional change vs the previous close
    pub change: f64,
}

/// One network hash-rate sample as served by the charts endpoint.
///
/// `raw / 1e6` yields EH/s.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct HashrateSample {
    pub time: DateTime<Utc>,
    pub raw: f64,
}

impl HashrateSample {
    /// Hash rate in exahashes per second.
    pub fn ehs(&self) -> f64 {
        self.raw / 1_000_000.0
    }
}

/// A tagged headline from one of the configured feeds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    pub source: String,
    pub title: String,
    pub link: String,
    pub tags: Vec<String>,
    pub time: DateTime<Utc>,
}

impl NewsItem {
    /// First tag, used by the header ticker.
    pub fn lead_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or("NEWS")
    }
}

/// Macro assets tracked alongside Bitcoin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MacroAsset {
    Bitcoin,
    Sp500,
    Gold,
    DollarIndex,
}

impl MacroAsset {
    pub const ALL: [MacroAsset; 4] = [
        MacroAsset::Bitcoin,
        MacroAsset::Sp500,
        MacroAsset::Gold,
        MacroAsset::DollarIndex,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MacroAsset::Bitcoin => "Bitcoin",
            MacroAsset::Sp500 => "S&P 500",
            MacroAsset::Gold => "Gold",
            MacroAsset::DollarIndex => "DXY (Dollar)",
        }
    }
}

/// Daily closes for one macro asset.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MacroSeries {
    pub asset: MacroAsset,
    pub points: Vec<PricePoint>,
}

impl MacroSeries {
    /// Latest close, if any samples were fetched.
    pub fn latest(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn level(price: f64, amount: f64) -> Level {
        Level {
            price: Decimal::from_f64(price).unwrap(),
            amount: Decimal::from_f64(amount).unwrap(),
        }
    }

    #[test]
    fn test_order_book_calculations() {
        let book = OrderBook {
            venue: "kraken".to_string(),
            bids: vec![level(100.0, 1.5), level(99.5, 2.0)],
            asks: vec![level(100.5, 1.0), level(101.0, 3.0)],
            time: Utc::now(),
            simulated: false,
        };

        assert_eq!(book.best_bid(), Some(100.0));
        assert_eq!(book.best_ask(), Some(100.5));
        assert_eq!(book.mid_price(), Some(100.25));
        assert!((book.spread().unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_order_book_empty_sides() {
        let book = OrderBook {
            venue: "mock".to_string(),
            bids: vec![],
            asks: vec![level(100.5, 1.0)],
            time: Utc::now(),
            simulated: true,
        };

        assert_eq!(book.best_bid(), None);
        assert_eq!(book.mid_price(), None);
        assert_eq!(book.spread(), None);
    }

    #[test]
    fn test_hashrate_unit_conversion() {
        let sample = HashrateSample {
            time: Utc::now(),
            raw: 650_000_000.0,
        };
        assert!((sample.ehs() - 650.0).abs() < 1e-9);
    }

    #[test]
    fn test_news_lead_tag_fallback() {
        let item = NewsItem {
            source: "CoinTelegraph".to_string(),
            title: "Bitcoin reclaims the range high".to_string(),
            link: "#".to_string(),
            tags: vec![],
            time: Utc::now(),
        };
        assert_eq!(item.lead_tag(), "NEWS");
    }
}
