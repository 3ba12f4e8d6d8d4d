//! Daily OHLCV history with a cascading venue fallback.
//!
//! Cascade order: Binance -> Kraken -> Coinbase. First venue to answer with
//! a parseable payload wins; each failure is logged and the next venue is
//! tried. Long-horizon close-only history (the power-law input) comes from
//! CoinGecko, falling back to whatever the daily cascade can supply.

use chrono::DateTime;
use serde::Deserialize;
use tracing::warn;

use crate::error::DataError;
use crate::types::{Candle, PricePoint};

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Binance kline response row
#[derive(Debug, Deserialize)]
struct BinanceKline(
    i64,    // 0: Open time
    String, // 1: Open
    String, // 2: High
    String, // 3: Low
    String, // 4: Close
    String, // 5: Volume
    i64,    // 6: Close time
    String, // 7: Quote asset volume
    i64,    // 8: Number of trades
    String, // 9: Taker buy base asset volume
    String, // 10: Taker buy quote asset volume
    String, // 11: Ignore
);

/// Coinbase candle row: [time, low, high, open, close, volume], newest first
#[derive(Debug, Deserialize)]
struct CoinbaseCandle(f64, f64, f64, f64, f64, f64);

/// CoinGecko market_chart payload
#[derive(Debug, Deserialize)]
struct GeckoMarketChart {
    prices: Vec<[f64; 2]>,
}

/// Fetch up to `days` daily bars, trying each venue in order.
pub async fn fetch_daily_history(days: usize) -> Result<Vec<Candle>, DataError> {
    match fetch_binance_daily(days).await {
        Ok(candles) if !candles.is_empty() => return Ok(candles),
        Ok(_) => warn!(venue = "binance", "daily history empty"),
        Err(e) => warn!(venue = "binance", error = %e, "daily history failed"),
    }

    match fetch_kraken_daily().await {
        Ok(candles) if !candles.is_empty() => return Ok(candles),
        Ok(_) => warn!(venue = "kraken", "daily history empty"),
        Err(e) => warn!(venue = "kraken", error = %e, "daily history failed"),
    }

    match fetch_coinbase_daily().await {
        Ok(candles) if !candles.is_empty() => return Ok(candles),
        Ok(_) => warn!(venue = "coinbase", "daily history empty"),
        Err(e) => warn!(venue = "coinbase", error = %e, "daily history failed"),
    }

    Err(DataError::ProvidersExhausted("daily_history"))
}

/// Fetch the max-range close-only series for valuation charts.
///
/// Falls back to the daily cascade when CoinGecko is unreachable, which
/// shortens the corridor but keeps the panel alive.
pub async fn fetch_full_history() -> Result<Vec<PricePoint>, DataError> {
    match fetch_gecko_full_history().await {
        Ok(points) if points.len() > 365 => return Ok(points),
        Ok(points) => warn!(
            venue = "coingecko",
            samples = points.len(),
            "full history too short, falling back to daily cascade"
        ),
        Err(e) => warn!(venue = "coingecko", error = %e, "full history failed"),
    }

    let candles = fetch_daily_history(1000).await?;
    Ok(candles
        .into_iter()
        .map(|c| PricePoint {
            time: c.time,
            close: c.close,
        })
        .collect())
}

async fn fetch_binance_daily(days: usize) -> Result<Vec<Candle>, DataError> {
    let limit = days.clamp(1, 1000);
    let url = format!(
        "https://api.binance.com/api/v3/klines?symbol=BTCUSDT&interval=1d&limit={}",
        limit
    );

    let client = reqwest::Client::new();
    let response = client.get(&url).timeout(REQUEST_TIMEOUT).send().await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!("binance status {}", response.status())));
    }

    let klines: Vec<BinanceKline> = response.json().await.map_err(|e| DataError::Payload {
        provider: "binance",
        detail: e.to_string(),
    })?;

    Ok(parse_binance_klines(klines))
}

fn parse_binance_klines(klines: Vec<BinanceKline>) -> Vec<Candle> {
    klines
        .into_iter()
        .filter_map(|k| {
            let time = DateTime::from_timestamp_millis(k.0)?;
            Some(Candle {
                time,
                open: k.1.parse().ok()?,
                high: k.2.parse().ok()?,
                low: k.3.parse().ok()?,
                close: k.4.parse().ok()?,
                volume: k.5.parse().ok()?,
            })
        })
        .collect()
}

async fn fetch_kraken_daily() -> Result<Vec<Candle>, DataError> {
    let url = "https://api.kraken.com/0/public/OHLC?pair=XBTUSD&interval=1440";

    let client = reqwest::Client::new();
    let response = client.get(url).timeout(REQUEST_TIMEOUT).send().await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!("kraken status {}", response.status())));
    }

    let payload: serde_json::Value = response.json().await.map_err(|e| DataError::Payload {
        provider: "kraken",
        detail: e.to_string(),
    })?;

    parse_kraken_ohlc(&payload)
}

fn parse_kraken_ohlc(payload: &serde_json::Value) -> Result<Vec<Candle>, DataError> {
    if let Some(errors) = payload.get("error").and_then(|e| e.as_array()) {
        if !errors.is_empty() {
            return Err(DataError::Payload {
                provider: "kraken",
                detail: format!("{:?}", errors),
            });
        }
    }

    let result = payload
        .get("result")
        .and_then(|r| r.as_object())
        .ok_or_else(|| DataError::Payload {
            provider: "kraken",
            detail: "missing result object".to_string(),
        })?;

    // The pair key varies ("XXBTZUSD" vs "XBTUSD"); take the first array value
    let rows = result
        .iter()
        .find_map(|(key, value)| (key != "last").then(|| value.as_array()).flatten())
        .ok_or_else(|| DataError::Payload {
            provider: "kraken",
            detail: "missing OHLC rows".to_string(),
        })?;

    let candles = rows
        .iter()
        .filter_map(|row| {
            let row = row.as_array()?;
            let time = DateTime::from_timestamp(row.first()?.as_i64()?, 0)?;
            let num = |i: usize| -> Option<f64> { row.get(i)?.as_str()?.parse().ok() };
            Some(Candle {
                time,
                open: num(1)?,
                high: num(2)?,
                low: num(3)?,
                close: num(4)?,
                volume: num(6)?,
            })
        })
        .collect();

    Ok(candles)
}

async fn fetch_coinbase_daily() -> Result<Vec<Candle>, DataError> {
    let url = "https://api.exchange.coinbase.com/products/BTC-USD/candles?granularity=86400";

    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .header("User-Agent", "vigil-tv")
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!("coinbase status {}", response.status())));
    }

    let rows: Vec<CoinbaseCandle> = response.json().await.map_err(|e| DataError::Payload {
        provider: "coinbase",
        detail: e.to_string(),
    })?;

    Ok(parse_coinbase_candles(rows))
}

fn parse_coinbase_candles(rows: Vec<CoinbaseCandle>) -> Vec<Candle> {
    // Coinbase serves newest-first; normalise to ascending time
    let mut candles: Vec<Candle> = rows
        .into_iter()
        .filter_map(|row| {
            let time = DateTime::from_timestamp(row.0 as i64, 0)?;
            Some(Candle {
                time,
                open: row.3,
                high: row.2,
                low: row.1,
                close: row.4,
                volume: row.5,
            })
        })
        .collect();
    candles.sort_by_key(|c| c.time);
    candles
}

async fn fetch_gecko_full_history() -> Result<Vec<PricePoint>, DataError> {
    let url =
        "https://api.coingecko.com/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days=max&interval=daily";

    let client = reqwest::Client::new();
    let response = client.get(url).timeout(REQUEST_TIMEOUT).send().await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!("coingecko status {}", response.status())));
    }

    let chart: GeckoMarketChart = response.json().await.map_err(|e| DataError::Payload {
        provider: "coingecko",
        detail: e.to_string(),
    })?;

    Ok(chart
        .prices
        .into_iter()
        .filter_map(|[ms, price]| {
            let time = DateTime::from_timestamp_millis(ms as i64)?;
            (price > 0.0).then_some(PricePoint { time, close: price })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binance_klines_skips_bad_rows() {
        let rows = vec![
            BinanceKline(
                1_700_000_000_000,
                "37000.1".into(),
                "37500.0".into(),
                "36800.5".into(),
                "37200.9".into(),
                "12345.6".into(),
                1_700_086_399_999,
                "0".into(),
                100,
                "0".into(),
                "0".into(),
                "0".into(),
            ),
            BinanceKline(
                1_700_086_400_000,
                "not-a-number".into(),
                "0".into(),
                "0".into(),
                "0".into(),
                "0".into(),
                0,
                "0".into(),
                0,
                "0".into(),
                "0".into(),
                "0".into(),
            ),
        ];

        let candles = parse_binance_klines(rows);
        assert_eq!(candles.len(), 1);
        assert!((candles[0].close - 37200.9).abs() < 1e-9);
    }

    #[test]
    fn test_parse_kraken_ohlc() {
        let payload = serde_json::json!({
            "error": [],
            "result": {
                "XXBTZUSD": [
                    [1700000000, "37000.1", "37500.0", "36800.5", "37200.9", "37100.0", "123.45", 999],
                    [1700086400, "37200.9", "37900.0", "37100.0", "37800.0", "37500.0", "98.76", 888]
                ],
                "last": 1700086400
            }
        });

        let candles = parse_kraken_ohlc(&payload).unwrap();
        assert_eq!(candles.len(), 2);
        assert!((candles[0].open - 37000.1).abs() < 1e-9);
        assert!((candles[1].volume - 98.76).abs() < 1e-9);
    }

    #[test]
    fn test_parse_kraken_error_payload() {
        let payload = serde_json::json!({
            "error": ["EGeneral:Too many requests"],
            "result": {}
        });

        assert!(matches!(
            parse_kraken_ohlc(&payload),
            Err(DataError::Payload { provider: "kraken", .. })
        ));
    }

    #[test]
    fn test_parse_coinbase_candles_reorders_ascending() {
        let rows = vec![
            CoinbaseCandle(1_700_086_400.0, 37100.0, 37900.0, 37200.9, 37800.0, 98.76),
            CoinbaseCandle(1_700_000_000.0, 36800.5, 37500.0, 37000.1, 37200.9, 123.45),
        ];

        let candles = parse_coinbase_candles(rows);
        assert_eq!(candles.len(), 2);
        assert!(candles[0].time < candles[1].time);
        assert!((candles[0].open - 37000.1).abs() < 1e-9);
        assert!((candles[1].high - 37900.0).abs() < 1e-9);
    }
}
