//! Macro index closes (Bitcoin, S&P 500, gold, dollar index).
//!
//! Served by a Yahoo-compatible chart endpoint. Each asset is fetched
//! independently and a failed asset is skipped, never fatal: the macro
//! panel renders whatever subset arrived.

use chrono::DateTime;
use serde_json::Value;
use tracing::warn;

use crate::error::DataError;
use crate::types::{MacroAsset, MacroSeries, PricePoint};

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

fn chart_symbol(asset: MacroAsset) -> &'static str {
    match asset {
        MacroAsset::Bitcoin => "BTC-USD",
        MacroAsset::Sp500 => "%5EGSPC",
        MacroAsset::Gold => "GC%3DF",
        MacroAsset::DollarIndex => "DX-Y.NYB",
    }
}

/// Fetch daily closes for all macro assets over the given Yahoo range
/// (e.g. "6mo", "1y"). Assets that fail are skipped.
pub async fn fetch_macro_series(range: &str) -> Vec<MacroSeries> {
    let mut out = Vec::with_capacity(MacroAsset::ALL.len());

    for asset in MacroAsset::ALL {
        match fetch_asset(asset, range).await {
            Ok(points) if !points.is_empty() => out.push(MacroSeries { asset, points }),
            Ok(_) => warn!(asset = asset.label(), "macro series empty"),
            Err(e) => warn!(asset = asset.label(), error = %e, "macro series failed"),
        }
    }

    out
}

/// Fetch one symbol's daily chart and return `(closes, volumes)` aligned by
/// sample. Used by the macro panel and the ETF snapshot.
pub async fn fetch_chart(
    symbol: &str,
    range: &str,
) -> Result<(Vec<PricePoint>, Vec<f64>), DataError> {
    let url = format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{}?range={}&interval=1d",
        symbol, range
    );

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .header("User-Agent", "vigil-tv")
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!("chart status {}", response.status())));
    }

    let payload: Value = response.json().await.map_err(|e| DataError::Payload {
        provider: "chart",
        detail: e.to_string(),
    })?;

    parse_chart(&payload)
}

async fn fetch_asset(asset: MacroAsset, range: &str) -> Result<Vec<PricePoint>, DataError> {
    let (points, _) = fetch_chart(chart_symbol(asset), range).await?;
    Ok(points)
}

/// Walk the chart payload: `chart.result[0].timestamp[]` plus
/// `indicators.quote[0].close[]` / `.volume[]`. Null closes are
/// forward-filled; leading nulls are dropped.
fn parse_chart(payload: &Value) -> Result<(Vec<PricePoint>, Vec<f64>), DataError> {
    let result = payload
        .pointer("/chart/result/0")
        .ok_or_else(|| payload_err("missing chart result"))?;

    let timestamps = result
        .get("timestamp")
        .and_then(|t| t.as_array())
        .ok_or_else(|| payload_err("missing timestamps"))?;

    let quote = result
        .pointer("/indicators/quote/0")
        .ok_or_else(|| payload_err("missing quote block"))?;

    let closes = quote
        .get("close")
        .and_then(|c| c.as_array())
        .ok_or_else(|| payload_err("missing closes"))?;
    let volumes = quote.get("volume").and_then(|v| v.as_array());

    let mut points = Vec::with_capacity(timestamps.len());
    let mut vols = Vec::with_capacity(timestamps.len());
    let mut last_close: Option<f64> = None;

    for (i, ts) in timestamps.iter().enumerate() {
        let Some(time) = ts.as_i64().and_then(|t| DateTime::from_timestamp(t, 0)) else {
            continue;
        };

        // Forward-fill null closes, drop leading nulls
        let close = closes.get(i).and_then(|c| c.as_f64()).or(last_close);
        let Some(close) = close else { continue };
        last_close = Some(close);

        let volume = volumes
            .and_then(|v| v.get(i))
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);

        points.push(PricePoint { time, close });
        vols.push(volume);
    }

    Ok((points, vols))
}

fn payload_err(detail: &str) -> DataError {
    DataError::Payload {
        provider: "chart",
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_payload() -> Value {
        serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700086400, 1700172800, 1700259200],
                    "indicators": {
                        "quote": [{
                            "close": [null, 4500.5, null, 4510.0],
                            "volume": [0, 1000000, 0, 1200000]
                        }]
                    }
                }]
            }
        })
    }

    #[test]
    fn test_parse_chart_forward_fills() {
        let (points, volumes) = parse_chart(&chart_payload()).unwrap();

        // Leading null dropped, middle null forward-filled
        assert_eq!(points.len(), 3);
        assert!((points[0].close - 4500.5).abs() < 1e-9);
        assert!((points[1].close - 4500.5).abs() < 1e-9);
        assert!((points[2].close - 4510.0).abs() < 1e-9);
        assert_eq!(volumes.len(), 3);
    }

    #[test]
    fn test_parse_chart_missing_result() {
        let payload = serde_json::json!({"chart": {"result": []}});
        assert!(parse_chart(&payload).is_err());
    }
}
