//! Derivatives metrics: funding rate, open interest, put/call ratio.
//!
//! Every leg is independently best-effort. Funding and open interest come
//! from Binance futures, option volumes from Deribit public summaries.
//! Cloud IPs are routinely blocked by the futures venues, so a failed core
//! leg degrades the whole snapshot to static realistic figures rather than
//! rendering a half-empty panel.

use serde::Deserialize;
use tracing::warn;

use crate::error::DataError;
use crate::mock;
use crate::types::DerivativesSnapshot;

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct PremiumIndex {
    #[serde(rename = "lastFundingRate")]
    last_funding_rate: String,
    #[serde(rename = "markPrice")]
    mark_price: String,
}

#[derive(Debug, Deserialize)]
struct Ticker24h {
    #[serde(rename = "priceChangePercent")]
    price_change_percent: String,
}

#[derive(Debug, Deserialize)]
struct OpenInterest {
    #[serde(rename = "openInterest")]
    open_interest: String,
}

#[derive(Debug, Deserialize)]
struct DeribitSummaryResponse {
    result: Vec<DeribitSummary>,
}

#[derive(Debug, Deserialize)]
struct DeribitSummary {
    instrument_name: String,
    #[serde(default)]
    volume: f64,
}

/// Fetch the derivatives snapshot. Never errors: failed legs degrade to the
/// static fallback figures with `simulated: true`.
pub async fn fetch_derivatives() -> DerivativesSnapshot {
    let mut snapshot = match fetch_binance_core().await {
        Ok(core) => core,
        Err(e) => {
            warn!(error = %e, "binance futures unreachable, using static derivatives");
            mock::derivatives()
        }
    };

    // Options leg is optional either way; keep the fallback ratio on failure
    match fetch_deribit_put_call().await {
        Ok(ratio) => snapshot.put_call_ratio = ratio,
        Err(e) => warn!(error = %e, "deribit options unreachable, keeping fallback P/C"),
    }

    snapshot
}

async fn fetch_binance_core() -> Result<DerivativesSnapshot, DataError> {
    let client = reqwest::Client::new();

    let premium: PremiumIndex = get_json(
        &client,
        "https://fapi.binance.com/fapi/v1/premiumIndex?symbol=BTCUSDT",
    )
    .await?;
    let ticker: Ticker24h = get_json(
        &client,
        "https://fapi.binance.com/fapi/v1/ticker/24hr?symbol=BTCUSDT",
    )
    .await?;

    let funding_rate_pct: f64 = premium
        .last_funding_rate
        .parse::<f64>()
        .map_err(|_| payload_err("non-numeric funding rate"))?
        * 100.0;
    let mark_price: f64 = premium
        .mark_price
        .parse()
        .map_err(|_| payload_err("non-numeric mark price"))?;
    let oi_change_pct: f64 = ticker
        .price_change_percent
        .parse()
        .map_err(|_| payload_err("non-numeric 24h change"))?;

    // OI notional is a nice-to-have; keep the snapshot live without it
    let open_interest_billions =
        match get_json::<OpenInterest>(&client, "https://fapi.binance.com/fapi/v1/openInterest?symbol=BTCUSDT")
            .await
            .and_then(|oi| {
                oi.open_interest
                    .parse::<f64>()
                    .map_err(|_| payload_err("non-numeric open interest"))
            }) {
            Ok(contracts) => contracts * mark_price / 1e9,
            Err(e) => {
                warn!(error = %e, "open interest leg failed, using fallback notional");
                mock::derivatives().open_interest_billions
            }
        };

    Ok(DerivativesSnapshot {
        funding_rate_pct,
        open_interest_billions,
        oi_change_pct,
        put_call_ratio: mock::derivatives().put_call_ratio,
        simulated: false,
    })
}

async fn fetch_deribit_put_call() -> Result<f64, DataError> {
    let client = reqwest::Client::new();
    let payload: DeribitSummaryResponse = get_json(
        &client,
        "https://www.deribit.com/api/v2/public/get_book_summary_by_currency?currency=BTC&kind=option",
    )
    .await?;

    let volumes: Vec<(String, f64)> = payload
        .result
        .into_iter()
        .map(|s| (s.instrument_name, s.volume))
        .collect();

    put_call_ratio(&volumes).ok_or(DataError::Payload {
        provider: "deribit",
        detail: "no call volume traded".to_string(),
    })
}

/// Put volume / call volume over instrument summaries.
///
/// Instrument names end in `-C` (call) or `-P` (put). None when no call
/// volume traded, which would divide by zero.
fn put_call_ratio(summaries: &[(String, f64)]) -> Option<f64> {
    let mut calls = 0.0;
    let mut puts = 0.0;

    for (name, volume) in summaries {
        if name.ends_with("-C") {
            calls += volume;
        } else if name.ends_with("-P") {
            puts += volume;
        }
    }

    (calls > 0.0).then(|| puts / calls)
}

async fn get_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, DataError> {
    let response = client.get(url).timeout(REQUEST_TIMEOUT).send().await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!("status {}", response.status())));
    }

    response.json().await.map_err(|e| DataError::Payload {
        provider: "derivatives",
        detail: e.to_string(),
    })
}

fn payload_err(detail: &str) -> DataError {
    DataError::Payload {
        provider: "derivatives",
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_call_ratio() {
        let summaries = vec![
            ("BTC-27JUN25-100000-C".to_string(), 40.0),
            ("BTC-27JUN25-100000-P".to_string(), 30.0),
            ("BTC-27JUN25-90000-C".to_string(), 10.0),
            ("BTC-PERPETUAL".to_string(), 999.0), // neither put nor call
        ];

        let ratio = put_call_ratio(&summaries).unwrap();
        assert!((ratio - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_put_call_ratio_no_calls() {
        let summaries = vec![("BTC-27JUN25-100000-P".to_string(), 30.0)];
        assert_eq!(put_call_ratio(&summaries), None);
    }
}
