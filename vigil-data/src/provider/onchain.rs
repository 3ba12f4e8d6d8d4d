//! On-chain proxy: network hash-rate series from a blockchain charts
//! endpoint.

use chrono::DateTime;
use serde::Deserialize;

use crate::error::DataError;
use crate::types::HashrateSample;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    values: Vec<ChartPoint>,
}

#[derive(Debug, Deserialize)]
struct ChartPoint {
    x: i64,
    y: f64,
}

/// Fetch the hash-rate series over the given timespan (e.g. "1year").
pub async fn fetch_hashrate(timespan: &str) -> Result<Vec<HashrateSample>, DataError> {
    let url = format!(
        "https://api.blockchain.info/charts/hash-rate?timespan={}&format=json",
        timespan
    );

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!(
            "hash-rate status {}",
            response.status()
        )));
    }

    let payload: ChartResponse = response.json().await.map_err(|e| DataError::Payload {
        provider: "blockchain.info",
        detail: e.to_string(),
    })?;

    Ok(parse_points(payload))
}

fn parse_points(payload: ChartResponse) -> Vec<HashrateSample> {
    payload
        .values
        .into_iter()
        .filter_map(|p| {
            let time = DateTime::from_timestamp(p.x, 0)?;
            (p.y > 0.0).then_some(HashrateSample { time, raw: p.y })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_points_drops_nonpositive() {
        let payload = ChartResponse {
            values: vec![
                ChartPoint {
                    x: 1_700_000_000,
                    y: 450_000_000.0,
                },
                ChartPoint {
                    x: 1_700_086_400,
                    y: 0.0,
                },
            ],
        };

        let samples = parse_points(payload);
        assert_eq!(samples.len(), 1);
        assert!((samples[0].ehs() - 450.0).abs() < 1e-9);
    }
}
