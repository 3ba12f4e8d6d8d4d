//! Fear & Greed index (alternative.me).

use serde::Deserialize;
use tracing::warn;

use crate::error::DataError;
use crate::types::FearGreed;

#[derive(Debug, Deserialize)]
struct FngResponse {
    data: Vec<FngEntry>,
}

#[derive(Debug, Deserialize)]
struct FngEntry {
    value: String,
    value_classification: String,
}

/// Fetch the latest Fear & Greed reading.
pub async fn fetch_fear_greed() -> Result<FearGreed, DataError> {
    let client = reqwest::Client::new();
    let response = client
        .get("https://api.alternative.me/fng/?limit=1")
        .timeout(std::time::Duration::from_secs(3))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(DataError::Http(format!("fng status {}", response.status())));
    }

    let payload: FngResponse = response.json().await.map_err(|e| DataError::Payload {
        provider: "alternative.me",
        detail: e.to_string(),
    })?;

    parse_entry(payload)
}

/// Fetch with the neutral fallback applied: the header always has a reading.
pub async fn fetch_fear_greed_or_neutral() -> FearGreed {
    match fetch_fear_greed().await {
        Ok(reading) => reading,
        Err(e) => {
            warn!(error = %e, "fear & greed unreachable, showing neutral");
            FearGreed::neutral()
        }
    }
}

fn parse_entry(payload: FngResponse) -> Result<FearGreed, DataError> {
    let entry = payload.data.into_iter().next().ok_or(DataError::Payload {
        provider: "alternative.me",
        detail: "empty data array".to_string(),
    })?;

    let value: u8 = entry.value.parse().map_err(|_| DataError::Payload {
        provider: "alternative.me",
        detail: format!("non-numeric value: {}", entry.value),
    })?;

    Ok(FearGreed {
        value,
        classification: entry.value_classification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry() {
        let payload = FngResponse {
            data: vec![FngEntry {
                value: "72".to_string(),
                value_classification: "Greed".to_string(),
            }],
        };

        let reading = parse_entry(payload).unwrap();
        assert_eq!(reading.value, 72);
        assert_eq!(reading.classification, "Greed");
    }

    #[test]
    fn test_parse_entry_rejects_empty_and_garbage() {
        assert!(parse_entry(FngResponse { data: vec![] }).is_err());

        let garbage = FngResponse {
            data: vec![FngEntry {
                value: "NaN%".to_string(),
                value_classification: "??".to_string(),
            }],
        };
        assert!(parse_entry(garbage).is_err());
    }
}
