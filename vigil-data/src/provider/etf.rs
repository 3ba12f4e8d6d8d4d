//! Spot-ETF proxy snapshot: price, daily change, and relative volume.

use tracing::warn;

use crate::provider::macros::fetch_chart;
use crate::types::EtfSnapshot;

/// Fetch a 60-day snapshot for the given ETF symbol (e.g. "IBIT").
///
/// `None` mirrors the original behaviour: the panel simply omits the row
/// when the data is unavailable.
pub async fn fetch_etf_snapshot(symbol: &str) -> Option<EtfSnapshot> {
    match fetch_chart(symbol, "60d").await {
        Ok((points, volumes)) => {
            let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
            snapshot_from_series(symbol, &closes, &volumes)
        }
        Err(e) => {
            warn!(symbol, error = %e, "etf snapshot failed");
            None
        }
    }
}

/// Compute the snapshot from aligned close/volume series.
///
/// Relative volume compares the last session against the mean of the 30
/// sessions before it.
fn snapshot_from_series(symbol: &str, closes: &[f64], volumes: &[f64]) -> Option<EtfSnapshot> {
    if closes.len() < 2 || closes.len() != volumes.len() {
        return None;
    }

    let price = *closes.last()?;
    let prev = closes[closes.len() - 2];
    if prev <= 0.0 {
        return None;
    }

    let last_volume = *volumes.last()?;
    let window = &volumes[volumes.len().saturating_sub(31)..volumes.len() - 1];
    let avg_volume = if window.is_empty() {
        0.0
    } else {
        window.iter().sum::<f64>() / window.len() as f64
    };
    let rvol = if avg_volume > 0.0 {
        last_volume / avg_volume
    } else {
        0.0
    };

    Some(EtfSnapshot {
        symbol: symbol.to_string(),
        price,
        rvol,
        change: (price - prev) / prev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_series() {
        let mut closes = vec![100.0; 40];
        closes.push(105.0);
        let mut volumes = vec![1000.0; 40];
        volumes.push(2000.0);

        let snap = snapshot_from_series("IBIT", &closes, &volumes).unwrap();
        assert!((snap.price - 105.0).abs() < 1e-9);
        assert!((snap.change - 0.05).abs() < 1e-9);
        // Last volume is twice the trailing average
        assert!((snap.rvol - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_too_short() {
        assert!(snapshot_from_series("IBIT", &[100.0], &[1000.0]).is_none());
    }

    #[test]
    fn test_snapshot_zero_prev_close() {
        let closes = vec![0.0, 10.0];
        let volumes = vec![100.0, 100.0];
        assert!(snapshot_from_series("IBIT", &closes, &volumes).is_none());
    }
}
