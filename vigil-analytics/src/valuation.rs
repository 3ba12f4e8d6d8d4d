//! Valuation heuristics: mean-reversion z-score and the power-law corridor.

use chrono::{DateTime, TimeZone, Utc};

use crate::window::{rolling_mean, rolling_std};

/// Z-score of price against its rolling mean: (close - mean) / std.
///
/// Zero-std windows (flat price) produce NaN rather than infinity.
pub fn z_score(closes: &[f64], window: usize) -> Vec<f64> {
    let means = rolling_mean(closes, window);
    let stds = rolling_std(closes, window);

    closes
        .iter()
        .zip(means.iter().zip(stds.iter()))
        .map(|(&close, (&mean, &std))| {
            if !mean.is_finite() || !std.is_finite() || std == 0.0 {
                f64::NAN
            } else {
                (close - mean) / std
            }
        })
        .collect()
}

/// MVRV-style proxy: z-score with the realized-price window the on-chain
/// heuristic uses.
pub fn mvrv_proxy(closes: &[f64]) -> Vec<f64> {
    z_score(closes, 120)
}

/// Power-law fit of log10(price) against log10(days since genesis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLaw {
    pub slope: f64,
    pub intercept: f64,
}

/// Band offsets calibrated for the corridor chart (log10 units).
pub const SUPPORT_OFFSET: f64 = -0.35;
pub const RESISTANCE_OFFSET: f64 = 0.50;

/// Bitcoin genesis block date, the corridor's time origin.
pub fn genesis() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2009, 1, 3, 0, 0, 0).unwrap()
}

/// Days since genesis for a sample time; None at or before genesis.
pub fn days_since_genesis(time: DateTime<Utc>) -> Option<f64> {
    let days = (time - genesis()).num_days();
    (days > 0).then_some(days as f64)
}

impl PowerLaw {
    /// Ordinary least squares on the log-log samples.
    ///
    /// Samples at or before genesis and non-positive prices are dropped;
    /// needs at least two surviving samples.
    pub fn fit(samples: &[(DateTime<Utc>, f64)]) -> Option<Self> {
        let points: Vec<(f64, f64)> = samples
            .iter()
            .filter(|(_, close)| *close > 0.0)
            .filter_map(|(time, close)| {
                days_since_genesis(*time).map(|days| (days.log10(), close.log10()))
            })
            .collect();

        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
        let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
        let mean_x = sum_x / n;
        let mean_y = sum_y / n;

        let mut num = 0.0;
        let mut denom = 0.0;
        for (x, y) in &points {
            num += (x - mean_x) * (y - mean_y);
            denom += (x - mean_x) * (x - mean_x);
        }

        if denom == 0.0 {
            return None;
        }

        let slope = num / denom;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    /// Regression midline price for a given age in days.
    pub fn fair_value(&self, days: f64) -> f64 {
        self.band(days, 0.0)
    }

    /// Price at a fixed log10 offset from the midline.
    pub fn band(&self, days: f64, offset: f64) -> f64 {
        10f64.powf(self.intercept + offset + self.slope * days.log10())
    }

    /// Where a price sits inside the support/resistance corridor:
    /// 0 at support, 1 at resistance, outside [0, 1] when broken out.
    pub fn corridor_position(&self, days: f64, price: f64) -> Option<f64> {
        if price <= 0.0 || days <= 0.0 {
            return None;
        }
        let log_price = price.log10();
        let log_support = (self.band(days, SUPPORT_OFFSET)).log10();
        let log_resistance = (self.band(days, RESISTANCE_OFFSET)).log10();
        let span = log_resistance - log_support;
        (span != 0.0).then(|| (log_price - log_support) / span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_z_score_centering() {
        // Rising then flat: last value above its own window mean
        let closes = [10.0, 10.0, 10.0, 10.0, 20.0];
        let z = z_score(&closes, 5);
        assert!(z[4] > 0.0);
    }

    #[test]
    fn test_z_score_flat_window_is_nan() {
        let closes = [10.0; 6];
        let z = z_score(&closes, 5);
        assert!(z[5].is_nan());
    }

    #[test]
    fn test_power_law_recovers_exact_fit() {
        // Synthetic price following price = 10^(-10) * days^5.5 exactly
        let slope = 5.5;
        let intercept = -10.0;
        let samples: Vec<(DateTime<Utc>, f64)> = (100..1100)
            .step_by(50)
            .map(|d| {
                let time = genesis() + Duration::days(d);
                let price = 10f64.powf(intercept + slope * (d as f64).log10());
                (time, price)
            })
            .collect();

        let fit = PowerLaw::fit(&samples).unwrap();
        assert!((fit.slope - slope).abs() < 1e-9);
        assert!((fit.intercept - intercept).abs() < 1e-6);

        // Fair value reproduces the generating curve
        let fv = fit.fair_value(500.0);
        let expected = 10f64.powf(intercept + slope * 500f64.log10());
        assert!((fv / expected - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_power_law_rejects_degenerate_input() {
        assert!(PowerLaw::fit(&[]).is_none());

        // Pre-genesis and non-positive samples are dropped
        let bad = vec![
            (genesis() - Duration::days(10), 100.0),
            (genesis() + Duration::days(10), -5.0),
        ];
        assert!(PowerLaw::fit(&bad).is_none());
    }

    #[test]
    fn test_corridor_position_bounds() {
        let fit = PowerLaw {
            slope: 5.5,
            intercept: -10.0,
        };
        let days = 4000.0;

        let at_support = fit.band(days, SUPPORT_OFFSET);
        let at_resistance = fit.band(days, RESISTANCE_OFFSET);

        let p0 = fit.corridor_position(days, at_support).unwrap();
        let p1 = fit.corridor_position(days, at_resistance).unwrap();
        assert!(p0.abs() < 1e-9);
        assert!((p1 - 1.0).abs() < 1e-9);

        // Midline sits where the offsets say it should, not at 0.5
        let mid = fit.corridor_position(days, fit.fair_value(days)).unwrap();
        let expected = -SUPPORT_OFFSET / (RESISTANCE_OFFSET - SUPPORT_OFFSET);
        assert!((mid - expected).abs() < 1e-9);
    }
}
