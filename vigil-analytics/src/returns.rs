//! Log returns and volatility series.

use crate::window::rolling_std;

/// Natural-log returns, aligned with the input (first element NaN).
pub fn log_returns(closes: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    for i in 1..closes.len() {
        if closes[i] > 0.0 && closes[i - 1] > 0.0 {
            out[i] = (closes[i] / closes[i - 1]).ln();
        }
    }
    out
}

/// Annualised realized volatility: rolling std of log returns scaled by
/// the square root of the sampling frequency (365 for daily bars, 365*24
/// for hourly).
pub fn realized_volatility(closes: &[f64], window: usize, periods_per_year: f64) -> Vec<f64> {
    let rets = log_returns(closes);
    let mut vol = rolling_std(&rets, window);
    let factor = periods_per_year.sqrt();
    for v in &mut vol {
        *v *= factor;
    }
    vol
}

/// Implied-vol proxy with an adaptive panic spread.
///
/// The spread over realized vol widens when the smoothed vol crosses 60%
/// (liquidity-crunch regime): multiplier 0.40 instead of 0.15, plus a 5%
/// floor either way.
pub fn implied_vol_proxy(realized_vol: &[f64]) -> Vec<f64> {
    let smoothed = rolling_mean_skipping_nan(realized_vol, 10);

    realized_vol
        .iter()
        .zip(smoothed.iter())
        .map(|(&rv, &avg)| {
            if !rv.is_finite() || !avg.is_finite() {
                return f64::NAN;
            }
            let panic_multiplier = if avg > 0.60 { 0.40 } else { 0.15 };
            rv + (avg * panic_multiplier) + 0.05
        })
        .collect()
}

/// Rolling mean that treats NaN warmup samples as absent instead of
/// poisoning the whole window.
fn rolling_mean_skipping_nan(values: &[f64], window: usize) -> Vec<f64> {
    let finite: Vec<f64> = values.iter().map(|v| if v.is_finite() { *v } else { 0.0 }).collect();
    let counts: Vec<f64> = values
        .iter()
        .map(|v| if v.is_finite() { 1.0 } else { 0.0 })
        .collect();

    let sums = rolling_sum(&finite, window);
    let ns = rolling_sum(&counts, window);

    sums.iter()
        .zip(ns.iter())
        .map(|(&s, &n)| if n > 0.0 { s / n } else { f64::NAN })
        .collect()
}

fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        out[i] = sum;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_returns() {
        let closes = [100.0, 110.0, 99.0];
        let rets = log_returns(&closes);

        assert!(rets[0].is_nan());
        assert!((rets[1] - (1.1_f64).ln()).abs() < 1e-12);
        assert!((rets[2] - (0.9_f64).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_log_returns_guard_nonpositive() {
        let closes = [100.0, 0.0, 50.0];
        let rets = log_returns(&closes);
        assert!(rets[1].is_nan());
        assert!(rets[2].is_nan());
    }

    #[test]
    fn test_realized_volatility_constant_price_is_zero() {
        let closes = [100.0; 40];
        let vol = realized_volatility(&closes, 30, 365.0);
        assert!(vol[39].abs() < 1e-12);
    }

    #[test]
    fn test_implied_vol_regimes() {
        // Calm regime: rv 0.30 -> iv = 0.30 + 0.30*0.15 + 0.05 = 0.395
        let calm = vec![0.30; 20];
        let iv = implied_vol_proxy(&calm);
        assert!((iv[19] - 0.395).abs() < 1e-9);

        // Panic regime: rv 0.80 -> iv = 0.80 + 0.80*0.40 + 0.05 = 1.17
        let panic = vec![0.80; 20];
        let iv = implied_vol_proxy(&panic);
        assert!((iv[19] - 1.17).abs() < 1e-9);
    }

    #[test]
    fn test_implied_vol_nan_warmup_passthrough() {
        let mut rv = vec![f64::NAN; 5];
        rv.extend([0.30; 10]);
        let iv = implied_vol_proxy(&rv);
        assert!(iv[0].is_nan());
        assert!(iv[14].is_finite());
    }
}
