//! Rolling-window primitives over plain slices.
//!
//! All rolling functions return a vector aligned with the input; positions
//! without a full window are NaN so downstream series stay index-aligned
//! with their source candles.

/// Rolling arithmetic mean over `window` samples.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return vec![f64::NAN; values.len()];
    }

    let mut out = vec![f64::NAN; values.len()];
    let mut sum = 0.0;

    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out[i] = sum / window as f64;
        }
    }

    out
}

/// Rolling sample standard deviation (ddof = 1) over `window` samples.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window < 2 {
        return out;
    }

    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / (window - 1) as f64;
        out[i] = variance.sqrt();
    }

    out
}

/// Last element of a series, NaN treated as absent.
pub fn latest(values: &[f64]) -> Option<f64> {
    values.last().copied().filter(|v| v.is_finite())
}

/// Last finite element of a series, scanning backwards past NaN warmup
/// or trailing gaps.
pub fn latest_valid(values: &[f64]) -> Option<f64> {
    values.iter().rev().copied().find(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let means = rolling_mean(&values, 3);

        assert!(means[0].is_nan());
        assert!(means[1].is_nan());
        assert!((means[2] - 2.0).abs() < 1e-12);
        assert!((means[3] - 3.0).abs() < 1e-12);
        assert!((means[4] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_mean_window_larger_than_series() {
        let means = rolling_mean(&[1.0, 2.0], 5);
        assert!(means.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rolling_std_matches_sample_formula() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stds = rolling_std(&values, 8);

        // Sample std of the whole series: variance 32/7
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((stds[7] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_std_constant_series() {
        let stds = rolling_std(&[5.0; 10], 4);
        assert!(stds[9].abs() < 1e-12);
    }

    #[test]
    fn test_latest_helpers() {
        let values = [1.0, 2.0, f64::NAN];
        assert_eq!(latest(&values), None);
        assert_eq!(latest_valid(&values), Some(2.0));
        assert_eq!(latest_valid(&[]), None);
    }
}
