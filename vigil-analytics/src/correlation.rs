//! Pearson correlation and normalized-performance series for the macro
//! comparison panel.

/// Pearson correlation over the trailing overlap of two series.
///
/// Compares up to the last `max_samples` paired values; series shorter
/// than 10 samples return 0 rather than a noisy estimate. Result clamped
/// to [-1, 1].
pub fn pearson(a: &[f64], b: &[f64], max_samples: usize) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let n = a.len().min(b.len()).min(max_samples);
    if n < 10 {
        return 0.0;
    }

    let a_slice = &a[a.len() - n..];
    let b_slice = &b[b.len() - n..];

    let mean_a = a_slice.iter().sum::<f64>() / n as f64;
    let mean_b = b_slice.iter().sum::<f64>() / n as f64;

    let mut num = 0.0;
    let mut denom_a = 0.0;
    let mut denom_b = 0.0;

    for i in 0..n {
        let da = a_slice[i] - mean_a;
        let db = b_slice[i] - mean_b;
        num += da * db;
        denom_a += da * da;
        denom_b += db * db;
    }

    let denom = (denom_a * denom_b).sqrt();
    if denom > 0.0 {
        (num / denom).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Percent performance of a series against its first sample.
pub fn normalized_performance(values: &[f64]) -> Vec<f64> {
    let Some(&base) = values.first().filter(|v| **v > 0.0) else {
        return Vec::new();
    };

    values.iter().map(|v| (v / base - 1.0) * 100.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pearson_perfect_positive() {
        let a: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..50).map(|i| 3.0 * i as f64 + 7.0).collect();
        assert!((pearson(&a, &b, 100) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let a: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..50).map(|i| -(i as f64)).collect();
        assert!((pearson(&a, &b, 100) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_short_series_is_zero() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 2.0, 3.0];
        assert_eq!(pearson(&a, &b, 100), 0.0);
    }

    #[test]
    fn test_pearson_constant_series_is_zero() {
        let a = [5.0; 20];
        let b: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert_eq!(pearson(&a, &b, 100), 0.0);
    }

    #[test]
    fn test_normalized_performance() {
        let values = [200.0, 220.0, 190.0];
        let perf = normalized_performance(&values);
        assert!((perf[0] - 0.0).abs() < 1e-9);
        assert!((perf[1] - 10.0).abs() < 1e-9);
        assert!((perf[2] + 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_performance_bad_base() {
        assert!(normalized_performance(&[0.0, 10.0]).is_empty());
        assert!(normalized_performance(&[]).is_empty());
    }
}
