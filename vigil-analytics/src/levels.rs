//! Auto-Fibonacci retracement levels over a visible price range.

/// One retracement level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibLevel {
    /// Retracement ratio measured down from the range high
    pub ratio: f64,
    pub price: f64,
    /// The 0.618 "golden pocket" gets visual emphasis
    pub golden: bool,
}

/// Standard retracement ratios between the range extremes.
pub const FIB_RATIOS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];

/// Levels for a high/low range, highest price first, including the range
/// extremes as ratio 0.0 / 1.0. Empty when the range is degenerate.
pub fn fib_levels(high: f64, low: f64) -> Vec<FibLevel> {
    if !(high > low) || low < 0.0 {
        return Vec::new();
    }

    let diff = high - low;
    let mut levels = Vec::with_capacity(FIB_RATIOS.len() + 2);

    levels.push(FibLevel {
        ratio: 0.0,
        price: high,
        golden: false,
    });
    for ratio in FIB_RATIOS {
        levels.push(FibLevel {
            ratio,
            price: high - diff * ratio,
            golden: (ratio - 0.618).abs() < 1e-9,
        });
    }
    levels.push(FibLevel {
        ratio: 1.0,
        price: low,
        golden: false,
    });

    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fib_levels() {
        let levels = fib_levels(200.0, 100.0);
        assert_eq!(levels.len(), 7);

        assert_eq!(levels[0].price, 200.0);
        assert_eq!(levels[6].price, 100.0);

        // 0.5 retracement of a 100-wide range
        let half = levels.iter().find(|l| l.ratio == 0.5).unwrap();
        assert!((half.price - 150.0).abs() < 1e-9);

        // Exactly one golden pocket
        assert_eq!(levels.iter().filter(|l| l.golden).count(), 1);
        let golden = levels.iter().find(|l| l.golden).unwrap();
        assert!((golden.price - 138.2).abs() < 1e-9);
    }

    #[test]
    fn test_fib_levels_degenerate_range() {
        assert!(fib_levels(100.0, 100.0).is_empty());
        assert!(fib_levels(90.0, 100.0).is_empty());
    }
}
