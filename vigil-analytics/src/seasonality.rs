//! Historical monthly returns pivoted into a year x month matrix.

use chrono::{DateTime, Datelike, Utc};

/// Year x month matrix of monthly returns (fractional), months 1-12.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyReturns {
    /// Ascending years with at least one populated month
    pub years: Vec<i32>,
    /// One row per year, cell index = month - 1
    pub cells: Vec<[Option<f64>; 12]>,
}

impl MonthlyReturns {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Cell lookup by calendar year/month.
    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        let row = self.years.iter().position(|&y| y == year)?;
        self.cells[row][(month - 1) as usize]
    }
}

/// Compute month-over-month returns from a daily close series.
///
/// The last close inside each calendar month stands for the month; the
/// first month has no predecessor and is skipped. Years with no populated
/// cell are dropped.
pub fn monthly_returns(samples: &[(DateTime<Utc>, f64)]) -> MonthlyReturns {
    // Collapse to (year, month, last close), relying on input order
    let mut month_closes: Vec<(i32, u32, f64)> = Vec::new();
    for (time, close) in samples {
        if *close <= 0.0 {
            continue;
        }
        let (year, month) = (time.year(), time.month());
        match month_closes.last_mut() {
            Some((y, m, c)) if *y == year && *m == month => *c = *close,
            _ => month_closes.push((year, month, *close)),
        }
    }

    if month_closes.len() < 2 {
        return MonthlyReturns {
            years: Vec::new(),
            cells: Vec::new(),
        };
    }

    let mut years: Vec<i32> = Vec::new();
    let mut cells: Vec<[Option<f64>; 12]> = Vec::new();

    for pair in month_closes.windows(2) {
        let (_, _, prev_close) = pair[0];
        let (year, month, close) = pair[1];
        let pct = close / prev_close - 1.0;

        if years.last() != Some(&year) {
            years.push(year);
            cells.push([None; 12]);
        }
        if let Some(row) = cells.last_mut() {
            row[(month - 1) as usize] = Some(pct);
        }
    }

    MonthlyReturns { years, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_monthly_returns_pivot() {
        let samples = vec![
            (day(2023, 11, 15), 95.0),
            (day(2023, 11, 30), 100.0),
            (day(2023, 12, 31), 110.0),
            (day(2024, 1, 31), 99.0),
        ];

        let matrix = monthly_returns(&samples);
        assert_eq!(matrix.years, vec![2023, 2024]);

        // Dec 2023: 100 -> 110
        assert!((matrix.get(2023, 12).unwrap() - 0.10).abs() < 1e-9);
        // Jan 2024: 110 -> 99
        assert!((matrix.get(2024, 1).unwrap() + 0.10).abs() < 1e-9);
        // First month has no predecessor
        assert_eq!(matrix.get(2023, 11), None);
    }

    #[test]
    fn test_monthly_returns_short_series() {
        let samples = vec![(day(2024, 1, 31), 100.0)];
        assert!(monthly_returns(&samples).is_empty());
    }

    #[test]
    fn test_monthly_returns_skips_nonpositive_closes() {
        let samples = vec![
            (day(2024, 1, 31), 100.0),
            (day(2024, 2, 15), 0.0),
            (day(2024, 2, 29), 105.0),
        ];

        let matrix = monthly_returns(&samples);
        assert!((matrix.get(2024, 2).unwrap() - 0.05).abs() < 1e-9);
    }
}
