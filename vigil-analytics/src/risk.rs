//! Parametric Value-at-Risk and the institutional credit stress test.

/// Confidence levels supported by the VaR table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    P95,
    P975,
    P99,
}

impl Confidence {
    pub const ALL: [Confidence; 3] = [Confidence::P95, Confidence::P975, Confidence::P99];

    /// One-tailed standard-normal z-score.
    pub fn z(&self) -> f64 {
        match self {
            Confidence::P95 => 1.645,
            Confidence::P975 => 1.960,
            Confidence::P99 => 2.326,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Confidence::P95 => "95.0%",
            Confidence::P975 => "97.5%",
            Confidence::P99 => "99.0%",
        }
    }
}

/// Parametric VaR result for one confidence/horizon pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarEstimate {
    /// Spot price after the probable maximum drop
    pub price_at_var: f64,
    /// Probable maximum drop as a fraction of spot
    pub loss_pct: f64,
}

/// Parametric VaR: drop = z * vol * sqrt(days/365).
///
/// `volatility` is the annualised realized vol (e.g. 0.45 for 45%).
pub fn parametric_var(
    spot_price: f64,
    volatility: f64,
    horizon_days: f64,
    confidence: Confidence,
) -> VarEstimate {
    let time_factor = (horizon_days / 365.0).sqrt();
    let loss_pct = confidence.z() * volatility * time_factor;

    VarEstimate {
        price_at_var: spot_price * (1.0 - loss_pct),
        loss_pct,
    }
}

/// Inputs of the credit stress test, all ratios fractional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditStressInputs {
    /// Principal loan in USD
    pub loan_usd: f64,
    /// Collateral haircut applied by the lender
    pub haircut: f64,
    /// Loan-to-value against the haircut price
    pub ltv: f64,
    /// LTV level at which the position is liquidated
    pub liq_threshold: f64,
}

impl Default for CreditStressInputs {
    fn default() -> Self {
        // The desk's standing simulation parameters
        Self {
            loan_usd: 5_000_000.0,
            haircut: 0.30,
            ltv: 0.65,
            liq_threshold: 0.85,
        }
    }
}

/// Evaluated credit stress test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditStress {
    /// Spot after the lender's haircut
    pub lending_price: f64,
    /// BTC the borrower must post
    pub collateral_btc: f64,
    /// Market value of that collateral at spot
    pub collateral_market_usd: f64,
    /// Spot price at which the position liquidates
    pub liquidation_price: f64,
    /// Distance from spot to liquidation as a fraction of spot
    pub buffer_pct: f64,
}

/// Buffer below which the position is flagged CRITICAL.
pub const CRITICAL_BUFFER: f64 = 0.15;

impl CreditStress {
    pub fn evaluate(spot_price: f64, inputs: CreditStressInputs) -> Option<Self> {
        if spot_price <= 0.0 || inputs.ltv <= 0.0 || inputs.liq_threshold <= 0.0 {
            return None;
        }

        let lending_price = spot_price * (1.0 - inputs.haircut);
        if lending_price <= 0.0 {
            return None;
        }

        let collateral_btc = inputs.loan_usd / (lending_price * inputs.ltv);
        let collateral_market_usd = collateral_btc * spot_price;
        let liquidation_price =
            inputs.loan_usd / (collateral_btc * (1.0 - inputs.haircut) * inputs.liq_threshold);
        let buffer_pct = (spot_price - liquidation_price) / spot_price;

        Some(Self {
            lending_price,
            collateral_btc,
            collateral_market_usd,
            liquidation_price,
            buffer_pct,
        })
    }

    pub fn is_critical(&self) -> bool {
        self.buffer_pct < CRITICAL_BUFFER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_z_table() {
        struct TestCase {
            input: Confidence,
            expected: f64,
        }

        let tests = vec![
            TestCase {
                input: Confidence::P95,
                expected: 1.645,
            },
            TestCase {
                input: Confidence::P975,
                expected: 1.960,
            },
            TestCase {
                input: Confidence::P99,
                expected: 2.326,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert!((test.input.z() - test.expected).abs() < 1e-12, "TC{} failed", index);
        }
    }

    #[test]
    fn test_parametric_var_one_year_horizon() {
        // At a 365d horizon the time factor is 1: drop = z * vol
        let var = parametric_var(100_000.0, 0.50, 365.0, Confidence::P975);
        assert!((var.loss_pct - 0.98).abs() < 1e-9);
        assert!((var.price_at_var - 2_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_parametric_var_scales_with_sqrt_time() {
        let short = parametric_var(100.0, 0.60, 30.0, Confidence::P95);
        let long = parametric_var(100.0, 0.60, 120.0, Confidence::P95);
        // 4x the horizon -> 2x the loss
        assert!((long.loss_pct / short.loss_pct - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_credit_stress_formulas() {
        let inputs = CreditStressInputs::default();
        let stress = CreditStress::evaluate(100_000.0, inputs).unwrap();

        // lending price = 100k * 0.7 = 70k
        assert!((stress.lending_price - 70_000.0).abs() < 1e-6);
        // collateral = 5M / (70k * 0.65)
        let expected_btc = 5_000_000.0 / (70_000.0 * 0.65);
        assert!((stress.collateral_btc - expected_btc).abs() < 1e-9);
        // liquidation = 5M / (btc * 0.7 * 0.85)
        let expected_liq = 5_000_000.0 / (expected_btc * 0.70 * 0.85);
        assert!((stress.liquidation_price - expected_liq).abs() < 1e-6);

        // Algebraically buffer = 1 - ltv / liq_threshold regardless of spot
        let expected_buffer = 1.0 - inputs.ltv / inputs.liq_threshold;
        assert!((stress.buffer_pct - expected_buffer).abs() < 1e-9);
        assert!(!stress.is_critical());
    }

    #[test]
    fn test_credit_stress_critical_flag() {
        // Aggressive LTV leaves a thin buffer
        let inputs = CreditStressInputs {
            ltv: 0.80,
            ..CreditStressInputs::default()
        };
        let stress = CreditStress::evaluate(100_000.0, inputs).unwrap();
        assert!(stress.buffer_pct < CRITICAL_BUFFER);
        assert!(stress.is_critical());
    }

    #[test]
    fn test_credit_stress_rejects_bad_inputs() {
        assert!(CreditStress::evaluate(0.0, CreditStressInputs::default()).is_none());

        let full_haircut = CreditStressInputs {
            haircut: 1.0,
            ..CreditStressInputs::default()
        };
        assert!(CreditStress::evaluate(100_000.0, full_haircut).is_none());
    }
}
