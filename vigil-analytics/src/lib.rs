/// Vigil Analytics - indicator math for the Vigil TV dashboard
///
/// Pure, synchronous statistics over fetched series:
/// - rolling windows (mean, sample std)
/// - log returns, realized and proxy-implied volatility
/// - valuation heuristics (mean-reversion z-score, power-law corridor)
/// - parametric VaR and the credit stress test
/// - monthly seasonality and macro correlation helpers
///
/// Conventions: rolling outputs stay index-aligned with their input, with
/// NaN in warmup positions; degenerate inputs yield empty/None results,
/// never panics.
pub mod correlation;
pub mod levels;
pub mod returns;
pub mod risk;
pub mod seasonality;
pub mod valuation;
pub mod window;

// Re-export commonly used items for convenience
pub use correlation::{normalized_performance, pearson};
pub use levels::{fib_levels, FibLevel};
pub use returns::{implied_vol_proxy, log_returns, realized_volatility};
pub use risk::{parametric_var, Confidence, CreditStress, CreditStressInputs, VarEstimate};
pub use seasonality::{monthly_returns, MonthlyReturns};
pub use valuation::{days_since_genesis, mvrv_proxy, z_score, PowerLaw};
pub use window::{latest, latest_valid, rolling_mean, rolling_std};
