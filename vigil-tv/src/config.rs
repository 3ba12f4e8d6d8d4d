//! Environment-variable configuration, resolved once per process.

use std::sync::OnceLock;
use std::time::Duration;

use vigil_analytics::CreditStressInputs;

/// Seconds each view stays on screen (env: VIGIL_DWELL_SECS, default: 25)
pub fn view_dwell() -> Duration {
    static DWELL: OnceLock<u64> = OnceLock::new();
    let secs = *DWELL.get_or_init(|| {
        std::env::var("VIGIL_DWELL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(25)
    });
    Duration::from_secs(secs.max(3))
}

/// Seconds between news ticker advances (env: VIGIL_NEWS_SECS, default: 120)
pub fn news_advance() -> Duration {
    static NEWS: OnceLock<u64> = OnceLock::new();
    let secs = *NEWS.get_or_init(|| {
        std::env::var("VIGIL_NEWS_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(120)
    });
    Duration::from_secs(secs.max(5))
}

/// Order book depth requested per side (env: VIGIL_BOOK_DEPTH, default: 500)
pub fn book_depth() -> usize {
    static DEPTH: OnceLock<usize> = OnceLock::new();
    *DEPTH.get_or_init(|| {
        std::env::var("VIGIL_BOOK_DEPTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(500)
    })
}

/// Spot-ETF proxy symbol (env: VIGIL_ETF, default: IBIT)
pub fn etf_symbol() -> &'static str {
    static SYMBOL: OnceLock<String> = OnceLock::new();
    SYMBOL.get_or_init(|| std::env::var("VIGIL_ETF").unwrap_or_else(|_| "IBIT".to_string()))
}

/// Credit simulator inputs (env: VIGIL_LOAN_USD, VIGIL_HAIRCUT_PCT,
/// VIGIL_LTV_PCT, VIGIL_LIQ_PCT; defaults match the standing simulation)
pub fn credit_inputs() -> CreditStressInputs {
    static INPUTS: OnceLock<CreditStressInputs> = OnceLock::new();
    *INPUTS.get_or_init(|| {
        let defaults = CreditStressInputs::default();
        let env_f64 = |key: &str| std::env::var(key).ok().and_then(|v| v.parse::<f64>().ok());

        CreditStressInputs {
            loan_usd: env_f64("VIGIL_LOAN_USD").unwrap_or(defaults.loan_usd),
            haircut: env_f64("VIGIL_HAIRCUT_PCT")
                .map(|p| p / 100.0)
                .unwrap_or(defaults.haircut),
            ltv: env_f64("VIGIL_LTV_PCT")
                .map(|p| p / 100.0)
                .unwrap_or(defaults.ltv),
            liq_threshold: env_f64("VIGIL_LIQ_PCT")
                .map(|p| p / 100.0)
                .unwrap_or(defaults.liq_threshold),
        }
    })
}
