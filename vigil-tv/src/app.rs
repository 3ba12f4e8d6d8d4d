//! Dashboard state, the view-rotation engine, and the news ticker.
//!
//! The rotation is wall-clock driven: the main loop ticks once per second
//! and the engine advances whenever the current view's dwell has elapsed.
//! Manual navigation resets the dwell timer so an operator glance is not
//! cut short mid-read.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use vigil_analytics::{
    implied_vol_proxy, monthly_returns, realized_volatility, rolling_mean, z_score, latest_valid,
    MonthlyReturns, PowerLaw,
};
use vigil_data::{
    Candle, DerivativesSnapshot, EtfSnapshot, FearGreed, HashrateSample, MacroSeries, NewsItem,
    OrderBook, PricePoint,
};

/// The rotating views, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    MarketStructure,
    Liquidity,
    RiskRadar,
    CreditStress,
    Valuation,
    Mining,
}

impl View {
    pub const ALL: [View; 6] = [
        View::MarketStructure,
        View::Liquidity,
        View::RiskRadar,
        View::CreditStress,
        View::Valuation,
        View::Mining,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::MarketStructure => "MARKET STRUCTURE & VOLUME",
            View::Liquidity => "LIQUIDITY DENSITY",
            View::RiskRadar => "RISK RADAR & MACRO",
            View::CreditStress => "CREDIT STRESS TEST",
            View::Valuation => "POWER LAW & SEASONALITY",
            View::Mining => "NETWORK SECURITY & MINERS",
        }
    }
}

/// Wall-clock view rotation with manual override.
#[derive(Debug)]
pub struct Rotation {
    index: usize,
    last_change: Instant,
    paused: bool,
}

impl Rotation {
    pub fn new() -> Self {
        Self {
            index: 0,
            last_change: Instant::now(),
            paused: false,
        }
    }

    pub fn current(&self) -> View {
        View::ALL[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance if the dwell elapsed. Returns true when the view changed.
    pub fn tick(&mut self, dwell: Duration) -> bool {
        self.tick_at(Instant::now(), dwell)
    }

    fn tick_at(&mut self, now: Instant, dwell: Duration) -> bool {
        if self.paused || now.duration_since(self.last_change) < dwell {
            return false;
        }
        self.index = (self.index + 1) % View::ALL.len();
        self.last_change = now;
        true
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % View::ALL.len();
        self.last_change = Instant::now();
    }

    pub fn prev(&mut self) {
        self.index = (self.index + View::ALL.len() - 1) % View::ALL.len();
        self.last_change = Instant::now();
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if !self.paused {
            self.last_change = Instant::now();
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new()
    }
}

/// Rolling offset into the headline list.
#[derive(Debug)]
pub struct NewsTicker {
    offset: usize,
    last_advance: Instant,
}

/// Headlines shown per ticker window
pub const TICKER_WINDOW: usize = 10;

impl NewsTicker {
    pub fn new() -> Self {
        Self {
            offset: 0,
            last_advance: Instant::now(),
        }
    }

    /// Advance the window by `TICKER_WINDOW` once `interval` has elapsed.
    pub fn tick(&mut self, interval: Duration) {
        self.tick_at(Instant::now(), interval)
    }

    fn tick_at(&mut self, now: Instant, interval: Duration) {
        if now.duration_since(self.last_advance) >= interval {
            self.offset += TICKER_WINDOW;
            self.last_advance = now;
        }
    }

    /// Current window of headlines, wrapping modulo the feed length.
    pub fn window<'a>(&self, news: &'a [NewsItem]) -> Vec<&'a NewsItem> {
        if news.is_empty() {
            return Vec::new();
        }
        let start = self.offset % news.len();
        (0..TICKER_WINDOW.min(news.len()))
            .map(|i| &news[(start + i) % news.len()])
            .collect()
    }
}

impl Default for NewsTicker {
    fn default() -> Self {
        Self::new()
    }
}

/// Indicator columns derived from the daily candles, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct Indicators {
    pub closes: Vec<f64>,
    pub sma_50: Vec<f64>,
    pub sma_200: Vec<f64>,
    pub realized_vol: Vec<f64>,
    pub implied_vol: Vec<f64>,
    pub z_score: Vec<f64>,
}

impl Indicators {
    pub fn compute(candles: &[Candle]) -> Self {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let realized_vol = realized_volatility(&closes, 30, 365.0);
        let implied_vol = implied_vol_proxy(&realized_vol);

        Self {
            sma_50: rolling_mean(&closes, 50),
            sma_200: rolling_mean(&closes, 200),
            z_score: z_score(&closes, 200),
            realized_vol,
            implied_vol,
            closes,
        }
    }
}

/// Everything the panels render, refreshed by the background loops.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub market: Vec<Candle>,
    pub indicators: Indicators,
    pub full_history: Vec<PricePoint>,
    pub power_law: Option<PowerLaw>,
    pub seasonality: MonthlyReturns,
    pub macro_series: Vec<MacroSeries>,
    pub fear_greed: Option<FearGreed>,
    pub derivatives: Option<DerivativesSnapshot>,
    pub order_book: Option<OrderBook>,
    pub news: Vec<NewsItem>,
    pub hashrate: Vec<HashrateSample>,
    pub etf: Option<EtfSnapshot>,
    pub live_price: Option<f64>,
    pub live_connected: bool,
    pub last_market_refresh: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candle history and recompute every derived column.
    pub fn set_market(&mut self, candles: Vec<Candle>) {
        self.indicators = Indicators::compute(&candles);
        self.market = candles;
        self.last_market_refresh = Some(Utc::now());
    }

    /// Replace the long-horizon history and refit valuation models.
    pub fn set_full_history(&mut self, points: Vec<PricePoint>) {
        let samples: Vec<(DateTime<Utc>, f64)> =
            points.iter().map(|p| (p.time, p.close)).collect();
        self.power_law = PowerLaw::fit(&samples);
        self.seasonality = monthly_returns(&samples);
        self.full_history = points;
    }

    /// Live price when the feed is healthy, else the last daily close.
    pub fn spot_price(&self) -> Option<f64> {
        if self.live_connected {
            if let Some(price) = self.live_price {
                return Some(price);
            }
        }
        self.market.last().map(|c| c.close)
    }

    /// Close of the bar before the current one.
    pub fn prev_close(&self) -> Option<f64> {
        let n = self.market.len();
        (n >= 2).then(|| self.market[n - 2].close)
    }

    /// Fractional change of spot vs the previous close.
    pub fn price_change(&self) -> Option<f64> {
        let spot = self.spot_price()?;
        let prev = self.prev_close()?;
        (prev > 0.0).then(|| (spot - prev) / prev)
    }

    /// Session high, stretched by the live price when it broke the range.
    pub fn day_high(&self) -> Option<f64> {
        let bar_high = self.market.last()?.high;
        Some(match self.spot_price() {
            Some(spot) => bar_high.max(spot),
            None => bar_high,
        })
    }

    /// Session low, stretched by the live price when it broke the range.
    pub fn day_low(&self) -> Option<f64> {
        let bar_low = self.market.last()?.low;
        Some(match self.spot_price() {
            Some(spot) => bar_low.min(spot),
            None => bar_low,
        })
    }

    /// Spot above the 50-day mean reads as an uptrend.
    pub fn trend_bullish(&self) -> Option<bool> {
        let spot = self.spot_price()?;
        let sma = latest_valid(&self.indicators.sma_50)?;
        Some(spot > sma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candle(i: i64, close: f64) -> Candle {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i);
        Candle {
            time,
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 100.0,
        }
    }

    #[test]
    fn test_rotation_advances_after_dwell() {
        let mut rot = Rotation::new();
        let start = Instant::now();
        let dwell = Duration::from_secs(25);

        assert!(!rot.tick_at(start + Duration::from_secs(10), dwell));
        assert_eq!(rot.current(), View::MarketStructure);

        assert!(rot.tick_at(start + Duration::from_secs(26), dwell));
        assert_eq!(rot.current(), View::Liquidity);
    }

    #[test]
    fn test_rotation_wraps_and_pauses() {
        let mut rot = Rotation::new();
        for _ in 0..View::ALL.len() {
            rot.next();
        }
        assert_eq!(rot.current(), View::MarketStructure);

        rot.toggle_pause();
        let later = Instant::now() + Duration::from_secs(3600);
        assert!(!rot.tick_at(later, Duration::from_secs(25)));
    }

    #[test]
    fn test_rotation_prev_from_first_view() {
        let mut rot = Rotation::new();
        rot.prev();
        assert_eq!(rot.current(), View::Mining);
    }

    #[test]
    fn test_news_ticker_wraps() {
        let mut ticker = NewsTicker::new();
        let news: Vec<NewsItem> = (0..13)
            .map(|i| NewsItem {
                source: "S".to_string(),
                title: format!("headline number {}", i),
                link: "#".to_string(),
                tags: vec!["Bitcoin".to_string()],
                time: Utc::now(),
            })
            .collect();

        let first = ticker.window(&news);
        assert_eq!(first.len(), TICKER_WINDOW);
        assert_eq!(first[0].title, "headline number 0");

        let start = Instant::now();
        ticker.tick_at(start + Duration::from_secs(121), Duration::from_secs(120));
        let second = ticker.window(&news);
        // Offset 10 into 13 items wraps around
        assert_eq!(second[0].title, "headline number 10");
        assert_eq!(second[3].title, "headline number 0");
    }

    #[test]
    fn test_news_ticker_empty_feed() {
        let ticker = NewsTicker::new();
        assert!(ticker.window(&[]).is_empty());
    }

    #[test]
    fn test_spot_price_prefers_live_feed() {
        let mut state = DashboardState::new();
        state.set_market(vec![candle(0, 100.0), candle(1, 110.0)]);

        assert_eq!(state.spot_price(), Some(110.0));
        assert_eq!(state.prev_close(), Some(100.0));

        state.live_price = Some(115.0);
        state.live_connected = false;
        assert_eq!(state.spot_price(), Some(110.0));

        state.live_connected = true;
        assert_eq!(state.spot_price(), Some(115.0));

        // Live price above the bar high stretches the session range
        assert_eq!(state.day_high(), Some(115.0));
        let change = state.price_change().unwrap();
        assert!((change - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_indicators_alignment() {
        let candles: Vec<Candle> = (0..250).map(|i| candle(i, 100.0 + i as f64)).collect();
        let ind = Indicators::compute(&candles);

        assert_eq!(ind.closes.len(), 250);
        assert_eq!(ind.sma_200.len(), 250);
        assert!(ind.sma_200[198].is_nan());
        assert!(ind.sma_200[199].is_finite());
        // Steady uptrend keeps price above both means
        assert!(ind.closes[249] > ind.sma_50[249]);
    }
}
