//! Background refresh loops, one per data source.
//!
//! Every loop is best-effort: a failed cycle logs a warning and leaves the
//! previous snapshot in place, so panels degrade to stale (or clearly
//! simulated) data instead of going blank. Each loop fetches immediately
//! on startup, then settles into its cadence.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};
use vigil_data::provider::{book, derivatives, etf, macros, news, onchain, sentiment, spot};

use crate::app::DashboardState;
use crate::config;

/// Refresh cadences per source.
const MARKET_EVERY: Duration = Duration::from_secs(600);
const FULL_HISTORY_EVERY: Duration = Duration::from_secs(3600);
const BOOK_EVERY: Duration = Duration::from_secs(30);
const DERIVATIVES_EVERY: Duration = Duration::from_secs(120);
const SENTIMENT_EVERY: Duration = Duration::from_secs(600);
const MACRO_EVERY: Duration = Duration::from_secs(600);
const NEWS_EVERY: Duration = Duration::from_secs(600);
const ETF_EVERY: Duration = Duration::from_secs(600);
const HASHRATE_EVERY: Duration = Duration::from_secs(3600);

/// Days of daily history backing the indicator columns (2 years).
const MARKET_DAYS: usize = 730;
/// Headlines kept for the ticker.
const NEWS_LIMIT: usize = 40;

/// Spawn all refresh loops. Handles are detached; the loops run until the
/// process exits.
pub fn spawn_refresh_tasks(state: Arc<Mutex<DashboardState>>) -> Vec<tokio::task::JoinHandle<()>> {
    let mut handles = Vec::new();

    handles.push(spawn_market(Arc::clone(&state)));
    handles.push(spawn_full_history(Arc::clone(&state)));
    handles.push(spawn_book(Arc::clone(&state)));
    handles.push(spawn_derivatives(Arc::clone(&state)));
    handles.push(spawn_sentiment(Arc::clone(&state)));
    handles.push(spawn_macro(Arc::clone(&state)));
    handles.push(spawn_news(Arc::clone(&state)));
    handles.push(spawn_etf(Arc::clone(&state)));
    handles.push(spawn_hashrate(state));

    handles
}

fn spawn_market(state: Arc<Mutex<DashboardState>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(MARKET_EVERY);
        loop {
            interval.tick().await;
            match spot::fetch_daily_history(MARKET_DAYS).await {
                Ok(candles) => {
                    info!(bars = candles.len(), "daily history refreshed");
                    state.lock().await.set_market(candles);
                }
                Err(e) => warn!(error = %e, "daily history refresh failed"),
            }
        }
    })
}

fn spawn_full_history(state: Arc<Mutex<DashboardState>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(FULL_HISTORY_EVERY);
        loop {
            interval.tick().await;
            match spot::fetch_full_history().await {
                Ok(points) => {
                    info!(samples = points.len(), "full history refreshed");
                    state.lock().await.set_full_history(points);
                }
                Err(e) => warn!(error = %e, "full history refresh failed"),
            }
        }
    })
}

fn spawn_book(state: Arc<Mutex<DashboardState>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(BOOK_EVERY);
        loop {
            interval.tick().await;
            let last_price = state.lock().await.spot_price().unwrap_or(0.0);
            let book = book::fetch_order_book_or_mock(last_price, config::book_depth()).await;
            state.lock().await.order_book = Some(book);
        }
    })
}

fn spawn_derivatives(state: Arc<Mutex<DashboardState>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(DERIVATIVES_EVERY);
        loop {
            interval.tick().await;
            let snapshot = derivatives::fetch_derivatives().await;
            state.lock().await.derivatives = Some(snapshot);
        }
    })
}

fn spawn_sentiment(state: Arc<Mutex<DashboardState>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SENTIMENT_EVERY);
        loop {
            interval.tick().await;
            let reading = sentiment::fetch_fear_greed_or_neutral().await;
            state.lock().await.fear_greed = Some(reading);
        }
    })
}

fn spawn_macro(state: Arc<Mutex<DashboardState>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(MACRO_EVERY);
        loop {
            interval.tick().await;
            let series = macros::fetch_macro_series("6mo").await;
            if !series.is_empty() {
                state.lock().await.macro_series = series;
            }
        }
    })
}

fn spawn_news(state: Arc<Mutex<DashboardState>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(NEWS_EVERY);
        loop {
            interval.tick().await;
            let headlines = news::fetch_headlines(NEWS_LIMIT).await;
            state.lock().await.news = headlines;
        }
    })
}

fn spawn_etf(state: Arc<Mutex<DashboardState>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ETF_EVERY);
        loop {
            interval.tick().await;
            if let Some(snapshot) = etf::fetch_etf_snapshot(config::etf_symbol()).await {
                state.lock().await.etf = Some(snapshot);
            }
        }
    })
}

fn spawn_hashrate(state: Arc<Mutex<DashboardState>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HASHRATE_EVERY);
        loop {
            interval.tick().await;
            match onchain::fetch_hashrate("1year").await {
                Ok(samples) => {
                    info!(samples = samples.len(), "hash rate refreshed");
                    state.lock().await.hashrate = samples;
                }
                Err(e) => warn!(error = %e, "hash rate refresh failed"),
            }
        }
    })
}
