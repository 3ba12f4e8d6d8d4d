/// Vigil Data - provider layer for the Vigil TV dashboard
///
/// Every fetcher in this crate is best-effort glue over public market-data
/// endpoints:
/// - cascading fallbacks where several venues serve the same thing
///   (daily OHLCV, the order book)
/// - explicit mock fallbacks where a blank panel would be worse than a
///   clearly-marked simulation (order book, headlines, derivatives)
/// - a reconnecting WebSocket feed for the live spot price
///
/// Providers are swappable collaborators: nothing outside this crate knows
/// which venue a number came from, only whether it was simulated.
pub mod error;
pub mod live;
pub mod mock;
pub mod provider;
pub mod types;

// Re-export commonly used items for convenience
pub use error::DataError;
pub use live::{spawn_live_price, ConnectionStatus};
pub use types::{
    Candle, DerivativesSnapshot, EtfSnapshot, FearGreed, HashrateSample, Level, MacroAsset,
    MacroSeries, NewsItem, OrderBook, PricePoint,
};
