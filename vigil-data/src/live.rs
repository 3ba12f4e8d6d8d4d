//! Live spot price feed over a venue trade WebSocket.
//!
//! Publishes the latest trade price through a `watch` channel with
//! automatic reconnection. The dashboard prefers this price over the last
//! daily close whenever the connection is healthy.

use std::time::Duration;

use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::watch;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Connection status for the live price feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Reconnecting,
}

/// Binance spot trade event (only the price field is used)
#[derive(Debug, Deserialize)]
struct TradeEvent {
    #[serde(rename = "p")]
    price: String,
}

/// Get the trade stream URL from the LIVE_WS_URL env var
fn get_stream_url() -> String {
    std::env::var("LIVE_WS_URL")
        .unwrap_or_else(|_| "wss://stream.binance.com:9443/ws/btcusdt@trade".to_string())
}

/// Spawn the live price handler.
///
/// Returns receivers for the latest price and the connection status; the
/// handler reconnects forever until the process exits.
pub fn spawn_live_price() -> (
    watch::Receiver<Option<f64>>,
    watch::Receiver<ConnectionStatus>,
    tokio::task::JoinHandle<()>,
) {
    let (price_tx, price_rx) = watch::channel(None);
    let (status_tx, status_rx) = watch::channel(ConnectionStatus::Reconnecting);

    let handle = tokio::spawn(async move {
        let url = get_stream_url();
        info!("Starting live price feed for {}", url);

        loop {
            let _ = status_tx.send(ConnectionStatus::Reconnecting);

            match connect_async(&url).await {
                Ok((ws_stream, _)) => {
                    info!("Connected to live price feed at {}", url);
                    let _ = status_tx.send(ConnectionStatus::Connected);

                    let (_, mut read) = ws_stream.split();

                    while let Some(msg) = read.next().await {
                        match msg {
                            Ok(Message::Text(text)) => {
                                match serde_json::from_str::<TradeEvent>(&text) {
                                    Ok(trade) => {
                                        if let Ok(price) = trade.price.parse::<f64>() {
                                            let _ = price_tx.send(Some(price));
                                        }
                                    }
                                    Err(e) => {
                                        debug!("Unparseable trade message: {}", e);
                                    }
                                }
                            }
                            Ok(Message::Close(_)) => {
                                warn!("Live price stream closed by server");
                                break;
                            }
                            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                                // Heartbeat - handled automatically
                            }
                            Err(e) => {
                                error!("Live price stream error: {}", e);
                                break;
                            }
                            _ => {}
                        }
                    }

                    let _ = status_tx.send(ConnectionStatus::Disconnected);
                }
                Err(e) => {
                    error!("Failed to connect to {}: {}", url, e);
                    let _ = status_tx.send(ConnectionStatus::Disconnected);
                }
            }

            debug!("Waiting 5 seconds before reconnecting live price feed...");
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });

    (price_rx, status_rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_event_parse() {
        let raw = r#"{"e":"trade","E":1700000000000,"s":"BTCUSDT","t":1,"p":"37000.10","q":"0.01","T":1700000000000,"m":false,"M":true}"#;
        let event: TradeEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.price, "37000.10");
    }

    #[test]
    fn test_default_stream_url() {
        // Only assert the default shape; the env override is exercised in situ
        assert!(get_stream_url().starts_with("wss://"));
    }
}
