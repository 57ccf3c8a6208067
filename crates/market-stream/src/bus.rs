//! In-process publish/subscribe bus.

use async_trait::async_trait;
use market_core::error::BusError;
use market_core::{BusMessage, Quote, QuoteBus};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tracing::trace;

/// Single-process [`QuoteBus`] backed by an mpsc channel.
///
/// Publishes are delivered into the receiver handed out at construction
/// only for channels with an open subscription; everything else is
/// dropped, matching what a broker-backed bus would do.
pub struct LocalBus {
    subscribed: Mutex<HashSet<String>>,
    tx: UnboundedSender<BusMessage>,
}

impl LocalBus {
    /// Create a bus and the receiver its deliveries arrive on.
    pub fn new() -> (Arc<Self>, UnboundedReceiver<BusMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                subscribed: Mutex::new(HashSet::new()),
                tx,
            }),
            rx,
        )
    }
}

#[async_trait]
impl QuoteBus for LocalBus {
    async fn subscribe(&self, channel: &str) -> Result<(), BusError> {
        self.subscribed.lock().await.insert(channel.to_string());
        Ok(())
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), BusError> {
        self.subscribed.lock().await.remove(channel);
        Ok(())
    }

    async fn publish(&self, channel: &str, quote: &Quote) -> Result<(), BusError> {
        if !self.subscribed.lock().await.contains(channel) {
            trace!(channel, "publish dropped, channel not subscribed");
            return Ok(());
        }

        self.tx
            .send(BusMessage {
                channel: channel.to_string(),
                quote: quote.clone(),
            })
            .map_err(|_| BusError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::AssetClass;

    fn quote(symbol: &str) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            price: 100.0,
            change: 0.0,
            percent_change: 0.0,
            high: 100.0,
            low: 100.0,
            open: 100.0,
            previous_close: 100.0,
            timestamp: 0,
            asset_class: AssetClass::Stock,
            provider: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_publish_requires_subscription() {
        let (bus, mut rx) = LocalBus::new();

        bus.publish("quotes.AAPL", &quote("AAPL")).await.unwrap();
        assert!(rx.try_recv().is_err());

        bus.subscribe("quotes.AAPL").await.unwrap();
        bus.publish("quotes.AAPL", &quote("AAPL")).await.unwrap();

        let msg = rx.try_recv().unwrap();
        assert_eq!(msg.channel, "quotes.AAPL");
        assert_eq!(msg.quote.symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let (bus, mut rx) = LocalBus::new();

        bus.subscribe("quotes.AAPL").await.unwrap();
        bus.unsubscribe("quotes.AAPL").await.unwrap();
        bus.publish("quotes.AAPL", &quote("AAPL")).await.unwrap();

        assert!(rx.try_recv().is_err());
    }
}
