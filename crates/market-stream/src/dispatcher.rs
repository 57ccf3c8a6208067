//! Local per-channel quote fan-out.

use market_core::Quote;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tracing::trace;

/// Fans incoming quotes out to the connection handlers registered on
/// each channel.
///
/// Handler ids are unique across the dispatcher's lifetime so a stale
/// deregister can never remove another connection's handler.
#[derive(Debug, Default)]
pub struct QuoteDispatcher {
    next_id: AtomicU64,
    handlers: Mutex<HashMap<String, HashMap<u64, UnboundedSender<Quote>>>>,
}

impl QuoteDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler on a channel, returning its id.
    pub async fn register(&self, channel: &str, tx: UnboundedSender<Quote>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .lock()
            .await
            .entry(channel.to_string())
            .or_default()
            .insert(id, tx);
        id
    }

    /// Remove a handler from a channel. Unknown ids are a no-op.
    pub async fn deregister(&self, channel: &str, id: u64) {
        let mut handlers = self.handlers.lock().await;
        if let Some(channel_handlers) = handlers.get_mut(channel) {
            channel_handlers.remove(&id);
            if channel_handlers.is_empty() {
                handlers.remove(channel);
            }
        }
    }

    /// Deliver a quote to every handler on a channel. Handlers whose
    /// receiving side has gone away are pruned in passing.
    pub async fn dispatch(&self, channel: &str, quote: &Quote) {
        let mut handlers = self.handlers.lock().await;
        let Some(channel_handlers) = handlers.get_mut(channel) else {
            trace!(channel, "quote dropped, no handlers");
            return;
        };

        channel_handlers.retain(|_, tx| tx.send(quote.clone()).is_ok());
        if channel_handlers.is_empty() {
            handlers.remove(channel);
        }
    }

    /// Number of handlers on a channel.
    pub async fn handler_count(&self, channel: &str) -> usize {
        self.handlers
            .lock()
            .await
            .get(channel)
            .map(HashMap::len)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::AssetClass;
    use tokio::sync::mpsc;

    fn quote() -> Quote {
        Quote {
            symbol: "AAPL".to_string(),
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
    async fn test_dispatch_reaches_all_handlers() {
        let dispatcher = QuoteDispatcher::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();

        dispatcher.register("quotes.AAPL", tx_a).await;
        dispatcher.register("quotes.AAPL", tx_b).await;
        dispatcher.dispatch("quotes.AAPL", &quote()).await;

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_deregister_stops_delivery() {
        let dispatcher = QuoteDispatcher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let id = dispatcher.register("quotes.AAPL", tx).await;
        dispatcher.deregister("quotes.AAPL", id).await;
        dispatcher.dispatch("quotes.AAPL", &quote()).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(dispatcher.handler_count("quotes.AAPL").await, 0);
    }

    #[tokio::test]
    async fn test_closed_handlers_are_pruned() {
        let dispatcher = QuoteDispatcher::new();
        let (tx, rx) = mpsc::unbounded_channel();

        dispatcher.register("quotes.AAPL", tx).await;
        drop(rx);
        dispatcher.dispatch("quotes.AAPL", &quote()).await;

        assert_eq!(dispatcher.handler_count("quotes.AAPL").await, 0);
    }

    #[tokio::test]
    async fn test_ids_are_unique_across_channels() {
        let dispatcher = QuoteDispatcher::new();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();

        let a = dispatcher.register("quotes.AAPL", tx_a).await;
        let b = dispatcher.register("quotes.MSFT", tx_b).await;
        assert_ne!(a, b);
    }
}
