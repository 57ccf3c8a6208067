//! Subscription lifecycle orchestration.

use market_core::{AssetClass, BusMessage, Quote, QuoteBus};
use market_data::MarketAggregator;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::dispatcher::QuoteDispatcher;
use crate::registry::ChannelRegistry;
use crate::session::Session;

/// Bus channel for a symbol's quote stream.
pub fn channel_for(symbol: &str) -> String {
    format!("quotes.{}", symbol.to_uppercase())
}

/// Ties the per-connection sessions together: reference-counts channel
/// interest, registers fan-out handlers, opens and closes upstream bus
/// subscriptions exactly once per channel, and serves snapshot quotes
/// on subscribe.
pub struct QuoteGateway {
    aggregator: Arc<MarketAggregator>,
    bus: Arc<dyn QuoteBus>,
    registry: ChannelRegistry,
    dispatcher: QuoteDispatcher,
    // channel -> (symbol, asset class), for the poller
    symbols: Mutex<HashMap<String, (String, AssetClass)>>,
}

impl QuoteGateway {
    pub fn new(aggregator: Arc<MarketAggregator>, bus: Arc<dyn QuoteBus>) -> Self {
        Self {
            aggregator,
            bus,
            registry: ChannelRegistry::new(),
            dispatcher: QuoteDispatcher::new(),
            symbols: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe a connection to a symbol's quote channel.
    ///
    /// Idempotent per connection: a repeat subscribe on the same session
    /// does nothing. A snapshot quote is pushed immediately so the
    /// client renders without waiting for the next live update.
    pub async fn handle_subscribe(
        &self,
        session: &mut Session,
        symbol: &str,
        asset_class: AssetClass,
        tx: &UnboundedSender<Quote>,
    ) {
        let channel = channel_for(symbol);
        if session.is_subscribed(&channel) {
            debug!(session = %session.id, channel, "duplicate subscribe ignored");
            return;
        }

        let snapshot = self.aggregator.get_quote(symbol, asset_class, None).await;
        if tx.send(snapshot).is_err() {
            debug!(session = %session.id, channel, "connection gone before snapshot");
            return;
        }

        let handler_id = self.dispatcher.register(&channel, tx.clone()).await;
        session.track(&channel, handler_id);
        debug!(session = %session.id, channel, handler_id, "subscribed");

        if self.registry.retain(&channel).await {
            self.symbols
                .lock()
                .await
                .insert(channel.clone(), (symbol.to_uppercase(), asset_class));
            if let Err(e) = self.bus.subscribe(&channel).await {
                warn!(channel, error = %e, "bus subscribe failed");
            }
        }
    }

    /// Unsubscribe a connection from a symbol's quote channel. Unknown
    /// channels are a no-op.
    pub async fn handle_unsubscribe(&self, session: &mut Session, symbol: &str) {
        let channel = channel_for(symbol);
        let Some(handler_id) = session.untrack(&channel) else {
            debug!(session = %session.id, channel, "unsubscribe for untracked channel ignored");
            return;
        };

        self.teardown(&channel, handler_id).await;
        debug!(session = %session.id, channel, "unsubscribed");
    }

    /// Tear down every subscription a connection holds.
    pub async fn handle_disconnect(&self, session: &mut Session) {
        for (channel, handler_id) in session.drain() {
            self.teardown(&channel, handler_id).await;
        }
        debug!(session = %session.id, "session torn down");
    }

    async fn teardown(&self, channel: &str, handler_id: u64) {
        self.dispatcher.deregister(channel, handler_id).await;

        if self.registry.release(channel).await {
            self.symbols.lock().await.remove(channel);
            if let Err(e) = self.bus.unsubscribe(channel).await {
                warn!(channel, error = %e, "bus unsubscribe failed");
            }
        }
    }

    /// Fan a bus delivery out to the channel's handlers.
    pub async fn dispatch(&self, msg: &BusMessage) {
        self.dispatcher.dispatch(&msg.channel, &msg.quote).await;
    }

    /// Symbols with at least one live subscriber, with their asset class.
    pub async fn active_symbols(&self) -> Vec<(String, AssetClass)> {
        self.symbols.lock().await.values().cloned().collect()
    }

    /// Run the pump that moves bus deliveries into the dispatcher.
    pub fn spawn_pump(
        self: &Arc<Self>,
        mut rx: UnboundedReceiver<BusMessage>,
    ) -> JoinHandle<()> {
        let gateway = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                gateway.dispatch(&msg).await;
            }
            debug!("bus pump stopped, sender side closed");
        })
    }

    #[cfg(test)]
    async fn channel_refcount(&self, channel: &str) -> usize {
        self.registry.count(channel).await
    }

    #[cfg(test)]
    async fn handler_count(&self, channel: &str) -> usize {
        self.dispatcher.handler_count(channel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use market_core::error::BusError;
    use market_data::synthetic::SYNTHETIC_PROVIDER;
    use market_data::MemoryCache;
    use tokio::sync::mpsc;

    /// Bus stub that counts subscribe/unsubscribe calls per channel.
    #[derive(Default)]
    struct RecordingBus {
        calls: Mutex<HashMap<String, (usize, usize)>>,
    }

    impl RecordingBus {
        async fn counts(&self, channel: &str) -> (usize, usize) {
            self.calls.lock().await.get(channel).copied().unwrap_or((0, 0))
        }
    }

    #[async_trait]
    impl QuoteBus for RecordingBus {
        async fn subscribe(&self, channel: &str) -> Result<(), BusError> {
            self.calls.lock().await.entry(channel.to_string()).or_default().0 += 1;
            Ok(())
        }

        async fn unsubscribe(&self, channel: &str) -> Result<(), BusError> {
            self.calls.lock().await.entry(channel.to_string()).or_default().1 += 1;
            Ok(())
        }

        async fn publish(&self, _channel: &str, _quote: &Quote) -> Result<(), BusError> {
            Ok(())
        }
    }

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

    fn gateway_with_bus() -> (Arc<QuoteGateway>, Arc<RecordingBus>) {
        let bus = Arc::new(RecordingBus::default());
        // No vendors: snapshots come from the synthetic generator
        let aggregator = Arc::new(MarketAggregator::new(vec![], Arc::new(MemoryCache::new())));
        (
            Arc::new(QuoteGateway::new(aggregator, bus.clone())),
            bus,
        )
    }

    #[test]
    fn test_channel_name() {
        assert_eq!(channel_for("aapl"), "quotes.AAPL");
        assert_eq!(channel_for("AAPL"), "quotes.AAPL");
    }

    #[tokio::test]
    async fn test_subscribe_pushes_snapshot() {
        let (gateway, _bus) = gateway_with_bus();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new();

        gateway
            .handle_subscribe(&mut session, "AAPL", AssetClass::Stock, &tx)
            .await;

        let snapshot = rx.try_recv().unwrap();
        assert_eq!(snapshot.symbol, "AAPL");
        assert_eq!(snapshot.provider, SYNTHETIC_PROVIDER);
    }

    #[tokio::test]
    async fn test_first_subscriber_opens_bus_once() {
        let (gateway, bus) = gateway_with_bus();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();
        let mut a = Session::new();
        let mut b = Session::new();

        gateway.handle_subscribe(&mut a, "AAPL", AssetClass::Stock, &tx_a).await;
        gateway.handle_subscribe(&mut b, "AAPL", AssetClass::Stock, &tx_b).await;

        assert_eq!(bus.counts("quotes.AAPL").await, (1, 0));
        assert_eq!(gateway.channel_refcount("quotes.AAPL").await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_subscribe_is_idempotent() {
        let (gateway, bus) = gateway_with_bus();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new();

        gateway.handle_subscribe(&mut session, "AAPL", AssetClass::Stock, &tx).await;
        gateway.handle_subscribe(&mut session, "AAPL", AssetClass::Stock, &tx).await;

        assert_eq!(bus.counts("quotes.AAPL").await, (1, 0));
        assert_eq!(gateway.channel_refcount("quotes.AAPL").await, 1);
        assert_eq!(gateway.handler_count("quotes.AAPL").await, 1);

        // One snapshot, not two
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_last_unsubscribe_closes_bus() {
        let (gateway, bus) = gateway_with_bus();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();
        let mut a = Session::new();
        let mut b = Session::new();

        gateway.handle_subscribe(&mut a, "AAPL", AssetClass::Stock, &tx_a).await;
        gateway.handle_subscribe(&mut b, "AAPL", AssetClass::Stock, &tx_b).await;

        gateway.handle_unsubscribe(&mut a, "AAPL").await;
        assert_eq!(bus.counts("quotes.AAPL").await, (1, 0));

        gateway.handle_unsubscribe(&mut b, "AAPL").await;
        assert_eq!(bus.counts("quotes.AAPL").await, (1, 1));
        assert_eq!(gateway.channel_refcount("quotes.AAPL").await, 0);
        assert!(gateway.active_symbols().await.is_empty());
    }

    #[tokio::test]
    async fn test_unsubscribe_untracked_is_noop() {
        let (gateway, bus) = gateway_with_bus();
        let mut session = Session::new();

        gateway.handle_unsubscribe(&mut session, "AAPL").await;

        assert_eq!(bus.counts("quotes.AAPL").await, (0, 0));
        assert_eq!(gateway.channel_refcount("quotes.AAPL").await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_tears_down_everything() {
        let (gateway, bus) = gateway_with_bus();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new();

        gateway.handle_subscribe(&mut session, "AAPL", AssetClass::Stock, &tx).await;
        gateway.handle_subscribe(&mut session, "MSFT", AssetClass::Stock, &tx).await;
        gateway.handle_disconnect(&mut session).await;

        assert_eq!(bus.counts("quotes.AAPL").await, (1, 1));
        assert_eq!(bus.counts("quotes.MSFT").await, (1, 1));
        assert_eq!(session.subscription_count(), 0);

        // Drain the snapshots, then verify no live delivery arrives
        while rx.try_recv().is_ok() {}
        gateway
            .dispatch(&BusMessage {
                channel: "quotes.AAPL".to_string(),
                quote: quote("AAPL"),
            })
            .await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dispatch_reaches_live_subscribers() {
        let (gateway, _bus) = gateway_with_bus();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new();

        gateway.handle_subscribe(&mut session, "AAPL", AssetClass::Stock, &tx).await;
        while rx.try_recv().is_ok() {}

        gateway
            .dispatch(&BusMessage {
                channel: "quotes.AAPL".to_string(),
                quote: quote("AAPL"),
            })
            .await;

        assert_eq!(rx.try_recv().unwrap().symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_pump_moves_bus_messages() {
        let (gateway, _bus) = gateway_with_bus();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new();

        gateway.handle_subscribe(&mut session, "AAPL", AssetClass::Stock, &tx).await;
        while rx.try_recv().is_ok() {}

        let (bus_tx, bus_rx) = mpsc::unbounded_channel();
        let pump = gateway.spawn_pump(bus_rx);

        bus_tx
            .send(BusMessage {
                channel: "quotes.AAPL".to_string(),
                quote: quote("AAPL"),
            })
            .unwrap();
        drop(bus_tx);
        pump.await.unwrap();

        assert_eq!(rx.try_recv().unwrap().symbol, "AAPL");
    }
}
