//! Background quote poller.

use market_core::QuoteBus;
use market_data::MarketAggregator;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::gateway::{channel_for, QuoteGateway};

/// Periodically fetches a quote for every actively subscribed symbol
/// and publishes it onto the bus. The in-process stand-in for an
/// upstream streaming feed.
pub struct QuotePoller {
    aggregator: Arc<MarketAggregator>,
    bus: Arc<dyn QuoteBus>,
    gateway: Arc<QuoteGateway>,
    interval: Duration,
}

impl QuotePoller {
    pub fn new(
        aggregator: Arc<MarketAggregator>,
        bus: Arc<dyn QuoteBus>,
        gateway: Arc<QuoteGateway>,
        interval: Duration,
    ) -> Self {
        Self {
            aggregator,
            bus,
            gateway,
            interval,
        }
    }

    /// Run the poll loop until the task is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let symbols = self.gateway.active_symbols().await;
                if symbols.is_empty() {
                    continue;
                }
                debug!(count = symbols.len(), "polling active symbols");

                for (symbol, asset_class) in symbols {
                    let quote = self.aggregator.get_quote(&symbol, asset_class, None).await;
                    let channel = channel_for(&symbol);
                    if let Err(e) = self.bus.publish(&channel, &quote).await {
                        warn!(channel, error = %e, "publish failed");
                    }
                }
            }
        })
    }
}
