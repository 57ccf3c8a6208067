//! Streaming gateway command.

use anyhow::Result;
use market_config::load_config;
use market_data::vendors::configured_vendors;
use market_data::{MarketAggregator, MemoryCache};
use market_stream::{GatewayServer, LocalBus, QuoteGateway, QuotePoller};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    let vendors = configured_vendors();
    info!(
        vendors = vendors.len(),
        app = %config.app.name,
        "assembling market data stack"
    );

    let aggregator = Arc::new(
        MarketAggregator::new(vendors, Arc::new(MemoryCache::new())).with_timeouts(
            Duration::from_secs(config.aggregator.vendor_timeout_secs),
            Duration::from_secs(config.aggregator.quote_ttl_secs),
            Duration::from_secs(config.aggregator.history_ttl_secs),
        ),
    );

    let (bus, bus_rx) = LocalBus::new();
    let gateway = Arc::new(QuoteGateway::new(aggregator.clone(), bus.clone()));

    let _pump = gateway.spawn_pump(bus_rx);
    let _poller = QuotePoller::new(
        aggregator,
        bus,
        gateway.clone(),
        Duration::from_secs(config.aggregator.poll_interval_secs),
    )
    .spawn();

    GatewayServer::new(config.gateway.bind, config.gateway.path, gateway)
        .run()
        .await?;

    Ok(())
}
