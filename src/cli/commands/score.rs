//! One-shot consensus scoring command.

use anyhow::Result;
use market_consensus::calculate_stacked_edge;
use market_core::{AssetClass, Interval};
use market_data::vendors::configured_vendors;
use market_data::{MarketAggregator, MemoryCache};
use std::sync::Arc;
use tracing::info;

use crate::cli::ScoreArgs;

pub async fn run(args: ScoreArgs) -> Result<()> {
    let asset_class: AssetClass = args.asset_class.parse().map_err(anyhow::Error::msg)?;
    let interval: Interval = args.interval.parse().map_err(anyhow::Error::msg)?;

    let aggregator = MarketAggregator::new(configured_vendors(), Arc::new(MemoryCache::new()));

    info!(symbol = %args.symbol, %interval, limit = args.limit, "fetching history");
    let series = aggregator
        .get_history(
            &args.symbol,
            asset_class,
            interval,
            args.limit,
            args.country.as_deref(),
        )
        .await;

    let result = calculate_stacked_edge(&series);
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
