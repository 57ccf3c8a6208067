//! Validate configuration command.

use anyhow::Result;
use market_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Gateway bind: {}", config.gateway.bind);
            println!("Gateway path: {}", config.gateway.path);
            println!("Vendor timeout: {}s", config.aggregator.vendor_timeout_secs);
            println!("Quote TTL: {}s", config.aggregator.quote_ttl_secs);
            println!("History TTL: {}s", config.aggregator.history_ttl_secs);
            println!("Poll interval: {}s", config.aggregator.poll_interval_secs);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
