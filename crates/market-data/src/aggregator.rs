//! The vendor-fallback data aggregator.

use market_core::{AssetClass, Interval, MarketCache, Quote, Series, VendorAdapter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::symbols::format_symbol;
use crate::synthetic;

const DEFAULT_VENDOR_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_QUOTE_TTL: Duration = Duration::from_secs(10);
const DEFAULT_HISTORY_TTL: Duration = Duration::from_secs(30 * 60);

/// Aggregates quotes and history across an ordered list of vendor
/// adapters with per-call timeouts, a shared expiring cache, and a
/// synthetic-data fallback.
///
/// Fallback is sequential, not parallel: each vendor is awaited in turn
/// and individually raced against the timeout, trading worst-case
/// latency for not fanning out paid API calls on every request. Losing
/// the race drops the adapter future, which cancels the in-flight HTTP
/// call.
///
/// No method on this type can fail from the caller's point of view.
pub struct MarketAggregator {
    vendors: Vec<Arc<dyn VendorAdapter>>,
    cache: Arc<dyn MarketCache>,
    vendor_timeout: Duration,
    quote_ttl: Duration,
    history_ttl: Duration,
}

impl MarketAggregator {
    /// Create an aggregator with default timeout and TTLs.
    pub fn new(vendors: Vec<Arc<dyn VendorAdapter>>, cache: Arc<dyn MarketCache>) -> Self {
        Self {
            vendors,
            cache,
            vendor_timeout: DEFAULT_VENDOR_TIMEOUT,
            quote_ttl: DEFAULT_QUOTE_TTL,
            history_ttl: DEFAULT_HISTORY_TTL,
        }
    }

    /// Override the per-vendor-call timeout and the cache TTLs.
    pub fn with_timeouts(
        mut self,
        vendor_timeout: Duration,
        quote_ttl: Duration,
        history_ttl: Duration,
    ) -> Self {
        self.vendor_timeout = vendor_timeout;
        self.quote_ttl = quote_ttl;
        self.history_ttl = history_ttl;
        self
    }

    /// Fetch a current quote for a symbol.
    pub async fn get_quote(
        &self,
        symbol: &str,
        asset_class: AssetClass,
        country: Option<&str>,
    ) -> Quote {
        let symbol = format_symbol(symbol, asset_class, country);

        if self.vendors.is_empty() {
            debug!(symbol = %symbol, "no vendors configured, synthesizing quote");
            return synthetic::synth_quote(&symbol, asset_class);
        }

        let key = format!("quote:{}:{}", symbol, asset_class);
        if let Some(quote) = self.cache_read::<Quote>(&key).await {
            return quote;
        }

        for vendor in &self.vendors {
            match timeout(self.vendor_timeout, vendor.get_quote(&symbol, asset_class)).await {
                Ok(Ok(quote)) => {
                    self.cache_write(&key, &quote, self.quote_ttl).await;
                    return quote;
                }
                Ok(Err(e)) => {
                    warn!(vendor = vendor.name(), symbol = %symbol, error = %e,
                          "vendor quote failed, trying next");
                }
                Err(_) => {
                    warn!(vendor = vendor.name(), symbol = %symbol,
                          timeout_secs = self.vendor_timeout.as_secs(),
                          "vendor quote timed out, trying next");
                }
            }
        }

        warn!(symbol = %symbol, "all vendors exhausted, synthesizing quote");
        synthetic::synth_quote(&symbol, asset_class)
    }

    /// Fetch a historical bar series for a symbol, oldest first.
    pub async fn get_history(
        &self,
        symbol: &str,
        asset_class: AssetClass,
        interval: Interval,
        limit: usize,
        country: Option<&str>,
    ) -> Series {
        let symbol = format_symbol(symbol, asset_class, country);

        if self.vendors.is_empty() {
            debug!(symbol = %symbol, "no vendors configured, synthesizing history");
            return synthetic::synth_history(&symbol, interval, limit);
        }

        let key = format!("hist:{}:{}:{}:{}", symbol, asset_class, interval, limit);
        if let Some(series) = self.cache_read::<Series>(&key).await {
            return series;
        }

        for vendor in &self.vendors {
            match timeout(
                self.vendor_timeout,
                vendor.get_history(&symbol, asset_class, interval, limit),
            )
            .await
            {
                Ok(Ok(series)) if !series.is_empty() => {
                    self.cache_write(&key, &series, self.history_ttl).await;
                    return series;
                }
                Ok(Ok(_)) => {
                    warn!(vendor = vendor.name(), symbol = %symbol,
                          "vendor returned empty history, trying next");
                }
                Ok(Err(e)) => {
                    warn!(vendor = vendor.name(), symbol = %symbol, error = %e,
                          "vendor history failed, trying next");
                }
                Err(_) => {
                    warn!(vendor = vendor.name(), symbol = %symbol,
                          timeout_secs = self.vendor_timeout.as_secs(),
                          "vendor history timed out, trying next");
                }
            }
        }

        warn!(symbol = %symbol, "all vendors exhausted, synthesizing history");
        synthetic::synth_history(&symbol, interval, limit)
    }

    /// Best-effort cache read; backend or decode errors degrade to a
    /// miss.
    async fn cache_read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key, error = %e, "cache entry failed to decode, treating as miss");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Best-effort cache write.
    async fn cache_write<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "cache value failed to encode, skipping write");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, &raw, ttl).await {
            warn!(key, error = %e, "cache write failed, continuing");
        }
    }
}
