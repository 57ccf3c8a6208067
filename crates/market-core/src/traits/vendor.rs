//! Vendor adapter trait definition.

use crate::error::VendorError;
use crate::types::{AssetClass, Interval, Quote, Series};
use async_trait::async_trait;

/// Capability interface for an upstream market data vendor.
///
/// Adapters own their upstream protocol, symbol-format translation and
/// interval mapping. The aggregator holds an ordered list of this trait
/// and never inspects concrete vendor types; any error is interpreted
/// as "try the next vendor".
#[async_trait]
pub trait VendorAdapter: Send + Sync {
    /// Vendor name, used in logs and in the `provider` field of quotes.
    fn name(&self) -> &str;

    /// Fetch a current quote snapshot.
    async fn get_quote(&self, symbol: &str, asset_class: AssetClass)
        -> Result<Quote, VendorError>;

    /// Fetch a historical bar series, oldest first, at most `limit` bars.
    async fn get_history(
        &self,
        symbol: &str,
        asset_class: AssetClass,
        interval: Interval,
        limit: usize,
    ) -> Result<Series, VendorError>;
}
