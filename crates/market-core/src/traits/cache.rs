//! Cache collaborator trait definition.

use crate::error::CacheError;
use async_trait::async_trait;
use std::time::Duration;

/// Key-value cache with per-entry expiry.
///
/// Reads and writes are atomic at the key level. Both operations are
/// best-effort from the aggregator's point of view: an error degrades
/// to cache-miss behavior and is never surfaced to callers.
#[async_trait]
pub trait MarketCache: Send + Sync {
    /// Fetch a serialized value, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a serialized value with a time-to-live.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}
