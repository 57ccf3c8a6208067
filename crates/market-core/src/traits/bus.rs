//! Publish/subscribe bus trait definition.

use crate::error::BusError;
use crate::types::Quote;
use async_trait::async_trait;

/// A message delivered on the shared bus.
#[derive(Debug, Clone)]
pub struct BusMessage {
    /// Channel the payload was published on
    pub channel: String,
    /// The quote payload
    pub quote: Quote,
}

/// Shared publish/subscribe bus for live quote updates.
///
/// Delivery ordering per channel follows the bus's own guarantee
/// (assumed at-least-once, order-preserving per publisher); consumers
/// do not re-order or de-duplicate.
#[async_trait]
pub trait QuoteBus: Send + Sync {
    /// Open the upstream subscription for a channel.
    async fn subscribe(&self, channel: &str) -> Result<(), BusError>;

    /// Tear down the upstream subscription for a channel.
    async fn unsubscribe(&self, channel: &str) -> Result<(), BusError>;

    /// Publish a quote onto a channel.
    async fn publish(&self, channel: &str, quote: &Quote) -> Result<(), BusError>;
}
