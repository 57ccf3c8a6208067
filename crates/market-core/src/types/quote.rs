//! Quote snapshot type.

use serde::{Deserialize, Serialize};

use super::AssetClass;

/// A single current-price snapshot for one symbol.
///
/// Produced fresh on each aggregator call or cache hit; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol
    pub symbol: String,
    /// Last traded price
    pub price: f64,
    /// Absolute change from the previous close
    pub change: f64,
    /// Percent change from the previous close
    pub percent_change: f64,
    /// Session high
    pub high: f64,
    /// Session low
    pub low: f64,
    /// Session open
    pub open: f64,
    /// Previous session close
    pub previous_close: f64,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Asset class of the instrument
    pub asset_class: AssetClass,
    /// Name of the vendor that produced the snapshot
    pub provider: String,
}
