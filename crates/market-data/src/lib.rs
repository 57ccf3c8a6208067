//! Market data aggregation.
//!
//! The aggregator answers quote and history requests by walking an
//! ordered list of vendor adapters with per-call timeouts, backed by an
//! expiring cache. Callers never see an error from this layer: when no
//! vendor is configured or every vendor fails, deterministic synthetic
//! data is returned instead.

mod aggregator;
mod cache;
mod symbols;
pub mod synthetic;
pub mod vendors;

pub use aggregator::MarketAggregator;
pub use cache::MemoryCache;
pub use symbols::format_symbol;
