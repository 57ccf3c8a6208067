//! Core data types for the market data system.

mod asset_class;
mod interval;
mod ohlcv;
mod quote;

pub use asset_class::AssetClass;
pub use interval::Interval;
pub use ohlcv::{Bar, Series};
pub use quote::Quote;
