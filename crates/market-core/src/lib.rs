//! Core types and traits for the market data system.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Quote, Bar, Series)
//! - Interval and asset-class enums
//! - Trait seams for vendor adapters, the cache collaborator,
//!   the publish/subscribe bus, and indicator families

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CacheError, MarketError, MarketResult};
pub use traits::*;
pub use types::*;
