//! Trait seams for the market data system.

mod bus;
mod cache;
mod indicator;
mod vendor;

pub use bus::{BusMessage, QuoteBus};
pub use cache::MarketCache;
pub use indicator::{is_defined, BarIndicator, Indicator, MultiOutputIndicator, UNDEFINED};
pub use vendor::VendorAdapter;
