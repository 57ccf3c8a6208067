//! Upstream vendor adapters.

mod finnhub;
mod twelvedata;

pub use finnhub::{FinnhubConfig, FinnhubVendor};
pub use twelvedata::{TwelveDataConfig, TwelveDataVendor};

use market_core::VendorAdapter;
use std::sync::Arc;
use tracing::{debug, info};

/// Build the ordered vendor list from environment configuration.
///
/// Priority is fixed: Finnhub first, Twelve Data second. A vendor whose
/// API key is not set is silently skipped; an empty list is a valid
/// result and puts the aggregator into synthetic-only mode.
pub fn configured_vendors() -> Vec<Arc<dyn VendorAdapter>> {
    let mut vendors: Vec<Arc<dyn VendorAdapter>> = Vec::new();

    match FinnhubVendor::from_env() {
        Ok(v) => {
            info!("Finnhub vendor configured");
            vendors.push(Arc::new(v));
        }
        Err(e) => debug!(error = %e, "Finnhub vendor not configured"),
    }

    match TwelveDataVendor::from_env() {
        Ok(v) => {
            info!("Twelve Data vendor configured");
            vendors.push(Arc::new(v));
        }
        Err(e) => debug!(error = %e, "Twelve Data vendor not configured"),
    }

    vendors
}
