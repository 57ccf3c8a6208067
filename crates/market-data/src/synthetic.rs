//! Deterministic synthetic market data.
//!
//! Used when no vendor is configured or every configured vendor fails;
//! the shape is a function of the symbol alone so repeated calls are
//! stable.

use chrono::Utc;
use market_core::{AssetClass, Bar, Interval, Quote, Series};

/// Provider name stamped on synthesized quotes.
pub const SYNTHETIC_PROVIDER: &str = "synthetic";

/// FNV-1a over the symbol, the seed for all synthesized shapes.
fn symbol_seed(symbol: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in symbol.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Base price derived from the symbol, between 5.00 and 505.00.
fn base_price(seed: u64) -> f64 {
    5.0 + (seed % 50_000) as f64 / 100.0
}

/// Synthesize a plausible quote snapshot for a symbol.
pub fn synth_quote(symbol: &str, asset_class: AssetClass) -> Quote {
    let seed = symbol_seed(symbol);
    let price = base_price(seed);

    // Deterministic sub-percent daily move, sign from the seed parity
    let magnitude = (seed >> 8 & 0xff) as f64 / 255.0; // 0..1
    let percent_change = if seed & 1 == 0 { magnitude } else { -magnitude };
    let previous_close = price / (1.0 + percent_change / 100.0);
    let change = price - previous_close;

    Quote {
        symbol: symbol.to_string(),
        price,
        change,
        percent_change,
        high: price * 1.01,
        low: price * 0.99,
        open: previous_close,
        previous_close,
        timestamp: Utc::now().timestamp_millis(),
        asset_class,
        provider: SYNTHETIC_PROVIDER.to_string(),
    }
}

/// Synthesize a bar series of exactly `limit` bars, oldest first, ending
/// at the current time bucket.
pub fn synth_history(symbol: &str, interval: Interval, limit: usize) -> Series {
    let seed = symbol_seed(symbol);
    let base = base_price(seed);
    let step_ms = interval.as_millis();
    let now = Utc::now().timestamp_millis();

    let bars = (0..limit)
        .map(|i| {
            let age = (limit - 1 - i) as i64;
            let timestamp = now - age * step_ms;

            // Smooth wobble around the base plus a slight drift so the
            // series is neither flat nor monotonic
            let t = i as f64;
            let phase = (seed % 628) as f64 / 100.0;
            let wobble = (t / 9.0 + phase).sin() * base * 0.02;
            let drift = t * base * 0.0002;

            let close = base + wobble + drift;
            let open = base + ((t - 1.0) / 9.0 + phase).sin() * base * 0.02 + drift;
            let high = close.max(open) * 1.005;
            let low = close.min(open) * 0.995;
            let volume = 10_000.0 + ((seed >> 16) % 90_000) as f64 + (t * 7.0) % 1000.0;

            Bar::new(timestamp, open, high, low, close, volume)
        })
        .collect();

    Series::new(symbol, interval, bars)
}
