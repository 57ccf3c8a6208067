//! Volume-weighted indicators.

use market_core::{Bar, BarIndicator, UNDEFINED};

/// Cumulative Volume-Weighted Average Price (VWAP).
///
/// Accumulates typical price × volume over the full provided history,
/// not a rolling window; callers control the window by how much history
/// they pass in. Positions are undefined while cumulative volume is
/// still zero.
#[derive(Debug, Clone, Default)]
pub struct Vwap;

impl Vwap {
    /// Create a new VWAP indicator.
    pub fn new() -> Self {
        Self
    }
}

impl BarIndicator for Vwap {
    type Output = f64;

    fn calculate_bars(&self, bars: &[Bar]) -> Vec<f64> {
        let mut result = Vec::with_capacity(bars.len());
        let mut cum_pv = 0.0;
        let mut cum_volume = 0.0;

        for bar in bars {
            cum_pv += bar.typical_price() * bar.volume;
            cum_volume += bar.volume;

            if cum_volume == 0.0 {
                result.push(UNDEFINED);
            } else {
                result.push(cum_pv / cum_volume);
            }
        }

        result
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "VWAP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::is_defined;

    fn bar(h: f64, l: f64, c: f64, v: f64) -> Bar {
        Bar::new(0, c, h, l, c, v)
    }

    #[test]
    fn test_vwap_cumulative() {
        let vwap = Vwap::new();
        let bars = vec![bar(12.0, 8.0, 10.0, 100.0), bar(22.0, 18.0, 20.0, 300.0)];

        let result = vwap.calculate_bars(&bars);
        assert_eq!(result.len(), 2);

        // typical prices: 10 and 20
        assert!((result[0] - 10.0).abs() < 1e-10);
        // (10*100 + 20*300) / 400 = 17.5
        assert!((result[1] - 17.5).abs() < 1e-10);
    }

    #[test]
    fn test_vwap_zero_volume_prefix() {
        let vwap = Vwap::new();
        let bars = vec![bar(10.0, 10.0, 10.0, 0.0), bar(20.0, 20.0, 20.0, 50.0)];

        let result = vwap.calculate_bars(&bars);
        assert!(!is_defined(result[0]));
        assert!((result[1] - 20.0).abs() < 1e-10);
    }
}
