//! OHLCV bar and series types.

use serde::{Deserialize, Serialize};

use super::Interval;

/// A single time-bucketed OHLCV record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Typical price (HLC average), the price input for VWAP.
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// True range against the previous close (standard three-way max).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }
}

/// Ordered-by-time sequence of bars for one symbol/interval pair.
///
/// Ordering is oldest-first and is an invariant consumers rely on;
/// constructors that ingest unordered vendor payloads must call
/// [`Series::sort_by_time`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    /// Symbol identifier
    pub symbol: String,
    /// Bar interval
    pub interval: Interval,
    /// Bars, oldest first
    pub bars: Vec<Bar>,
}

impl Series {
    /// Create a new series. Bars are sorted oldest-first on entry.
    pub fn new(symbol: impl Into<String>, interval: Interval, bars: Vec<Bar>) -> Self {
        let mut series = Self {
            symbol: symbol.into(),
            interval,
            bars,
        };
        series.sort_by_time();
        series
    }

    /// Re-establish the oldest-first ordering invariant.
    pub fn sort_by_time(&mut self) {
        self.bars.sort_by_key(|b| b.timestamp);
    }

    /// Number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get the most recent bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Extract close prices.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract high prices.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Extract low prices.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Extract volumes.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_calculations() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1_000_000.0);

        assert!((bar.typical_price() - 103.333333).abs() < 0.001);
        assert!((bar.true_range(None) - 15.0).abs() < 0.001);
        // Gap against the previous close widens the true range
        assert!((bar.true_range(Some(90.0)) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_series_sorts_on_construction() {
        let series = Series::new(
            "AAPL",
            Interval::Day1,
            vec![
                Bar::new(3, 1.0, 1.0, 1.0, 1.0, 1.0),
                Bar::new(1, 1.0, 1.0, 1.0, 1.0, 1.0),
                Bar::new(2, 1.0, 1.0, 1.0, 1.0, 1.0),
            ],
        );

        let stamps: Vec<i64> = series.bars.iter().map(|b| b.timestamp).collect();
        assert_eq!(stamps, vec![1, 2, 3]);
        assert_eq!(series.last().unwrap().timestamp, 3);
    }

    #[test]
    fn test_series_extractions() {
        let series = Series::new(
            "AAPL",
            Interval::Day1,
            vec![
                Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0),
                Bar::new(2, 100.5, 102.0, 100.0, 101.5, 2000.0),
            ],
        );

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.volumes(), vec![1000.0, 2000.0]);
        assert_eq!(series.len(), 2);
    }
}
