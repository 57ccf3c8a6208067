//! Momentum indicators.

use market_core::{Indicator, MultiOutputIndicator, UNDEFINED};
use serde::{Deserialize, Serialize};

use crate::moving_average::Ema;

/// Relative Strength Index (RSI) with Wilder smoothing.
///
/// The output carries one undefined position per price that lacks a
/// prior delta, plus the accumulation window: the first defined value
/// sits at index `period`.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator. The common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// An average loss of zero is treated as RS = 100 rather than a
    /// division by zero, so a pure uptrend tops out just below 100.
    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        let rs = if avg_loss == 0.0 {
            100.0
        } else {
            avg_gain / avg_loss
        };
        100.0 - 100.0 / (1.0 + rs)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![UNDEFINED; data.len()];
        if data.len() <= self.period {
            return result;
        }

        let period_f64 = self.period as f64;
        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;

        // Raw accumulation over the first `period` deltas
        for i in 1..=self.period {
            let change = data[i] - data[i - 1];
            if change > 0.0 {
                gain_sum += change;
            } else {
                loss_sum -= change;
            }
        }

        let mut avg_gain = gain_sum / period_f64;
        let mut avg_loss = loss_sum / period_f64;
        result[self.period] = Self::rsi_from_averages(avg_gain, avg_loss);

        // Wilder smoothing: avg = (prev * (period-1) + value) / period
        for i in (self.period + 1)..data.len() {
            let change = data[i] - data[i - 1];
            let (gain, loss) = if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            };

            avg_gain = (avg_gain * (period_f64 - 1.0) + gain) / period_f64;
            avg_loss = (avg_loss * (period_f64 - 1.0) + loss) / period_f64;
            result[i] = Self::rsi_from_averages(avg_gain, avg_loss);
        }

        result
    }

    fn min_bars(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// One MACD output point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdPoint {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of the MACD line)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD (Moving Average Convergence Divergence).
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdPoint;

    fn calculate(&self, data: &[f64]) -> Vec<MacdPoint> {
        let fast = Ema::new(self.fast_period).calculate(data);
        let slow = Ema::new(self.slow_period).calculate(data);

        let macd_line: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();

        // The signal EMA runs over the defined span of the MACD line and
        // is left-padded back to the input length.
        let signal_line = Ema::new(self.signal_period).calculate_defined(&macd_line);

        macd_line
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| MacdPoint {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
