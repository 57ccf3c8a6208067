//! Volatility indicators.

use market_core::{is_defined, Indicator, MultiOutputIndicator, UNDEFINED};
use serde::{Deserialize, Serialize};

use crate::moving_average::Sma;

/// One Bollinger Bands output point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerPoint {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
}

/// Bollinger Bands.
///
/// Middle band is the SMA of the period; upper/lower bands sit at
/// `multiplier` population standard deviations of the trailing window.
/// Points are undefined wherever the middle band is undefined.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(multiplier > 0.0, "Multiplier must be positive");
        Self { period, multiplier }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerPoint;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerPoint> {
        let middle = Sma::new(self.period).calculate(data);
        let period_f64 = self.period as f64;

        middle
            .iter()
            .enumerate()
            .map(|(i, &mid)| {
                if !is_defined(mid) {
                    return BollingerPoint {
                        upper: UNDEFINED,
                        middle: UNDEFINED,
                        lower: UNDEFINED,
                    };
                }

                let window = &data[i + 1 - self.period..=i];
                let variance =
                    window.iter().map(|x| (x - mid).powi(2)).sum::<f64>() / period_f64;
                let band = self.multiplier * variance.sqrt();

                BollingerPoint {
                    upper: mid + band,
                    middle: mid,
                    lower: mid - band,
                }
            })
            .collect()
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}
