//! Moving average indicators.

use market_core::{is_defined, Indicator, UNDEFINED};

/// Simple Moving Average (SMA).
///
/// Output position `i` is the mean of the `period` inputs ending at
/// `i`; earlier positions are undefined.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![UNDEFINED; data.len()];
        if data.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;

        // Sliding window sum
        let mut sum: f64 = data[..self.period].iter().sum();
        result[self.period - 1] = sum / period_f64;

        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result[i] = sum / period_f64;
        }

        result
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeded at the first input value, so there is no warm-up gap: every
/// output position is defined. Smoothing factor k = 2 / (period + 1).
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self { period, multiplier }
    }

    /// EMA of only the defined positions of `data`, left-padded back to
    /// the input length. Used to chain EMAs over outputs that carry
    /// leading undefined markers (e.g. the MACD signal line).
    pub fn calculate_defined(&self, data: &[f64]) -> Vec<f64> {
        let lead = data.iter().take_while(|v| !is_defined(**v)).count();
        let mut result = vec![UNDEFINED; lead];
        result.extend(self.calculate(&data[lead..]));
        result
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = Vec::with_capacity(data.len());
        let Some(&first) = data.first() else {
            return result;
        };

        result.push(first);
        let mut ema = first;
        let one_minus_mult = 1.0 - self.multiplier;

        for &price in &data[1..] {
            ema = price * self.multiplier + ema * one_minus_mult;
            result.push(ema);
        }

        result
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma.calculate(&data);

        assert_eq!(result.len(), data.len());
        assert!(!is_defined(result[0]));
        assert!(!is_defined(result[1]));
        assert!((result[2] - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[3] - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result[4] - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5);
        let result = sma.calculate(&[1.0, 2.0, 3.0]);

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|v| !is_defined(*v)));
    }

    #[test]
    fn test_ema_seeds_at_first_input() {
        let ema = Ema::new(3);
        let result = ema.calculate(&[10.0, 20.0]);

        assert_eq!(result.len(), 2);
        // k = 2/(3+1) = 0.5
        assert!((result[0] - 10.0).abs() < 1e-10);
        assert!((result[1] - 15.0).abs() < 1e-10); // 20*0.5 + 10*0.5
    }

    #[test]
    fn test_ema_no_warm_up_gap() {
        let ema = Ema::new(20);
        let data: Vec<f64> = (0..5).map(|i| 100.0 + i as f64).collect();
        let result = ema.calculate(&data);

        assert_eq!(result.len(), 5);
        assert!(result.iter().all(|v| is_defined(*v)));
    }

    #[test]
    fn test_ema_calculate_defined_realigns() {
        let ema = Ema::new(2);
        let data = vec![UNDEFINED, UNDEFINED, 3.0, 6.0];
        let result = ema.calculate_defined(&data);

        assert_eq!(result.len(), 4);
        assert!(!is_defined(result[0]));
        assert!(!is_defined(result[1]));
        assert!((result[2] - 3.0).abs() < 1e-10);
        assert!((result[3] - 5.0).abs() < 1e-10); // 6*(2/3) + 3*(1/3)
    }
}
