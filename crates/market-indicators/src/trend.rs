//! Trend-strength indicators.

use market_core::{Bar, BarIndicator, Indicator, UNDEFINED};

use crate::moving_average::Ema;

/// Average Directional Index (ADX).
///
/// Directional movement is taken from consecutive high/low deltas
/// (whichever directional move is larger and positive wins, otherwise
/// zero). +DM, -DM and the true range are each EMA-smoothed, DX is the
/// normalized DI spread, and ADX is an EMA of DX. The output carries a
/// single leading undefined marker so it aligns with the bar series.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    /// Create a new ADX indicator. The common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl BarIndicator for Adx {
    type Output = f64;

    fn calculate_bars(&self, bars: &[Bar]) -> Vec<f64> {
        if bars.len() < 2 {
            return vec![UNDEFINED; bars.len()];
        }

        let span = bars.len() - 1;
        let mut plus_dm = Vec::with_capacity(span);
        let mut minus_dm = Vec::with_capacity(span);
        let mut true_range = Vec::with_capacity(span);

        for i in 1..bars.len() {
            let up_move = bars[i].high - bars[i - 1].high;
            let down_move = bars[i - 1].low - bars[i].low;

            plus_dm.push(if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            });
            minus_dm.push(if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            });
            true_range.push(bars[i].true_range(Some(bars[i - 1].close)));
        }

        let ema = Ema::new(self.period);
        let smooth_plus = ema.calculate(&plus_dm);
        let smooth_minus = ema.calculate(&minus_dm);
        let smooth_tr = ema.calculate(&true_range);

        let dx: Vec<f64> = (0..span)
            .map(|i| {
                let tr = smooth_tr[i];
                let (plus_di, minus_di) = if tr == 0.0 {
                    (0.0, 0.0)
                } else {
                    (
                        100.0 * smooth_plus[i] / tr,
                        100.0 * smooth_minus[i] / tr,
                    )
                };

                let di_sum = plus_di + minus_di;
                if di_sum == 0.0 {
                    0.0
                } else {
                    100.0 * (plus_di - minus_di).abs() / di_sum
                }
            })
            .collect();

        let mut result = vec![UNDEFINED];
        result.extend(ema.calculate(&dx));
        result
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "ADX"
    }
}
