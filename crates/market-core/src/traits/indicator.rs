//! Indicator trait definitions.

use crate::types::Bar;

/// Sentinel marking a series position that is not yet computable.
///
/// Indicator outputs are aligned one-to-one with their input; positions
/// before the minimum required window carry this marker instead of
/// being dropped, so downstream code can index by the same offset as
/// the source series.
pub const UNDEFINED: f64 = f64::NAN;

/// Whether a series position holds a real value rather than the
/// undefined marker.
#[inline]
pub fn is_defined(value: f64) -> bool {
    !value.is_nan()
}

/// Trait for technical indicators over a single price sequence.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// The returned vector always has the same length as `data`;
    /// not-yet-computable positions carry [`UNDEFINED`].
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Input length at which the first defined value appears.
    fn min_bars(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Multi-output indicator (e.g. Bollinger Bands, MACD).
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    /// Calculate indicator values, aligned one-to-one with `data`.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    /// Input length at which the first fully defined point appears.
    fn min_bars(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Indicator that consumes whole bars (needs high/low/volume, not just
/// close).
pub trait BarIndicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values, aligned one-to-one with `bars`.
    fn calculate_bars(&self, bars: &[Bar]) -> Vec<Self::Output>;

    /// Input length at which the first defined value appears.
    fn min_bars(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
