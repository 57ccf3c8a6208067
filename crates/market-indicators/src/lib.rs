//! Technical indicators over price and bar series.
//!
//! All functions here are pure and stateless: no I/O, no shared state.
//! Every output is aligned one-to-one with its input; positions before
//! an indicator's minimum window carry [`market_core::UNDEFINED`]
//! instead of being dropped.
//!
//! - Moving averages (SMA, EMA)
//! - Momentum (RSI, MACD)
//! - Volatility (Bollinger Bands)
//! - Volume (cumulative VWAP)
//! - Trend strength (ADX)

pub mod momentum;
pub mod moving_average;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::{Macd, MacdPoint, Rsi};
pub use moving_average::{Ema, Sma};
pub use trend::Adx;
pub use volatility::{BollingerBands, BollingerPoint};
pub use volume::Vwap;
