//! Directional consensus scoring over a bar series.
//!
//! Seven fixed indicators each cast an independent Bullish, Bearish or
//! Neutral vote at the latest bar; the votes reduce to a net bias and a
//! qualitative phase classification. Results are recomputed on demand
//! and never persisted.

mod scorer;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use scorer::{calculate_stacked_edge, MAX_SCORE, MIN_BARS};

/// Direction of a single indicator vote or of the net bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Side::Bullish => "Bullish",
            Side::Bearish => "Bearish",
            Side::Neutral => "Neutral",
        };
        write!(f, "{}", s)
    }
}

/// Qualitative maturity of the current net-bias signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "Lead-In")]
    LeadIn,
    Confirmation,
    Exhaustion,
    Neutral,
}

/// One indicator's contribution to the consensus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorVote {
    /// Indicator name (e.g. "RSI (14)")
    pub name: String,
    /// Signal category (e.g. "Momentum")
    pub category: String,
    /// The vote cast at the latest bar
    pub side: Side,
    /// Displayed indicator value at the latest bar
    pub value: f64,
    /// Human-readable explanation of the vote
    pub description: String,
}

/// The reduced consensus over all evaluated indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Count of Bullish votes
    pub bullish_score: u32,
    /// Count of Bearish votes
    pub bearish_score: u32,
    /// Number of indicators evaluated (fixed)
    pub max_score: u32,
    /// Majority direction, Neutral on a tie
    pub net_bias: Side,
    /// Phase classification of the active side
    pub phase: Phase,
    /// Per-indicator explanations
    pub indicators: Vec<IndicatorVote>,
}

impl ConsensusResult {
    /// The all-neutral result returned when the series is too short to
    /// evaluate.
    pub fn insufficient() -> Self {
        Self {
            bullish_score: 0,
            bearish_score: 0,
            max_score: MAX_SCORE,
            net_bias: Side::Neutral,
            phase: Phase::Neutral,
            indicators: Vec::new(),
        }
    }
}
