//! The stacked-edge consensus calculation.

use market_core::{is_defined, BarIndicator, Indicator, MultiOutputIndicator, Series};
use market_indicators::{Adx, BollingerBands, Ema, Macd, Rsi, Sma, Vwap};

use crate::{ConsensusResult, IndicatorVote, Phase, Side};

/// Hard floor on the number of bars required for an evaluation.
pub const MIN_BARS: usize = 200;

/// Number of indicators evaluated; the maximum possible vote count.
pub const MAX_SCORE: u32 = 7;

/// ADX level above which a market counts as trending.
const ADX_TREND_FLOOR: f64 = 25.0;

/// Reduce a bar series to a directional consensus at its latest bar.
///
/// Series shorter than [`MIN_BARS`] return a zero-score Neutral result
/// with an empty vote list regardless of content.
pub fn calculate_stacked_edge(series: &Series) -> ConsensusResult {
    if series.len() < MIN_BARS {
        return ConsensusResult::insufficient();
    }

    let closes = series.closes();
    let last = closes.len() - 1;
    let prev = last - 1;
    let close = closes[last];
    let prev_close = closes[prev];

    let sma200 = Sma::new(200).calculate(&closes);
    let ema20 = Ema::new(20).calculate(&closes);
    let rsi = Rsi::new(14).calculate(&closes);
    let bands = BollingerBands::new().calculate(&closes);
    let vwap = Vwap::new().calculate_bars(&series.bars);
    let adx = Adx::new(14).calculate_bars(&series.bars);
    let macd = Macd::new().calculate(&closes);

    let mut votes = Vec::with_capacity(MAX_SCORE as usize);

    votes.push(IndicatorVote {
        name: "SMA (200)".to_string(),
        category: "Trend".to_string(),
        side: level_side(close, sma200[last]),
        value: sma200[last],
        description: format!(
            "Price {:.2} vs 200-period simple moving average {:.2}",
            close, sma200[last]
        ),
    });

    votes.push(IndicatorVote {
        name: "EMA (20)".to_string(),
        category: "Trend".to_string(),
        side: level_side(close, ema20[last]),
        value: ema20[last],
        description: format!(
            "Price {:.2} vs 20-period exponential moving average {:.2}",
            close, ema20[last]
        ),
    });

    votes.push(IndicatorVote {
        name: "RSI (14)".to_string(),
        category: "Momentum".to_string(),
        side: momentum_side(rsi[last]),
        value: rsi[last],
        description: format!("RSI at {:.2}", rsi[last]),
    });

    votes.push(IndicatorVote {
        name: "Bollinger middle".to_string(),
        category: "Mean Reversion".to_string(),
        side: cross_side(prev_close, bands[prev].middle, close, bands[last].middle),
        value: bands[last].middle,
        description: format!("Middle band at {:.2}", bands[last].middle),
    });

    votes.push(IndicatorVote {
        name: "VWAP".to_string(),
        category: "Volume".to_string(),
        side: level_side(close, vwap[last]),
        value: vwap[last],
        description: format!("Price {:.2} vs cumulative VWAP {:.2}", close, vwap[last]),
    });

    votes.push(IndicatorVote {
        name: "ADX (14)".to_string(),
        category: "Trend Strength".to_string(),
        side: trend_strength_side(adx[last], close, prev_close),
        value: adx[last],
        description: format!("ADX at {:.2}", adx[last]),
    });

    let macd_side = cross_side(
        macd[prev].macd,
        macd[prev].signal,
        macd[last].macd,
        macd[last].signal,
    );
    votes.push(IndicatorVote {
        name: "MACD (12, 26, 9)".to_string(),
        category: "Reversal".to_string(),
        side: macd_side,
        value: macd[last].macd,
        description: format!(
            "MACD line {:.4} vs signal {:.4}",
            macd[last].macd, macd[last].signal
        ),
    });

    let (bullish_score, bearish_score) = tally(&votes);
    let net_bias = majority(bullish_score, bearish_score);

    let inputs = PhaseInputs {
        active_score: match net_bias {
            Side::Bullish => bullish_score,
            Side::Bearish => bearish_score,
            Side::Neutral => 0,
        },
        macd_crossed: macd_side != Side::Neutral,
        rsi: rsi[last],
        adx_declining: is_defined(adx[last])
            && is_defined(adx[prev])
            && adx[last] < adx[prev],
        short_trend_agrees: votes[1].side == net_bias,
        volume_agrees: votes[4].side == net_bias,
    };

    ConsensusResult {
        bullish_score,
        bearish_score,
        max_score: MAX_SCORE,
        net_bias,
        phase: classify_phase(&inputs),
        indicators: votes,
    }
}

/// Price relative to an indicator level. Undefined levels vote Neutral.
fn level_side(price: f64, level: f64) -> Side {
    if !is_defined(level) {
        return Side::Neutral;
    }
    if price > level {
        Side::Bullish
    } else if price < level {
        Side::Bearish
    } else {
        Side::Neutral
    }
}

/// Votes only when the RSI rounds to exactly 60 or 40; deliberately an
/// exact match on the rounded value, not a threshold range.
fn momentum_side(rsi: f64) -> Side {
    if !is_defined(rsi) {
        return Side::Neutral;
    }
    let rounded = rsi.round();
    if rounded == 60.0 {
        Side::Bullish
    } else if rounded == 40.0 {
        Side::Bearish
    } else {
        Side::Neutral
    }
}

/// A cross between the prior and current bar: above is Bullish, below
/// is Bearish, anything else Neutral.
fn cross_side(prev_value: f64, prev_level: f64, value: f64, level: f64) -> Side {
    if !is_defined(prev_level) || !is_defined(level) {
        return Side::Neutral;
    }
    if prev_value <= prev_level && value > level {
        Side::Bullish
    } else if prev_value >= prev_level && value < level {
        Side::Bearish
    } else {
        Side::Neutral
    }
}

/// A trending market (ADX above the floor) votes with the price
/// direction; a quiet one abstains.
fn trend_strength_side(adx: f64, close: f64, prev_close: f64) -> Side {
    if !is_defined(adx) || adx <= ADX_TREND_FLOOR {
        return Side::Neutral;
    }
    if close > prev_close {
        Side::Bullish
    } else if close < prev_close {
        Side::Bearish
    } else {
        Side::Neutral
    }
}

fn tally(votes: &[IndicatorVote]) -> (u32, u32) {
    let bullish = votes.iter().filter(|v| v.side == Side::Bullish).count() as u32;
    let bearish = votes.iter().filter(|v| v.side == Side::Bearish).count() as u32;
    (bullish, bearish)
}

fn majority(bullish: u32, bearish: u32) -> Side {
    if bullish > bearish {
        Side::Bullish
    } else if bearish > bullish {
        Side::Bearish
    } else {
        Side::Neutral
    }
}

struct PhaseInputs {
    active_score: u32,
    macd_crossed: bool,
    rsi: f64,
    adx_declining: bool,
    short_trend_agrees: bool,
    volume_agrees: bool,
}

/// Phase rules are evaluated in a fixed order with last-match-wins
/// overwrite: Exhaustion beats Confirmation beats Lead-In when several
/// conditions hold at once. This ordering is load-bearing.
fn classify_phase(inputs: &PhaseInputs) -> Phase {
    let mut phase = Phase::Neutral;

    let rsi_defined = is_defined(inputs.rsi);
    let rsi_mid_band = rsi_defined && inputs.rsi > 40.0 && inputs.rsi < 60.0;

    if inputs.active_score >= 1 && (inputs.macd_crossed || rsi_mid_band) {
        phase = Phase::LeadIn;
    }

    if inputs.active_score >= 4 && inputs.short_trend_agrees && inputs.volume_agrees {
        phase = Phase::Confirmation;
    }

    let rsi_extreme = rsi_defined && (inputs.rsi > 70.0 || inputs.rsi < 30.0);
    if inputs.active_score >= 4 && (rsi_extreme || inputs.adx_declining) {
        phase = Phase::Exhaustion;
    }

    phase
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::{Bar, Interval, UNDEFINED};

    fn vote(side: Side) -> IndicatorVote {
        IndicatorVote {
            name: "test".to_string(),
            category: "test".to_string(),
            side,
            value: 0.0,
            description: String::new(),
        }
    }

    fn votes(bullish: usize, bearish: usize, neutral: usize) -> Vec<IndicatorVote> {
        let mut v = Vec::new();
        v.extend((0..bullish).map(|_| vote(Side::Bullish)));
        v.extend((0..bearish).map(|_| vote(Side::Bearish)));
        v.extend((0..neutral).map(|_| vote(Side::Neutral)));
        v
    }

    fn uptrend_series(n: usize) -> Series {
        let bars = (0..n)
            .map(|i| {
                let close = 100.0 + i as f64 * 0.5;
                Bar::new(
                    i as i64 * 86_400_000,
                    close - 0.25,
                    close + 0.5,
                    close - 0.5,
                    close,
                    1000.0 + i as f64,
                )
            })
            .collect();
        Series::new("TEST", Interval::Day1, bars)
    }

    #[test]
    fn test_short_series_hard_floor() {
        let result = calculate_stacked_edge(&uptrend_series(199));

        assert_eq!(result.bullish_score, 0);
        assert_eq!(result.bearish_score, 0);
        assert_eq!(result.max_score, 7);
        assert_eq!(result.net_bias, Side::Neutral);
        assert_eq!(result.phase, Phase::Neutral);
        assert!(result.indicators.is_empty());
    }

    #[test]
    fn test_majority_rules() {
        let (b, s) = tally(&votes(4, 3, 0));
        assert_eq!(majority(b, s), Side::Bullish);

        let (b, s) = tally(&votes(3, 3, 1));
        assert_eq!(majority(b, s), Side::Neutral);

        let (b, s) = tally(&votes(2, 5, 0));
        assert_eq!(majority(b, s), Side::Bearish);

        let (b, s) = tally(&votes(0, 0, 7));
        assert_eq!(majority(b, s), Side::Neutral);
    }

    #[test]
    fn test_momentum_narrow_band() {
        // Exact rounding match, not a range
        assert_eq!(momentum_side(60.4), Side::Bullish);
        assert_eq!(momentum_side(59.6), Side::Bullish); // rounds to 60
        assert_eq!(momentum_side(59.4), Side::Neutral);
        assert_eq!(momentum_side(40.2), Side::Bearish);
        assert_eq!(momentum_side(41.0), Side::Neutral);
        assert_eq!(momentum_side(UNDEFINED), Side::Neutral);
    }

    #[test]
    fn test_cross_detection() {
        assert_eq!(cross_side(9.0, 10.0, 11.0, 10.0), Side::Bullish);
        assert_eq!(cross_side(11.0, 10.0, 9.0, 10.0), Side::Bearish);
        // Already above, no fresh cross
        assert_eq!(cross_side(11.0, 10.0, 12.0, 10.0), Side::Neutral);
        assert_eq!(cross_side(9.0, UNDEFINED, 11.0, 10.0), Side::Neutral);
    }

    #[test]
    fn test_trend_strength_needs_both() {
        assert_eq!(trend_strength_side(30.0, 11.0, 10.0), Side::Bullish);
        assert_eq!(trend_strength_side(30.0, 9.0, 10.0), Side::Bearish);
        assert_eq!(trend_strength_side(20.0, 11.0, 10.0), Side::Neutral);
        assert_eq!(trend_strength_side(UNDEFINED, 11.0, 10.0), Side::Neutral);
    }

    #[test]
    fn test_phase_last_match_wins() {
        // Confirmation and Exhaustion both hold: Exhaustion wins
        let phase = classify_phase(&PhaseInputs {
            active_score: 5,
            macd_crossed: true,
            rsi: 75.0,
            adx_declining: false,
            short_trend_agrees: true,
            volume_agrees: true,
        });
        assert_eq!(phase, Phase::Exhaustion);

        // Lead-In and Confirmation both hold: Confirmation wins
        let phase = classify_phase(&PhaseInputs {
            active_score: 4,
            macd_crossed: true,
            rsi: 55.0,
            adx_declining: false,
            short_trend_agrees: true,
            volume_agrees: true,
        });
        assert_eq!(phase, Phase::Confirmation);

        // Only the Lead-In condition holds
        let phase = classify_phase(&PhaseInputs {
            active_score: 1,
            macd_crossed: false,
            rsi: 50.0,
            adx_declining: false,
            short_trend_agrees: false,
            volume_agrees: false,
        });
        assert_eq!(phase, Phase::LeadIn);
    }

    #[test]
    fn test_phase_zero_active_score_is_neutral() {
        let phase = classify_phase(&PhaseInputs {
            active_score: 0,
            macd_crossed: true,
            rsi: 75.0,
            adx_declining: true,
            short_trend_agrees: false,
            volume_agrees: false,
        });
        assert_eq!(phase, Phase::Neutral);
    }

    #[test]
    fn test_uptrend_consensus() {
        let result = calculate_stacked_edge(&uptrend_series(250));

        assert_eq!(result.max_score, 7);
        assert_eq!(result.indicators.len(), 7);
        // Long trend, short trend, VWAP and ADX all favor the uptrend
        assert!(result.bullish_score >= 3);
        assert_eq!(result.net_bias, Side::Bullish);
        assert!(result.bullish_score + result.bearish_score <= 7);
    }
}
