//! Bar interval definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interval of a bar series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interval {
    /// 1 minute bars
    #[serde(rename = "1m")]
    Min1,
    /// 5 minute bars
    #[serde(rename = "5m")]
    Min5,
    /// 15 minute bars
    #[serde(rename = "15m")]
    Min15,
    /// 30 minute bars
    #[serde(rename = "30m")]
    Min30,
    /// 1 hour bars
    #[serde(rename = "1h")]
    Hour1,
    /// 4 hour bars
    #[serde(rename = "4h")]
    Hour4,
    /// Daily bars
    #[serde(rename = "1d")]
    #[default]
    Day1,
    /// Weekly bars
    #[serde(rename = "1w")]
    Week1,
}

impl Interval {
    /// Duration of the interval in seconds.
    pub fn as_secs(&self) -> u64 {
        match self {
            Interval::Min1 => 60,
            Interval::Min5 => 300,
            Interval::Min15 => 900,
            Interval::Min30 => 1800,
            Interval::Hour1 => 3600,
            Interval::Hour4 => 14400,
            Interval::Day1 => 86400,
            Interval::Week1 => 604800,
        }
    }

    /// Duration of the interval in milliseconds.
    pub fn as_millis(&self) -> i64 {
        self.as_secs() as i64 * 1000
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Interval::Min1 => "1m",
            Interval::Min5 => "5m",
            Interval::Min15 => "15m",
            Interval::Min30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Day1 => "1d",
            Interval::Week1 => "1w",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" => Ok(Interval::Min1),
            "5m" | "5min" => Ok(Interval::Min5),
            "15m" | "15min" => Ok(Interval::Min15),
            "30m" | "30min" => Ok(Interval::Min30),
            "1h" | "hour" => Ok(Interval::Hour1),
            "4h" => Ok(Interval::Hour4),
            "1d" | "day" | "daily" => Ok(Interval::Day1),
            "1w" | "week" | "weekly" => Ok(Interval::Week1),
            _ => Err(format!("Invalid interval: {}", s)),
        }
    }
}
