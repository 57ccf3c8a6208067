//! Asset class definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset class of a tradable instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    /// Common stock
    #[default]
    Stock,
    /// Exchange-traded fund
    Etf,
    /// Cryptocurrency
    Crypto,
    /// Currency pair
    Forex,
}

impl AssetClass {
    /// Equity-like classes trade on country-specific exchanges and take
    /// exchange suffixes; crypto and forex symbols are global.
    pub fn is_equity(&self) -> bool {
        matches!(self, AssetClass::Stock | AssetClass::Etf)
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetClass::Stock => "stock",
            AssetClass::Etf => "etf",
            AssetClass::Crypto => "crypto",
            AssetClass::Forex => "forex",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stock" | "equity" => Ok(AssetClass::Stock),
            "etf" => Ok(AssetClass::Etf),
            "crypto" | "cryptocurrency" => Ok(AssetClass::Crypto),
            "forex" | "fx" => Ok(AssetClass::Forex),
            _ => Err(format!("Invalid asset class: {}", s)),
        }
    }
}
