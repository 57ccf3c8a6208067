//! Finnhub vendor adapter.

use async_trait::async_trait;
use chrono::Utc;
use market_core::error::VendorError;
use market_core::{AssetClass, Bar, Interval, Quote, Series, VendorAdapter};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Finnhub API configuration.
#[derive(Debug, Clone)]
pub struct FinnhubConfig {
    pub api_key: String,
    pub base_url: String,
}

impl FinnhubConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Load from environment variables.
    pub fn from_env() -> Result<Self, VendorError> {
        let api_key = std::env::var("FINNHUB_API_KEY")
            .map_err(|_| VendorError::NotConfigured("FINNHUB_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }
}

/// Finnhub API response types
#[derive(Debug, Deserialize)]
struct FinnhubQuote {
    /// Current price
    c: f64,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// High of day
    h: f64,
    /// Low of day
    l: f64,
    /// Open of day
    o: f64,
    /// Previous close
    pc: f64,
    /// Timestamp, unix seconds
    t: i64,
}

#[derive(Debug, Deserialize)]
struct FinnhubCandles {
    /// "ok" or "no_data"
    s: String,
    #[serde(default)]
    t: Vec<i64>,
    #[serde(default)]
    o: Vec<f64>,
    #[serde(default)]
    h: Vec<f64>,
    #[serde(default)]
    l: Vec<f64>,
    #[serde(default)]
    c: Vec<f64>,
    #[serde(default)]
    v: Vec<f64>,
}

/// Finnhub REST client.
pub struct FinnhubVendor {
    config: FinnhubConfig,
    client: Client,
}

impl FinnhubVendor {
    pub fn new(config: FinnhubConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, VendorError> {
        Ok(Self::new(FinnhubConfig::from_env()?))
    }

    fn resolution(interval: Interval) -> &'static str {
        match interval {
            Interval::Min1 => "1",
            Interval::Min5 => "5",
            Interval::Min15 => "15",
            Interval::Min30 => "30",
            Interval::Hour1 | Interval::Hour4 => "60",
            Interval::Day1 => "D",
            Interval::Week1 => "W",
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, VendorError> {
        let url = format!("{}{}", self.config.base_url, path);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("token", &self.config.api_key)])
            .send()
            .await
            .map_err(|e| VendorError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(VendorError::Api(format!("{}: {}", status, text)));
        }

        resp.json()
            .await
            .map_err(|e| VendorError::Parse(e.to_string()))
    }
}

#[async_trait]
impl VendorAdapter for FinnhubVendor {
    fn name(&self) -> &str {
        "finnhub"
    }

    async fn get_quote(
        &self,
        symbol: &str,
        asset_class: AssetClass,
    ) -> Result<Quote, VendorError> {
        debug!(symbol, "fetching Finnhub quote");

        let raw: FinnhubQuote = self
            .fetch("/quote", &[("symbol", symbol.to_string())])
            .await?;

        // Finnhub answers unknown symbols with an all-zero body
        if raw.c == 0.0 && raw.pc == 0.0 && raw.t == 0 {
            return Err(VendorError::SymbolNotFound(symbol.to_string()));
        }

        Ok(Quote {
            symbol: symbol.to_string(),
            price: raw.c,
            change: raw.d.unwrap_or(raw.c - raw.pc),
            percent_change: raw.dp.unwrap_or_else(|| {
                if raw.pc != 0.0 {
                    (raw.c - raw.pc) / raw.pc * 100.0
                } else {
                    0.0
                }
            }),
            high: raw.h,
            low: raw.l,
            open: raw.o,
            previous_close: raw.pc,
            timestamp: raw.t * 1000,
            asset_class,
            provider: self.name().to_string(),
        })
    }

    async fn get_history(
        &self,
        symbol: &str,
        _asset_class: AssetClass,
        interval: Interval,
        limit: usize,
    ) -> Result<Series, VendorError> {
        let to = Utc::now().timestamp();
        // Double the nominal span to cover weekends and holidays
        let from = to - (limit as i64) * (interval.as_secs() as i64) * 2;

        debug!(symbol, %interval, limit, "fetching Finnhub candles");

        let raw: FinnhubCandles = self
            .fetch(
                "/stock/candle",
                &[
                    ("symbol", symbol.to_string()),
                    ("resolution", Self::resolution(interval).to_string()),
                    ("from", from.to_string()),
                    ("to", to.to_string()),
                ],
            )
            .await?;

        if raw.s != "ok" || raw.t.is_empty() {
            return Err(VendorError::EmptyResponse(symbol.to_string()));
        }

        let len = raw
            .t
            .len()
            .min(raw.o.len())
            .min(raw.h.len())
            .min(raw.l.len())
            .min(raw.c.len())
            .min(raw.v.len());

        let mut bars: Vec<Bar> = (0..len)
            .map(|i| Bar::new(raw.t[i] * 1000, raw.o[i], raw.h[i], raw.l[i], raw.c[i], raw.v[i]))
            .collect();

        if bars.len() > limit {
            bars.drain(..bars.len() - limit);
        }

        Ok(Series::new(symbol, interval, bars))
    }
}
