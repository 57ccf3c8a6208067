//! Twelve Data vendor adapter.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use market_core::error::VendorError;
use market_core::{AssetClass, Bar, Interval, Quote, Series, VendorAdapter};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";

/// Twelve Data API configuration.
#[derive(Debug, Clone)]
pub struct TwelveDataConfig {
    pub api_key: String,
    pub base_url: String,
}

impl TwelveDataConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Load from environment variables.
    pub fn from_env() -> Result<Self, VendorError> {
        let api_key = std::env::var("TWELVEDATA_API_KEY")
            .map_err(|_| VendorError::NotConfigured("TWELVEDATA_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }
}

/// Twelve Data API response types. Numeric fields arrive as strings.
#[derive(Debug, Deserialize)]
struct TdQuote {
    symbol: String,
    close: String,
    change: String,
    percent_change: String,
    high: String,
    low: String,
    open: String,
    previous_close: String,
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct TdValue {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
    #[serde(default)]
    volume: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TdTimeSeries {
    #[serde(default)]
    values: Vec<TdValue>,
}

/// Errors arrive as 200 OK with a status/message body.
#[derive(Debug, Deserialize)]
struct TdStatus {
    status: Option<String>,
    message: Option<String>,
}

/// Twelve Data REST client.
pub struct TwelveDataVendor {
    config: TwelveDataConfig,
    client: Client,
}

impl TwelveDataVendor {
    pub fn new(config: TwelveDataConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, VendorError> {
        Ok(Self::new(TwelveDataConfig::from_env()?))
    }

    fn td_interval(interval: Interval) -> &'static str {
        match interval {
            Interval::Min1 => "1min",
            Interval::Min5 => "5min",
            Interval::Min15 => "15min",
            Interval::Min30 => "30min",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Day1 => "1day",
            Interval::Week1 => "1week",
        }
    }

    async fn fetch_text(&self, path: &str, params: &[(&str, String)]) -> Result<String, VendorError> {
        let url = format!("{}{}", self.config.base_url, path);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apikey", &self.config.api_key)])
            .send()
            .await
            .map_err(|e| VendorError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(VendorError::Api(format!("{}: {}", status, text)));
        }

        resp.text()
            .await
            .map_err(|e| VendorError::Connection(e.to_string()))
    }

    /// Reject in-band error bodies before decoding the expected shape.
    fn check_status(body: &str) -> Result<(), VendorError> {
        if let Ok(status) = serde_json::from_str::<TdStatus>(body) {
            if status.status.as_deref() == Some("error") {
                return Err(VendorError::Api(
                    status.message.unwrap_or_else(|| "unknown error".to_string()),
                ));
            }
        }
        Ok(())
    }

    fn parse_f64(raw: &str, field: &str) -> Result<f64, VendorError> {
        raw.parse()
            .map_err(|_| VendorError::Parse(format!("bad {field}: {raw:?}")))
    }

    /// Datetimes are "YYYY-MM-DD HH:MM:SS" intraday, "YYYY-MM-DD" daily.
    fn parse_datetime_ms(raw: &str) -> Result<i64, VendorError> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Ok(dt.and_utc().timestamp_millis());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc().timestamp_millis())
            .map_err(|_| VendorError::Parse(format!("bad datetime: {raw:?}")))
    }
}

#[async_trait]
impl VendorAdapter for TwelveDataVendor {
    fn name(&self) -> &str {
        "twelvedata"
    }

    async fn get_quote(
        &self,
        symbol: &str,
        asset_class: AssetClass,
    ) -> Result<Quote, VendorError> {
        debug!(symbol, "fetching Twelve Data quote");

        let body = self
            .fetch_text("/quote", &[("symbol", symbol.to_string())])
            .await?;
        Self::check_status(&body)?;

        let raw: TdQuote =
            serde_json::from_str(&body).map_err(|e| VendorError::Parse(e.to_string()))?;

        Ok(Quote {
            symbol: raw.symbol,
            price: Self::parse_f64(&raw.close, "close")?,
            change: Self::parse_f64(&raw.change, "change")?,
            percent_change: Self::parse_f64(&raw.percent_change, "percent_change")?,
            high: Self::parse_f64(&raw.high, "high")?,
            low: Self::parse_f64(&raw.low, "low")?,
            open: Self::parse_f64(&raw.open, "open")?,
            previous_close: Self::parse_f64(&raw.previous_close, "previous_close")?,
            timestamp: raw.timestamp * 1000,
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
        debug!(symbol, %interval, limit, "fetching Twelve Data time series");

        let body = self
            .fetch_text(
                "/time_series",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", Self::td_interval(interval).to_string()),
                    ("outputsize", limit.to_string()),
                ],
            )
            .await?;
        Self::check_status(&body)?;

        let raw: TdTimeSeries =
            serde_json::from_str(&body).map_err(|e| VendorError::Parse(e.to_string()))?;

        if raw.values.is_empty() {
            return Err(VendorError::EmptyResponse(symbol.to_string()));
        }

        let bars = raw
            .values
            .iter()
            .map(|v| {
                Ok(Bar::new(
                    Self::parse_datetime_ms(&v.datetime)?,
                    Self::parse_f64(&v.open, "open")?,
                    Self::parse_f64(&v.high, "high")?,
                    Self::parse_f64(&v.low, "low")?,
                    Self::parse_f64(&v.close, "close")?,
                    match &v.volume {
                        Some(vol) => Self::parse_f64(vol, "volume")?,
                        None => 0.0,
                    },
                ))
            })
            .collect::<Result<Vec<Bar>, VendorError>>()?;

        // Payload arrives newest-first; Series::new re-sorts oldest-first
        Ok(Series::new(symbol, interval, bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_mapping() {
        assert_eq!(TwelveDataVendor::td_interval(Interval::Min1), "1min");
        assert_eq!(TwelveDataVendor::td_interval(Interval::Day1), "1day");
        assert_eq!(TwelveDataVendor::td_interval(Interval::Week1), "1week");
    }

    #[test]
    fn test_datetime_parsing() {
        let intraday = TwelveDataVendor::parse_datetime_ms("2024-01-02 15:30:00").unwrap();
        assert_eq!(intraday, 1_704_209_400_000);

        let daily = TwelveDataVendor::parse_datetime_ms("2024-01-02").unwrap();
        assert_eq!(daily, 1_704_153_600_000);

        assert!(TwelveDataVendor::parse_datetime_ms("not-a-date").is_err());
    }

    #[test]
    fn test_error_body_rejected() {
        let body = r#"{"status":"error","code":404,"message":"symbol not found"}"#;
        assert!(TwelveDataVendor::check_status(body).is_err());

        let ok = r#"{"values":[],"status":"ok"}"#;
        assert!(TwelveDataVendor::check_status(ok).is_ok());
    }

    #[test]
    fn test_time_series_decodes() {
        let body = r#"{"values":[{"datetime":"2024-01-02","open":"1.0","high":"2.0","low":"0.5","close":"1.5","volume":"100"}]}"#;
        let series: TdTimeSeries = serde_json::from_str(body).unwrap();
        assert_eq!(series.values.len(), 1);
        assert_eq!(series.values[0].close, "1.5");
    }
}
