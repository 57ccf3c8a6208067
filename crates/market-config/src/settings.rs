//! Configuration structures.

use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub aggregator: AggregatorSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "marketd".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Streaming gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// Bind address for the WebSocket listener
    pub bind: String,
    /// Upgrade path; other paths reject the handshake
    pub path: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            path: "/ws/market".to_string(),
        }
    }
}

/// Data aggregator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorSettings {
    /// Per-vendor-call timeout in seconds
    pub vendor_timeout_secs: u64,
    /// Quote cache TTL in seconds
    pub quote_ttl_secs: u64,
    /// History cache TTL in seconds
    pub history_ttl_secs: u64,
    /// Quote poller interval in seconds
    pub poll_interval_secs: u64,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            vendor_timeout_secs: 5,
            quote_ttl_secs: 10,
            history_ttl_secs: 30 * 60,
            poll_interval_secs: 5,
        }
    }
}
