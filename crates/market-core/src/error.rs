//! Error types for the market data system.

use thiserror::Error;

/// Top-level market system error.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Vendor error: {0}")]
    Vendor(#[from] VendorError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Vendor adapter errors.
///
/// Every variant is recoverable: the aggregator reacts by advancing to
/// the next configured vendor, never by surfacing the error to callers.
#[derive(Error, Debug)]
pub enum VendorError {
    #[error("Vendor not configured: {0}")]
    NotConfigured(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response for symbol: {0}")]
    EmptyResponse(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Call timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Cache collaborator errors. Always degraded to a cache miss.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

/// Publish/subscribe bus errors.
#[derive(Error, Debug)]
pub enum BusError {
    #[error("Bus is closed")]
    Closed,

    #[error("Subscribe failed for channel {channel}: {reason}")]
    Subscribe { channel: String, reason: String },

    #[error("Publish failed for channel {channel}: {reason}")]
    Publish { channel: String, reason: String },
}

/// Streaming gateway transport errors.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("WebSocket handshake rejected: {0}")]
    HandshakeRejected(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias for market operations.
pub type MarketResult<T> = Result<T, MarketError>;
