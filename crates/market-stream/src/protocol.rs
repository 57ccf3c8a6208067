//! Client/server wire messages.

use market_core::{AssetClass, Quote};
use serde::{Deserialize, Serialize};

/// Inbound client message.
///
/// `action` is matched as a plain string so unknown actions can be
/// ignored without failing deserialization of otherwise-valid frames.
#[derive(Debug, Deserialize)]
pub struct ClientMessage {
    pub action: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, rename = "assetClass")]
    pub asset_class: Option<AssetClass>,
}

/// Outbound server message.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Quote { data: Quote },
}
