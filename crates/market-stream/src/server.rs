//! WebSocket accept loop and per-connection handling.

use futures::{SinkExt, StreamExt};
use market_core::error::{MarketError, StreamError};
use market_core::{AssetClass, Quote};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::gateway::QuoteGateway;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::Session;

/// Accepts WebSocket upgrades on a single configured path and runs one
/// session per connection.
pub struct GatewayServer {
    bind: String,
    path: String,
    gateway: Arc<QuoteGateway>,
}

impl GatewayServer {
    pub fn new(bind: impl Into<String>, path: impl Into<String>, gateway: Arc<QuoteGateway>) -> Self {
        Self {
            bind: bind.into(),
            path: path.into(),
            gateway,
        }
    }

    /// Bind and serve until the listener fails.
    pub async fn run(&self) -> Result<(), MarketError> {
        let listener = TcpListener::bind(&self.bind).await?;
        info!(addr = %self.bind, path = %self.path, "gateway listening");

        loop {
            let (stream, peer) = listener.accept().await?;
            let gateway = Arc::clone(&self.gateway);
            let path = self.path.clone();

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer, &path, gateway).await {
                    debug!(%peer, error = %e, "connection closed");
                }
            });
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    path: &str,
    gateway: Arc<QuoteGateway>,
) -> Result<(), StreamError> {
    // Reject the upgrade for any path other than the configured one
    let ws = tokio_tungstenite::accept_hdr_async(stream, |req: &Request, resp: Response| {
        if req.uri().path() == path {
            Ok(resp)
        } else {
            warn!(%peer, requested = %req.uri().path(), "rejecting upgrade on unknown path");
            let mut reject = ErrorResponse::new(None);
            *reject.status_mut() = StatusCode::NOT_FOUND;
            Err(reject)
        }
    })
    .await
    .map_err(|e| StreamError::HandshakeRejected(e.to_string()))?;

    let (mut sink, mut ws_rx) = ws.split();
    let (tx, mut quote_rx) = mpsc::unbounded_channel::<Quote>();
    let mut session = Session::new();
    info!(session = %session.id, %peer, "client connected");

    loop {
        tokio::select! {
            Some(quote) = quote_rx.recv() => {
                let frame = ServerMessage::Quote { data: quote };
                match serde_json::to_string(&frame) {
                    Ok(json) => {
                        if sink.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(session = %session.id, error = %e, "quote frame encode failed"),
                }
            }
            inbound = ws_rx.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        handle_text(&gateway, &mut session, &text, &tx).await;
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!(session = %session.id, error = %e, "transport error");
                        break;
                    }
                }
            }
        }
    }

    gateway.handle_disconnect(&mut session).await;
    info!(session = %session.id, %peer, "client disconnected");
    Ok(())
}

/// Decode and act on one inbound text frame. Malformed JSON and unknown
/// actions never terminate the connection.
async fn handle_text(
    gateway: &QuoteGateway,
    session: &mut Session,
    text: &str,
    tx: &UnboundedSender<Quote>,
) {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(session = %session.id, error = %e, "malformed client message ignored");
            return;
        }
    };

    match msg.action.as_str() {
        "subscribe" => {
            let Some(symbol) = msg.symbol else {
                warn!(session = %session.id, "subscribe without symbol ignored");
                return;
            };
            let asset_class = msg.asset_class.unwrap_or(AssetClass::Stock);
            gateway.handle_subscribe(session, &symbol, asset_class, tx).await;
        }
        "unsubscribe" => {
            let Some(symbol) = msg.symbol else {
                warn!(session = %session.id, "unsubscribe without symbol ignored");
                return;
            };
            gateway.handle_unsubscribe(session, &symbol).await;
        }
        other => {
            debug!(session = %session.id, action = other, "ignoring unknown action");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::LocalBus;
    use market_data::{MarketAggregator, MemoryCache};

    fn test_gateway() -> Arc<QuoteGateway> {
        let (bus, _rx) = LocalBus::new();
        let aggregator = Arc::new(MarketAggregator::new(vec![], Arc::new(MemoryCache::new())));
        Arc::new(QuoteGateway::new(aggregator, bus))
    }

    #[tokio::test]
    async fn test_malformed_json_keeps_session() {
        let gateway = test_gateway();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new();

        handle_text(&gateway, &mut session, "not json at all", &tx).await;
        handle_text(
            &gateway,
            &mut session,
            r#"{"action":"subscribe","symbol":"AAPL"}"#,
            &tx,
        )
        .await;

        // The bad frame was ignored and the next one still worked
        assert_eq!(session.subscription_count(), 1);
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_unknown_action_ignored() {
        let gateway = test_gateway();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new();

        handle_text(&gateway, &mut session, r#"{"action":"dance"}"#, &tx).await;

        assert_eq!(session.subscription_count(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscribe_without_symbol_ignored() {
        let gateway = test_gateway();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = Session::new();

        handle_text(&gateway, &mut session, r#"{"action":"subscribe"}"#, &tx).await;

        assert_eq!(session.subscription_count(), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_round_trip() {
        let gateway = test_gateway();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = Session::new();

        handle_text(
            &gateway,
            &mut session,
            r#"{"action":"subscribe","symbol":"msft","assetClass":"etf"}"#,
            &tx,
        )
        .await;
        assert_eq!(session.subscription_count(), 1);

        handle_text(
            &gateway,
            &mut session,
            r#"{"action":"unsubscribe","symbol":"MSFT"}"#,
            &tx,
        )
        .await;
        assert_eq!(session.subscription_count(), 0);
    }
}
