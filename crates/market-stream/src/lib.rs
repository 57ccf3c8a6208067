//! Streaming quote gateway.
//!
//! Clients connect over WebSocket and subscribe to per-symbol quote
//! channels. Channel interest is reference-counted across connections:
//! the first subscriber on a channel opens the upstream bus
//! subscription, the last one to leave closes it. Each connection owns
//! a session tracking its dispatcher handlers so teardown on
//! unsubscribe or disconnect is exact and idempotent.

pub mod bus;
pub mod dispatcher;
pub mod gateway;
pub mod poller;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;

pub use bus::LocalBus;
pub use gateway::{channel_for, QuoteGateway};
pub use poller::QuotePoller;
pub use registry::ChannelRegistry;
pub use server::GatewayServer;
pub use session::Session;
