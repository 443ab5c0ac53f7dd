//! Relay transport
//!
//! Each relay is an independent sink. The transport delivers one event to
//! one relay and reports whether the relay accepted it; fan-out, timeouts
//! and outcome aggregation belong to the publisher.

mod message;
mod websocket;

pub use message::{ClientMessage, RelayMessage};
pub use websocket::WebSocketTransport;

use crate::error::Result;
use crate::event::Event;
use async_trait::async_trait;

/// Delivery of a signed event to a single relay
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Send `event` to `relay`, resolving once the relay has accepted it.
    ///
    /// A relay that answers with a rejection fails with `Error::Relay`.
    async fn send(&self, relay: &str, event: &Event) -> Result<()>;
}
