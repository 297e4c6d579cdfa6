//! Seams between the session and the outside world.
//!
//! The domain defines these traits; `infrastructure` provides the concrete
//! WebSocket and clock implementations.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::{sync::mpsc, time::Instant};

use super::{
    error::ConnectionError,
    event::{ClientEvent, ServerEvent},
    value_object::ConnectionId,
};

/// Status of the transport connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connected,
}

/// Something the transport delivers to the session
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// A decoded inbound event
    Event(ServerEvent),
    /// The connection is gone (network loss or explicit close)
    Disconnected,
}

/// Outbound half of a live connection.
///
/// `send` is fire-and-forget: success only means the event was queued.
#[cfg_attr(test, mockall::automock)]
pub trait EventTransport: Send + Sync {
    /// Queue an event for delivery
    fn send(&self, event: ClientEvent) -> Result<(), ConnectionError>;

    /// Tear the connection down
    fn close(&self);

    /// Current status
    fn status(&self) -> ConnectionStatus;
}

/// A freshly established connection
pub struct Connection {
    pub transport: Arc<dyn EventTransport>,
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

/// Opens connections to the room-coordination service
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establish one connection identified by `connection_id`
    async fn connect(&self, connection_id: &ConnectionId) -> Result<Connection, ConnectionError>;
}

/// Monotonic time source
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}
