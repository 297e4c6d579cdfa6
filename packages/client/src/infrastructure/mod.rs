//! Infrastructure layer: wire format, WebSocket transport and clock.

pub mod clock;
pub mod dto;
pub mod transport;

pub use clock::SystemClock;
pub use transport::{WebSocketConnector, WebSocketTransport};
