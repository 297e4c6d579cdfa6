//! Watch party client library.
//!
//! Keeps a group of viewers on the same episode at the same playback
//! position: room membership, a shared chat log, host-driven playback and
//! episode synchronization over a WebSocket connection to the room service.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use ui::{ClientConfig, run_client};
