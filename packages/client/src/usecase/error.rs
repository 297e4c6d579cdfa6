//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{ConnectionError, ValueObjectError};

/// Errors returned by session operations.
///
/// Every variant except `Connection` is raised before anything is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Input rejected locally (empty nickname, blank message, ...)
    #[error("Validation failed: {0}")]
    Validation(#[from] ValueObjectError),

    /// No live transport connection
    #[error("Not connected to the room service")]
    NotConnected,

    /// A connection is already attached to this session
    #[error("Session already has a connection")]
    AlreadyConnected,

    /// Operation requires an active room
    #[error("Not in a room")]
    NoActiveRoom,

    /// Operation requires not being in a room
    #[error("Already in room {0}")]
    AlreadyInRoom(String),

    /// Operation is reserved for the room host
    #[error("Only the host can do this")]
    NotHost,

    /// The transport refused the outbound event
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

impl SessionError {
    /// Validation failures are silent no-ops from the user's point of view
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
