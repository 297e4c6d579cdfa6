//! Domain layer error definitions.

use thiserror::Error;

use super::phase::{PhaseTrigger, SessionPhase};

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Nickname validation error
    #[error("Nickname cannot be empty")]
    NicknameEmpty,

    /// Nickname too long error
    #[error("Nickname cannot exceed {max} characters (got {actual})")]
    NicknameTooLong { max: usize, actual: usize },

    /// RoomCode validation error
    #[error("RoomCode cannot be empty")]
    RoomCodeEmpty,

    /// RoomCode too long error
    #[error("RoomCode cannot exceed {max} characters (got {actual})")]
    RoomCodeTooLong { max: usize, actual: usize },

    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// MessageContent validation error
    #[error("MessageContent cannot be blank")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    /// EpisodeId validation error
    #[error("EpisodeId cannot be empty")]
    EpisodeIdEmpty,

    /// AnimeId validation error
    #[error("AnimeId cannot be empty")]
    AnimeIdEmpty,

    /// ChatEntryId validation error
    #[error("ChatEntryId cannot be empty")]
    ChatEntryIdEmpty,

    /// Navigation location could not be parsed
    #[error("Invalid watch location: {0}")]
    InvalidWatchLocation(String),
}

/// A trigger that has no edge from the current session phase.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("No transition from {from:?} on {trigger:?}")]
pub struct InvalidTransition {
    pub from: SessionPhase,
    pub trigger: PhaseTrigger,
}

/// Errors raised by the connection (transport) layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The connection could not be established
    #[error("Failed to connect to {endpoint}: {reason}")]
    ConnectFailed { endpoint: String, reason: String },

    /// The endpoint is not a valid WebSocket URL
    #[error("Invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    /// The connection is already closed
    #[error("Connection is closed")]
    Closed,

    /// The outbound event could not be encoded
    #[error("Failed to encode outbound event: {0}")]
    Encode(String),
}
