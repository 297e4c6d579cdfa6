//! Domain layer for the watch party client.
//!
//! This module contains session state and protocol types that are
//! independent of the wire format and of the transport implementation.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod navigation;
pub mod phase;
pub mod transport;
pub mod value_object;
pub mod video;

pub use entity::{ChatEntry, ChatLog, Member, Room};
pub use error::{ConnectionError, InvalidTransition, ValueObjectError};
pub use event::{ClientEvent, CurrentEpisode, ServerEvent};
pub use factory::{ChatEntryIdFactory, ConnectionIdFactory};
pub use navigation::{NavigationIntent, WatchLocation};
pub use phase::{PhaseTrigger, SessionPhase};
pub use transport::{Clock, Connection, ConnectionStatus, Connector, EventTransport, TransportEvent};
pub use value_object::{
    AnimeId, ChatEntryId, ConnectionId, EpisodeId, MessageContent, Nickname, RoomCode, Timestamp,
};
pub use video::{PlaybackCommand, VideoAction};
