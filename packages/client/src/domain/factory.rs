//! Domain factories for generating identifiers.

use super::value_object::{ChatEntryId, ConnectionId};

/// Factory for generating ConnectionId instances.
///
/// Every session start gets a fresh identifier; a client that reconnects
/// never reuses the one from its previous connection.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    pub fn generate() -> ConnectionId {
        ConnectionId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating ChatEntryId instances for locally synthesized entries.
pub struct ChatEntryIdFactory;

impl ChatEntryIdFactory {
    /// Generate a new ChatEntryId with a UUID v7.
    ///
    /// UUID v7 embeds the creation time, so ids generated later sort after
    /// ids generated earlier.
    pub fn generate() -> ChatEntryId {
        ChatEntryId::from_uuid(uuid::Uuid::now_v7())
    }
}
