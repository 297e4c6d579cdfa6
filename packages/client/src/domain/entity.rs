//! Core domain models for the watch party session.

use serde::{Deserialize, Serialize};

use super::{
    factory::ChatEntryIdFactory,
    value_object::{ChatEntryId, ConnectionId, Nickname, RoomCode, Timestamp},
};

/// A member of a room, as last reported by the coordination service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Connection identifier of the member
    pub connection_id: ConnectionId,
    /// Display name
    pub nickname: Nickname,
}

impl Member {
    /// Create a new member
    pub fn new(connection_id: ConnectionId, nickname: Nickname) -> Self {
        Self {
            connection_id,
            nickname,
        }
    }
}

/// A single line of the room chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: ChatEntryId,
    /// Author nickname (empty for system entries)
    pub nickname: String,
    pub message: String,
    pub timestamp: Timestamp,
    /// Synthesized notice rather than a user-authored message
    pub is_system: bool,
}

impl ChatEntry {
    /// Create a user-authored entry
    pub fn new(id: ChatEntryId, nickname: String, message: String, timestamp: Timestamp) -> Self {
        Self {
            id,
            nickname,
            message,
            timestamp,
            is_system: false,
        }
    }

    /// Synthesize a system notice with a fresh time-ordered id
    pub fn system(message: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            id: ChatEntryIdFactory::generate(),
            nickname: String::new(),
            message: message.into(),
            timestamp,
            is_system: true,
        }
    }
}

/// Append-only chat history in arrival order.
///
/// There is no edit or delete; the only way to drop entries is to replace
/// the whole log when the session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatLog {
    entries: Vec<ChatEntry>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from a history snapshot, keeping its order
    pub fn from_snapshot(entries: Vec<ChatEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry at the end of the log
    pub fn append(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }
}

/// The room the local client currently sits in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub code: RoomCode,
    /// Whether the local connection is the host
    pub is_host: bool,
    /// Cached member list, replaced wholesale on every notification
    pub members: Vec<Member>,
}

impl Room {
    pub fn new(code: RoomCode, is_host: bool, members: Vec<Member>) -> Self {
        Self {
            code,
            is_host,
            members,
        }
    }

    /// Replace the cached member list with a fresh snapshot
    pub fn replace_members(&mut self, members: Vec<Member>) {
        self.members = members;
    }

    /// Get a member by connection ID
    pub fn get_member(&self, connection_id: &ConnectionId) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| &m.connection_id == connection_id)
    }
}
