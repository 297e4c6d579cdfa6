//! Session phase transition table.

use super::error::InvalidTransition;

/// Coarse state of the local session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No transport connection
    Disconnected,
    /// Connected, not (yet) in a room
    ConnectedNoRoom,
    /// In a room as its host
    HostInRoom,
    /// In a room as a regular member
    MemberInRoom,
}

/// Something that moves the session between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseTrigger {
    /// The transport connection came up
    Connected,
    /// A create or join request succeeded
    RoomEntered { is_host: bool },
    /// The coordination service announced a new host
    HostChanged { is_host: bool },
    /// The user left the room (connection torn down)
    Left,
    /// The transport dropped
    ConnectionLost,
}

impl SessionPhase {
    fn in_room(is_host: bool) -> Self {
        if is_host {
            Self::HostInRoom
        } else {
            Self::MemberInRoom
        }
    }

    pub fn is_in_room(self) -> bool {
        matches!(self, Self::HostInRoom | Self::MemberInRoom)
    }

    pub fn is_connected(self) -> bool {
        !matches!(self, Self::Disconnected)
    }

    /// Look up the next phase for `trigger`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when the table has no edge for the pair;
    /// the caller keeps its current phase.
    pub fn next(self, trigger: PhaseTrigger) -> Result<Self, InvalidTransition> {
        use PhaseTrigger as T;
        use SessionPhase as P;

        match (self, trigger) {
            (P::Disconnected, T::Connected) => Ok(P::ConnectedNoRoom),
            (P::ConnectedNoRoom, T::RoomEntered { is_host }) => Ok(Self::in_room(is_host)),
            (P::HostInRoom | P::MemberInRoom, T::HostChanged { is_host }) => {
                Ok(Self::in_room(is_host))
            }
            (P::HostInRoom | P::MemberInRoom, T::Left) => Ok(P::Disconnected),
            (_, T::ConnectionLost) => Ok(P::Disconnected),
            (from, trigger) => Err(InvalidTransition { from, trigger }),
        }
    }
}
