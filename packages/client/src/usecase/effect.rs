//! Instructions the session hands back to the host environment.

use crate::domain::{ChatEntry, NavigationIntent, RoomCode, VideoAction};

/// Side effect produced while handling an inbound event
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Apply a playback action to the local player
    ApplyVideoAction(VideoAction),
    /// Change the visible location
    Navigate(NavigationIntent),
    /// A chat entry was appended to the log
    ChatAppended(ChatEntry),
    /// The local client entered a room
    RoomEntered { room_code: RoomCode, is_host: bool },
    /// Host flag was recomputed after a host change
    HostChanged { is_host: bool },
    /// The coordination service reported an error
    ErrorReported(String),
    /// Session state went back to the "no room" baseline
    SessionReset,
}
