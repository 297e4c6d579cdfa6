//! Named events exchanged with the room-coordination service.

use super::{
    entity::{ChatEntry, Member},
    value_object::{AnimeId, ConnectionId, EpisodeId, MessageContent, Nickname, RoomCode},
    video::VideoAction,
};

/// Outbound events, already validated
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    CreateRoom {
        nickname: Nickname,
    },
    JoinRoom {
        room_code: RoomCode,
        nickname: Nickname,
    },
    ChatMessage {
        message: MessageContent,
    },
    VideoAction {
        action: VideoAction,
    },
    ChangeEpisode {
        episode_id: EpisodeId,
        anime_id: AnimeId,
    },
}

impl ClientEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRoom { .. } => "createRoom",
            Self::JoinRoom { .. } => "joinRoom",
            Self::ChatMessage { .. } => "chatMessage",
            Self::VideoAction { .. } => "videoAction",
            Self::ChangeEpisode { .. } => "changeEpisode",
        }
    }
}

/// Episode a room is already watching, reported to late joiners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentEpisode {
    pub episode_id: EpisodeId,
    pub anime_id: AnimeId,
}

/// Inbound events
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    RoomCreated {
        room_code: RoomCode,
        is_host: bool,
        members: Vec<Member>,
    },
    RoomJoined {
        room_code: RoomCode,
        is_host: bool,
        members: Vec<Member>,
        chat: Option<Vec<ChatEntry>>,
        current_episode: Option<CurrentEpisode>,
    },
    UserJoined {
        members: Vec<Member>,
        nickname: String,
    },
    UserLeft {
        members: Vec<Member>,
        nickname: String,
    },
    NewHost {
        members: Vec<Member>,
        new_host_id: ConnectionId,
        new_host_nickname: String,
    },
    VideoAction {
        action: VideoAction,
    },
    ChangeEpisode {
        episode_id: EpisodeId,
        anime_id: AnimeId,
    },
    ChatMessage {
        entry: ChatEntry,
    },
    Error {
        message: String,
    },
}

impl ServerEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoomCreated { .. } => "roomCreated",
            Self::RoomJoined { .. } => "roomJoined",
            Self::UserJoined { .. } => "userJoined",
            Self::UserLeft { .. } => "userLeft",
            Self::NewHost { .. } => "newHost",
            Self::VideoAction { .. } => "videoAction",
            Self::ChangeEpisode { .. } => "changeEpisode",
            Self::ChatMessage { .. } => "chatMessage",
            Self::Error { .. } => "error",
        }
    }
}
