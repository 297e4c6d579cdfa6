//! WebSocket message DTOs for the room-coordination protocol.
//!
//! Every frame is a JSON text message of the form
//! `{"event": "<name>", "data": { ...camelCase fields... }}`.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    AnimeId, ChatEntry, ChatEntryId, ChatEntryIdFactory, ClientEvent, ConnectionId,
    CurrentEpisode, EpisodeId, Member, Nickname, RoomCode, ServerEvent, Timestamp,
    ValueObjectError, VideoAction,
};

/// Errors while converting between wire frames and domain events
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DtoError {
    /// The frame is not valid JSON or has an unknown shape
    #[error("Malformed frame: {0}")]
    Malformed(String),

    /// A field failed domain validation
    #[error("Invalid field: {0}")]
    InvalidField(#[from] ValueObjectError),

    /// A timestamp could not be interpreted
    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Identifier that may arrive as a JSON string or number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Timestamp as Unix milliseconds or an RFC 3339 string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Millis(i64),
    Text(String),
}

impl TryFrom<WireTimestamp> for Timestamp {
    type Error = DtoError;

    fn try_from(value: WireTimestamp) -> Result<Self, Self::Error> {
        match value {
            WireTimestamp::Millis(millis) => Ok(Timestamp::new(millis)),
            WireTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| Timestamp::new(dt.timestamp_millis()))
                .map_err(|_| DtoError::InvalidTimestamp(text)),
        }
    }
}

/// Member as sent by the coordination service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    #[serde(alias = "connectionId")]
    pub id: String,
    pub nickname: String,
}

/// Full chat entry as sent by the coordination service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntryDto {
    #[serde(default)]
    pub id: String,
    pub nickname: String,
    pub message: String,
    pub timestamp: WireTimestamp,
    #[serde(default)]
    pub is_system: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomPayload {
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_code: String,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoActionPayload {
    pub action: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEpisodePayload {
    pub episode_id: WireId,
    pub anime_id: WireId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreatedPayload {
    pub room_code: String,
    #[serde(default)]
    pub is_host: bool,
    pub members: Vec<MemberDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomJoinedPayload {
    pub room_code: String,
    #[serde(default)]
    pub is_host: bool,
    pub members: Vec<MemberDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<Vec<ChatEntryDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_episode: Option<WireId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anime_id: Option<WireId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPayload {
    pub members: Vec<MemberDto>,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHostPayload {
    pub members: Vec<MemberDto>,
    pub new_host_id: String,
    pub new_host_nickname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
}

/// Frames sent by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    CreateRoom(CreateRoomPayload),
    JoinRoom(JoinRoomPayload),
    ChatMessage(ChatMessagePayload),
    VideoAction(VideoActionPayload),
    ChangeEpisode(ChangeEpisodePayload),
}

/// Frames sent by the coordination service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    RoomCreated(RoomCreatedPayload),
    RoomJoined(RoomJoinedPayload),
    UserJoined(MembershipPayload),
    UserLeft(MembershipPayload),
    NewHost(NewHostPayload),
    VideoAction(VideoActionPayload),
    ChangeEpisode(ChangeEpisodePayload),
    ChatMessage(ChatEntryDto),
    Error(ErrorPayload),
}

impl From<ClientEvent> for ClientMessage {
    fn from(event: ClientEvent) -> Self {
        match event {
            ClientEvent::CreateRoom { nickname } => Self::CreateRoom(CreateRoomPayload {
                nickname: nickname.into_string(),
            }),
            ClientEvent::JoinRoom {
                room_code,
                nickname,
            } => Self::JoinRoom(JoinRoomPayload {
                room_code: room_code.into_string(),
                nickname: nickname.into_string(),
            }),
            ClientEvent::ChatMessage { message } => Self::ChatMessage(ChatMessagePayload {
                message: message.into_string(),
            }),
            ClientEvent::VideoAction { action } => Self::VideoAction(VideoActionPayload {
                action: action.into_payload(),
            }),
            ClientEvent::ChangeEpisode {
                episode_id,
                anime_id,
            } => Self::ChangeEpisode(ChangeEpisodePayload {
                episode_id: WireId::Text(episode_id.as_str().to_string()),
                anime_id: WireId::Text(anime_id.as_str().to_string()),
            }),
        }
    }
}

impl TryFrom<MemberDto> for Member {
    type Error = DtoError;

    fn try_from(dto: MemberDto) -> Result<Self, Self::Error> {
        Ok(Member::new(
            ConnectionId::try_from(dto.id)?,
            Nickname::from_remote(dto.nickname)?,
        ))
    }
}

impl TryFrom<ChatEntryDto> for ChatEntry {
    type Error = DtoError;

    fn try_from(dto: ChatEntryDto) -> Result<Self, Self::Error> {
        // Entries without an id still need a locally unique one
        let id = if dto.id.is_empty() {
            ChatEntryIdFactory::generate()
        } else {
            ChatEntryId::new(dto.id)?
        };
        Ok(ChatEntry {
            id,
            nickname: dto.nickname,
            message: dto.message,
            timestamp: dto.timestamp.try_into()?,
            is_system: dto.is_system,
        })
    }
}

fn convert_members(members: Vec<MemberDto>) -> Result<Vec<Member>, DtoError> {
    members.into_iter().map(Member::try_from).collect()
}

impl TryFrom<ServerMessage> for ServerEvent {
    type Error = DtoError;

    fn try_from(message: ServerMessage) -> Result<Self, DtoError> {
        let event = match message {
            ServerMessage::RoomCreated(p) => ServerEvent::RoomCreated {
                room_code: RoomCode::from_remote(p.room_code)?,
                is_host: p.is_host,
                members: convert_members(p.members)?,
            },
            ServerMessage::RoomJoined(p) => {
                let chat = p
                    .chat
                    .map(|entries| {
                        entries
                            .into_iter()
                            .map(ChatEntry::try_from)
                            .collect::<Result<Vec<_>, _>>()
                    })
                    .transpose()?;
                // Both halves are needed to locate the episode
                let current_episode = match (p.current_episode, p.anime_id) {
                    (Some(episode), Some(anime)) => Some(CurrentEpisode {
                        episode_id: EpisodeId::try_from(episode.into_string())?,
                        anime_id: AnimeId::try_from(anime.into_string())?,
                    }),
                    _ => None,
                };
                ServerEvent::RoomJoined {
                    room_code: RoomCode::from_remote(p.room_code)?,
                    is_host: p.is_host,
                    members: convert_members(p.members)?,
                    chat,
                    current_episode,
                }
            }
            ServerMessage::UserJoined(p) => ServerEvent::UserJoined {
                members: convert_members(p.members)?,
                nickname: p.nickname,
            },
            ServerMessage::UserLeft(p) => ServerEvent::UserLeft {
                members: convert_members(p.members)?,
                nickname: p.nickname,
            },
            ServerMessage::NewHost(p) => ServerEvent::NewHost {
                members: convert_members(p.members)?,
                new_host_id: ConnectionId::try_from(p.new_host_id)?,
                new_host_nickname: p.new_host_nickname,
            },
            ServerMessage::VideoAction(p) => ServerEvent::VideoAction {
                action: VideoAction::new(p.action),
            },
            ServerMessage::ChangeEpisode(p) => ServerEvent::ChangeEpisode {
                episode_id: EpisodeId::try_from(p.episode_id.into_string())?,
                anime_id: AnimeId::try_from(p.anime_id.into_string())?,
            },
            ServerMessage::ChatMessage(entry) => ServerEvent::ChatMessage {
                entry: entry.try_into()?,
            },
            ServerMessage::Error(p) => ServerEvent::Error { message: p.message },
        };
        Ok(event)
    }
}

/// Encode an outbound event as a JSON text frame
pub fn encode(event: ClientEvent) -> Result<String, DtoError> {
    serde_json::to_string(&ClientMessage::from(event))
        .map_err(|e| DtoError::Malformed(e.to_string()))
}

/// Decode an inbound JSON text frame
pub fn decode(text: &str) -> Result<ServerEvent, DtoError> {
    let message: ServerMessage =
        serde_json::from_str(text).map_err(|e| DtoError::Malformed(e.to_string()))?;
    ServerEvent::try_from(message)
}
