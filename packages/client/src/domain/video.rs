//! Playback action payloads.

use serde::{Deserialize, Serialize};

/// Opaque playback intent relayed between players.
///
/// The session never inspects it; it carries no originator field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoAction(serde_json::Value);

impl VideoAction {
    pub fn new(payload: serde_json::Value) -> Self {
        Self(payload)
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_payload(self) -> serde_json::Value {
        self.0
    }

    /// Interpret the payload as a [`PlaybackCommand`], if it has that shape.
    pub fn as_command(&self) -> Option<PlaybackCommand> {
        serde_json::from_value(self.0.clone()).ok()
    }
}

/// Typed playback commands produced by the bundled CLI player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackCommand {
    Play { position: f64 },
    Pause { position: f64 },
    Seek { position: f64 },
}

impl From<PlaybackCommand> for VideoAction {
    fn from(command: PlaybackCommand) -> Self {
        let payload = match command {
            PlaybackCommand::Play { position } => {
                serde_json::json!({ "type": "play", "position": position })
            }
            PlaybackCommand::Pause { position } => {
                serde_json::json!({ "type": "pause", "position": position })
            }
            PlaybackCommand::Seek { position } => {
                serde_json::json!({ "type": "seek", "position": position })
            }
        };
        Self(payload)
    }
}
