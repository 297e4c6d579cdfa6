//! Stand-in for a video player in the terminal client.

use crate::domain::{PlaybackCommand, VideoAction};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocalPlayer {
    pub playing: bool,
    /// Seconds
    pub position: f64,
}

impl LocalPlayer {
    /// Apply a playback action, returning the command it carried.
    ///
    /// Payloads from other players that do not look like a command leave the
    /// state untouched.
    pub fn apply(&mut self, action: &VideoAction) -> Option<PlaybackCommand> {
        let command = action.as_command()?;
        match command {
            PlaybackCommand::Play { position } => {
                self.playing = true;
                self.position = position;
            }
            PlaybackCommand::Pause { position } => {
                self.playing = false;
                self.position = position;
            }
            PlaybackCommand::Seek { position } => self.position = position,
        }
        Some(command)
    }
}
