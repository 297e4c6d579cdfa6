//! UseCase: 再生アクションの同期
//!
//! ホストだけが再生アクションを配信できます。配信直前にエコー抑制の
//! ウィンドウを開始し、ウィンドウ内に届いた受信アクションは破棄します。
//! ホスト以外は抑制フラグを立てることがないため、受信アクションを常に適用します。

use crate::domain::{ClientEvent, VideoAction};

use super::{effect::SessionEffect, error::SessionError, session::WatchPartySession};

impl WatchPartySession {
    /// Broadcast a local playback action to the room.
    ///
    /// # Errors
    ///
    /// * `NoActiveRoom` - not in a room
    /// * `NotHost` - only the host drives playback
    /// * `NotConnected` - no live connection
    pub fn broadcast_action(&mut self, action: VideoAction) -> Result<(), SessionError> {
        self.hosted_room()?;
        let transport = self.live_transport()?.clone();

        self.echo.mark_outbound_sent();
        tracing::debug!("Broadcasting video action {}", action.payload());
        transport.send(ClientEvent::VideoAction { action })?;
        Ok(())
    }

    /// Whether an inbound action arriving now would reach the player
    pub fn should_apply_inbound_action(&self) -> bool {
        self.echo.should_apply_inbound_action()
    }

    pub(super) fn on_video_action(&mut self, action: VideoAction) -> Vec<SessionEffect> {
        if self.room.is_none() {
            tracing::debug!("Ignoring video action outside a room");
            return Vec::new();
        }
        if !self.echo.should_apply_inbound_action() {
            tracing::debug!("Suppressed echoed video action {}", action.payload());
            return Vec::new();
        }
        vec![SessionEffect::ApplyVideoAction(action)]
    }
}
