//! UseCase: ウォッチパーティーのセッション
//!
//! セッションの全状態（接続、ルーム、チャットログ、表示中の場所、エコー抑制）を
//! ひとつのオブジェクトが所有します。受信イベントは `handle_event` で
//! イベント名ごとにひとつのハンドラへ振り分けられ、フェーズ遷移は
//! `SessionPhase::next` の遷移表に従います。
//!
//! 各コンポーネントの処理は以下のファイルに分かれています。
//!
//! - `room_session.rs`: ルームの作成・参加・退出、メンバー変更、ホスト交代
//! - `chat.rs`: チャットの送受信
//! - `video_sync.rs`: 再生アクションの同期
//! - `episode_sync.rs`: エピソード変更の同期

use std::{sync::Arc, time::Duration};

use watchparty_shared::time::now_millis;

use crate::domain::{
    ChatEntry, ChatLog, Clock, ConnectionId, ConnectionStatus, EventTransport, Member,
    PhaseTrigger, Room, RoomCode, ServerEvent, SessionPhase, Timestamp, TransportEvent,
    WatchLocation,
};

use super::{echo_suppression::EchoSuppressor, effect::SessionEffect, error::SessionError};

/// Client-side state of one watch party session
pub struct WatchPartySession {
    pub(super) phase: SessionPhase,
    pub(super) transport: Option<Arc<dyn EventTransport>>,
    /// Identifier of the attached connection, compared against host ids
    pub(super) connection_id: Option<ConnectionId>,
    pub(super) room: Option<Room>,
    pub(super) chat: ChatLog,
    pub(super) last_error: Option<String>,
    /// Location the host environment is currently showing
    pub(super) location: Option<WatchLocation>,
    pub(super) echo: EchoSuppressor,
}

impl WatchPartySession {
    /// Create a disconnected session.
    ///
    /// # Arguments
    ///
    /// * `clock` - Time source for the echo suppression window
    /// * `echo_window` - How long inbound playback actions are dropped after a broadcast
    pub fn new(clock: Arc<dyn Clock>, echo_window: Duration) -> Self {
        Self {
            phase: SessionPhase::Disconnected,
            transport: None,
            connection_id: None,
            room: None,
            chat: ChatLog::new(),
            last_error: None,
            location: None,
            echo: EchoSuppressor::new(clock, echo_window),
        }
    }

    /// Attach a freshly established connection.
    ///
    /// # Errors
    ///
    /// `AlreadyConnected` if a connection is attached already.
    pub fn attach(
        &mut self,
        connection_id: ConnectionId,
        transport: Arc<dyn EventTransport>,
    ) -> Result<(), SessionError> {
        if self.transport.is_some() {
            return Err(SessionError::AlreadyConnected);
        }
        self.transition(PhaseTrigger::Connected)
            .map_err(|_| SessionError::AlreadyConnected)?;

        tracing::info!("Attached connection '{}'", connection_id);
        self.connection_id = Some(connection_id);
        self.transport = Some(transport);
        Ok(())
    }

    /// Feed one transport event through the session
    pub fn handle_transport_event(&mut self, event: TransportEvent) -> Vec<SessionEffect> {
        match event {
            TransportEvent::Event(event) => self.handle_event(event),
            TransportEvent::Disconnected => self.handle_disconnect(),
        }
    }

    /// Dispatch one inbound event to its handler.
    ///
    /// Events run to completion in arrival order.
    pub fn handle_event(&mut self, event: ServerEvent) -> Vec<SessionEffect> {
        tracing::debug!("Handling inbound '{}'", event.name());
        match event {
            ServerEvent::RoomCreated {
                room_code, members, ..
            } => self.on_room_created(room_code, members),
            ServerEvent::RoomJoined {
                room_code,
                is_host,
                members,
                chat,
                current_episode,
            } => self.on_room_joined(room_code, is_host, members, chat, current_episode),
            ServerEvent::UserJoined { members, nickname } => {
                self.on_membership_changed(members, &nickname, true)
            }
            ServerEvent::UserLeft { members, nickname } => {
                self.on_membership_changed(members, &nickname, false)
            }
            ServerEvent::NewHost {
                members,
                new_host_id,
                new_host_nickname,
            } => self.on_new_host(members, new_host_id, &new_host_nickname),
            ServerEvent::VideoAction { action } => self.on_video_action(action),
            ServerEvent::ChangeEpisode {
                episode_id,
                anime_id,
            } => self.on_change_episode(episode_id, anime_id),
            ServerEvent::ChatMessage { entry } => self.on_chat_message(entry),
            ServerEvent::Error { message } => self.on_error(message),
        }
    }

    /// The transport dropped: reset to the "no room" baseline.
    ///
    /// No reconnection is attempted.
    pub fn handle_disconnect(&mut self) -> Vec<SessionEffect> {
        if !self.phase.is_connected() && self.transport.is_none() {
            return Vec::new();
        }
        tracing::warn!("Connection lost, clearing session state");
        // ConnectionLost has an edge from every phase
        let _ = self.transition(PhaseTrigger::ConnectionLost);
        self.clear();
        vec![SessionEffect::SessionReset]
    }

    /// Record the location the host environment is showing
    pub fn set_location(&mut self, location: Option<WatchLocation>) {
        self.location = location;
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.transport
            .as_ref()
            .map(|t| t.status())
            .unwrap_or(ConnectionStatus::Disconnected)
    }

    pub fn connection_id(&self) -> Option<&ConnectionId> {
        self.connection_id.as_ref()
    }

    pub fn room_code(&self) -> Option<&RoomCode> {
        self.room.as_ref().map(|r| &r.code)
    }

    pub fn is_host(&self) -> bool {
        self.room.as_ref().is_some_and(|r| r.is_host)
    }

    pub fn members(&self) -> &[Member] {
        self.room.as_ref().map(|r| r.members.as_slice()).unwrap_or(&[])
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn location(&self) -> Option<&WatchLocation> {
        self.location.as_ref()
    }

    pub fn echo_window(&self) -> Duration {
        self.echo.window()
    }

    /// Apply a phase trigger, keeping the current phase when the table has no edge.
    pub(super) fn transition(
        &mut self,
        trigger: PhaseTrigger,
    ) -> Result<SessionPhase, crate::domain::InvalidTransition> {
        let next = self.phase.next(trigger)?;
        if next != self.phase {
            tracing::debug!("Session phase {:?} -> {:?}", self.phase, next);
        }
        self.phase = next;
        Ok(next)
    }

    /// Live transport, or `NotConnected`
    pub(super) fn live_transport(&self) -> Result<&Arc<dyn EventTransport>, SessionError> {
        match &self.transport {
            Some(t) if t.status() == ConnectionStatus::Connected => Ok(t),
            _ => Err(SessionError::NotConnected),
        }
    }

    /// Room the session is in, or `NoActiveRoom`
    pub(super) fn active_room(&self) -> Result<&Room, SessionError> {
        self.room.as_ref().ok_or(SessionError::NoActiveRoom)
    }

    /// Active room owned by the local host, or the matching error
    pub(super) fn hosted_room(&self) -> Result<&Room, SessionError> {
        let room = self.active_room()?;
        if !room.is_host {
            return Err(SessionError::NotHost);
        }
        Ok(room)
    }

    /// Append a synthesized system entry and report it
    pub(super) fn append_system_entry(&mut self, message: String) -> SessionEffect {
        let entry = ChatEntry::system(message, Timestamp::new(now_millis()));
        self.chat.append(entry.clone());
        SessionEffect::ChatAppended(entry)
    }

    /// Forget everything tied to the connection and room
    pub(super) fn clear(&mut self) {
        self.transport = None;
        self.connection_id = None;
        self.room = None;
        self.chat = ChatLog::new();
        self.last_error = None;
        self.echo.reset();
    }
}
