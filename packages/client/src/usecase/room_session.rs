//! UseCase: ルームの作成・参加・退出とメンバー管理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - create_room / join_room / leave_room の検証と送信内容
//! - roomCreated / roomJoined / userJoined / userLeft / newHost / error の受信処理
//!
//! ### なぜこのテストが必要か
//! - メンバー一覧が常に最新のスナップショットと一致することを保証
//! - ホスト判定が自分の接続 ID との比較だけで決まることを保証
//! - 途中参加者が既に再生中のエピソードへ一度だけ移動することを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：作成、参加、退出、ホスト交代
//! - 異常系：空のニックネームやルームコード、未接続、ルーム外での退出
//! - エッジケース：古いホスト ID による newHost、チャット履歴つきの参加

use crate::domain::{
    ChatEntry, ChatLog, ClientEvent, ConnectionId, CurrentEpisode, Member, NavigationIntent,
    Nickname, PhaseTrigger, Room, RoomCode, WatchLocation,
};

use super::{effect::SessionEffect, error::SessionError, session::WatchPartySession};

impl WatchPartySession {
    /// Ask the coordination service to create a room hosted by us.
    ///
    /// # Errors
    ///
    /// * `Validation` - empty nickname
    /// * `NotConnected` - no live connection
    /// * `AlreadyInRoom` - already sitting in a room
    pub fn create_room(&mut self, nickname: &str) -> Result<(), SessionError> {
        let nickname = Nickname::new(nickname)?;
        let transport = self.live_transport()?.clone();
        self.ensure_no_room()?;

        tracing::info!("Requesting new room as '{}'", nickname);
        transport.send(ClientEvent::CreateRoom { nickname })?;
        Ok(())
    }

    /// Ask to join an existing room.
    ///
    /// # Errors
    ///
    /// * `Validation` - empty code or nickname
    /// * `NotConnected` - no live connection
    /// * `AlreadyInRoom` - already sitting in a room
    pub fn join_room(&mut self, code: &str, nickname: &str) -> Result<(), SessionError> {
        let room_code = RoomCode::new(code)?;
        let nickname = Nickname::new(nickname)?;
        let transport = self.live_transport()?.clone();
        self.ensure_no_room()?;

        tracing::info!("Requesting to join room '{}' as '{}'", room_code, nickname);
        transport.send(ClientEvent::JoinRoom {
            room_code,
            nickname,
        })?;
        Ok(())
    }

    /// Leave the room: close the connection, clear state, and strip the room
    /// from the visible location.
    ///
    /// # Errors
    ///
    /// * `NotConnected` - no live connection
    /// * `NoActiveRoom` - not in a room
    pub fn leave_room(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        let transport = self.live_transport()?.clone();
        let code = self.active_room()?.code.clone();

        tracing::info!("Leaving room '{}'", code);
        transport.close();
        let _ = self.transition(PhaseTrigger::Left);
        self.clear();

        let mut effects = vec![SessionEffect::SessionReset];
        if let Some(location) = &self.location
            && location.room_code.is_some()
        {
            let stripped = location.without_room();
            self.location = Some(stripped.clone());
            effects.push(SessionEffect::Navigate(NavigationIntent::Replace(stripped)));
        }
        Ok(effects)
    }

    pub(super) fn on_room_created(
        &mut self,
        room_code: RoomCode,
        members: Vec<Member>,
    ) -> Vec<SessionEffect> {
        self.enter_room(room_code, true, members, ChatLog::new(), None)
    }

    pub(super) fn on_room_joined(
        &mut self,
        room_code: RoomCode,
        is_host: bool,
        members: Vec<Member>,
        chat: Option<Vec<ChatEntry>>,
        current_episode: Option<CurrentEpisode>,
    ) -> Vec<SessionEffect> {
        let chat = chat.map(ChatLog::from_snapshot).unwrap_or_default();
        self.enter_room(room_code, is_host, members, chat, current_episode)
    }

    pub(super) fn on_membership_changed(
        &mut self,
        members: Vec<Member>,
        nickname: &str,
        joined: bool,
    ) -> Vec<SessionEffect> {
        let Some(room) = self.room.as_mut() else {
            tracing::debug!("Ignoring membership change outside a room");
            return Vec::new();
        };
        room.replace_members(members);

        let notice = if joined {
            format!("{nickname} joined the room")
        } else {
            format!("{nickname} left the room")
        };
        tracing::info!("{}", notice);
        vec![self.append_system_entry(notice)]
    }

    pub(super) fn on_new_host(
        &mut self,
        members: Vec<Member>,
        new_host_id: ConnectionId,
        new_host_nickname: &str,
    ) -> Vec<SessionEffect> {
        let is_host = self.connection_id.as_ref() == Some(&new_host_id);
        let Some(room) = self.room.as_mut() else {
            tracing::debug!("Ignoring host change outside a room");
            return Vec::new();
        };
        room.replace_members(members);
        room.is_host = is_host;
        let _ = self.transition(PhaseTrigger::HostChanged { is_host });

        tracing::info!(
            "New host is '{}' ({}), local host: {}",
            new_host_nickname,
            new_host_id,
            is_host
        );
        let notice = self.append_system_entry(format!("{new_host_nickname} is now the host"));
        vec![notice, SessionEffect::HostChanged { is_host }]
    }

    pub(super) fn on_error(&mut self, message: String) -> Vec<SessionEffect> {
        tracing::warn!("Room service reported an error: {}", message);
        self.last_error = Some(message.clone());
        vec![SessionEffect::ErrorReported(message)]
    }

    fn ensure_no_room(&self) -> Result<(), SessionError> {
        match &self.room {
            Some(room) => Err(SessionError::AlreadyInRoom(room.code.to_string())),
            None => Ok(()),
        }
    }

    fn enter_room(
        &mut self,
        room_code: RoomCode,
        is_host: bool,
        members: Vec<Member>,
        chat: ChatLog,
        current_episode: Option<CurrentEpisode>,
    ) -> Vec<SessionEffect> {
        if let Err(e) = self.transition(PhaseTrigger::RoomEntered { is_host }) {
            tracing::warn!("Ignoring room confirmation for '{}': {}", room_code, e);
            return Vec::new();
        }
        debug_assert!(self.phase.is_in_room());

        tracing::info!(
            "Entered room '{}' with {} member(s) (host: {})",
            room_code,
            members.len(),
            is_host
        );
        self.room = Some(Room::new(room_code.clone(), is_host, members));
        self.chat = chat;
        self.last_error = None;

        let mut effects = vec![SessionEffect::RoomEntered {
            room_code: room_code.clone(),
            is_host,
        }];

        match current_episode {
            // Late joiner: go where the room already is, exactly once
            Some(episode) => {
                let target =
                    WatchLocation::new(episode.anime_id, episode.episode_id, Some(room_code));
                self.location = Some(target.clone());
                effects.push(SessionEffect::Navigate(NavigationIntent::Navigate(target)));
            }
            // Otherwise tag the current location so it can be shared
            None => {
                if let Some(location) = &self.location
                    && location.room_code.as_ref() != Some(&room_code)
                {
                    let tagged = WatchLocation {
                        room_code: Some(room_code),
                        ..location.clone()
                    };
                    self.location = Some(tagged.clone());
                    effects.push(SessionEffect::Navigate(NavigationIntent::Replace(tagged)));
                }
            }
        }
        effects
    }
}
