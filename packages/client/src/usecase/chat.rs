//! UseCase: チャットの送受信
//!
//! 送信したメッセージはローカルには追加しません。サーバーからのエコーが
//! 通常の chatMessage として届いた時点でログに追加されるため、送信者も含めた
//! 全員が同じ追加順序を見ることになります。

use crate::domain::{ChatEntry, ClientEvent, MessageContent};

use super::{effect::SessionEffect, error::SessionError, session::WatchPartySession};

impl WatchPartySession {
    /// Send a chat message to the room.
    ///
    /// The text is trimmed; nothing is appended locally.
    ///
    /// # Errors
    ///
    /// * `Validation` - blank message
    /// * `NoActiveRoom` - not in a room
    /// * `NotConnected` - no live connection
    pub fn send_message(&mut self, text: &str) -> Result<(), SessionError> {
        let message = MessageContent::new(text)?;
        self.active_room()?;
        let transport = self.live_transport()?;

        tracing::debug!("Sending chat message ({} chars)", message.char_count());
        transport.send(ClientEvent::ChatMessage { message })?;
        Ok(())
    }

    pub(super) fn on_chat_message(&mut self, entry: ChatEntry) -> Vec<SessionEffect> {
        if self.room.is_none() {
            tracing::debug!("Ignoring chat message outside a room");
            return Vec::new();
        }
        self.chat.append(entry.clone());
        vec![SessionEffect::ChatAppended(entry)]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        domain::{
            ChatEntryId, ConnectionId, RoomCode, ServerEvent, Timestamp, ValueObjectError,
        },
        usecase::{
            echo_suppression::DEFAULT_ECHO_WINDOW,
            test_support::{ManualClock, SentEvents, member, recording_transport},
        },
    };

    fn session_in_room() -> (WatchPartySession, SentEvents) {
        let mut session =
            WatchPartySession::new(Arc::new(ManualClock::new()), DEFAULT_ECHO_WINDOW);
        let (transport, sent) = recording_transport();
        session
            .attach(ConnectionId::new("me").unwrap(), Arc::new(transport))
            .unwrap();
        session.handle_event(ServerEvent::RoomJoined {
            room_code: RoomCode::new("ABC").unwrap(),
            is_host: false,
            members: vec![member("me", "bob")],
            chat: None,
            current_episode: None,
        });
        (session, sent)
    }

    fn chat_event(id: &str, nickname: &str, message: &str) -> ServerEvent {
        ServerEvent::ChatMessage {
            entry: ChatEntry::new(
                ChatEntryId::new(id).unwrap(),
                nickname.to_string(),
                message.to_string(),
                Timestamp::new(1000),
            ),
        }
    }

    #[test]
    fn test_send_blank_message_sends_nothing() {
        // テスト項目: 空文字・空白のみのメッセージは送信されない
        // given (前提条件):
        let (mut session, sent) = session_in_room();

        // when (操作):
        let empty = session.send_message("");
        let blank = session.send_message("   ");

        // then (期待する結果):
        let expected = Err(SessionError::Validation(
            ValueObjectError::MessageContentEmpty,
        ));
        assert_eq!(empty, expected);
        assert_eq!(blank, expected);
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_send_message_trims_and_forwards() {
        // テスト項目: メッセージは trim されて送信され、ローカルには追加されない
        // given (前提条件):
        let (mut session, sent) = session_in_room();

        // when (操作):
        let result = session.send_message("  hi  ");

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            sent.lock().unwrap().as_slice(),
            &[ClientEvent::ChatMessage {
                message: MessageContent::new("hi").unwrap()
            }]
        );
        assert!(session.chat().is_empty());
    }

    #[test]
    fn test_send_message_outside_room_fails() {
        // テスト項目: ルーム外ではチャットを送信できない
        let mut session =
            WatchPartySession::new(Arc::new(ManualClock::new()), DEFAULT_ECHO_WINDOW);
        let (transport, sent) = recording_transport();
        session
            .attach(ConnectionId::new("me").unwrap(), Arc::new(transport))
            .unwrap();

        assert_eq!(session.send_message("hi"), Err(SessionError::NoActiveRoom));
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_own_message_appears_when_echoed() {
        // テスト項目: 自分のメッセージはサーバーからのエコーで初めてログに載る
        // given (前提条件):
        let (mut session, _sent) = session_in_room();
        session.send_message("hello").unwrap();

        // when (操作):
        let effects = session.handle_event(chat_event("m1", "bob", "hello"));

        // then (期待する結果):
        assert_eq!(session.chat().len(), 1);
        assert_eq!(session.chat().entries()[0].message, "hello");
        assert!(matches!(effects.as_slice(), [SessionEffect::ChatAppended(_)]));
    }

    #[test]
    fn test_inbound_messages_keep_arrival_order() {
        // テスト項目: 受信メッセージは到着順に追加され、並べ替えられない
        let (mut session, _sent) = session_in_room();

        for (id, nick) in [("c", "carol"), ("a", "alice"), ("b", "bob")] {
            session.handle_event(chat_event(id, nick, "msg"));
        }

        let ids: Vec<&str> = session
            .chat()
            .entries()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_chat_outside_room_is_ignored() {
        // テスト項目: ルーム外で届いたチャットは無視される
        let mut session =
            WatchPartySession::new(Arc::new(ManualClock::new()), DEFAULT_ECHO_WINDOW);

        let effects = session.handle_event(chat_event("m1", "alice", "hi"));

        assert!(effects.is_empty());
        assert!(session.chat().is_empty());
    }
}
