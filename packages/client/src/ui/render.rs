//! 画面表示用の文字列整形
//!
//! 端末への出力はすべてここで文字列に変換してから runner が表示します。

use watchparty_shared::time::format_clock_time;

use crate::{
    domain::{ChatEntry, NavigationIntent, PlaybackCommand, VideoAction},
    usecase::{SessionEffect, WatchPartySession},
};

pub fn chat_entry(entry: &ChatEntry) -> String {
    let time = format_clock_time(entry.timestamp.value());
    if entry.is_system {
        format!("[{time}] * {}", entry.message)
    } else {
        format!("[{time}] <{}> {}", entry.nickname, entry.message)
    }
}

pub fn playback(action: &VideoAction, command: Option<PlaybackCommand>) -> String {
    match command {
        Some(PlaybackCommand::Play { position }) => format!("▶ play at {position:.1}s"),
        Some(PlaybackCommand::Pause { position }) => format!("⏸ pause at {position:.1}s"),
        Some(PlaybackCommand::Seek { position }) => format!("⇥ seek to {position:.1}s"),
        None => format!("playback action {}", action.payload()),
    }
}

pub fn navigation(intent: &NavigationIntent) -> String {
    match intent {
        NavigationIntent::Navigate(location) => format!("→ now watching {location}"),
        NavigationIntent::Replace(location) => format!("→ location is {location}"),
    }
}

/// Lines for an effect, other than applied playback actions which need the
/// player state and are rendered by the runner.
pub fn effect(effect: &SessionEffect) -> Option<String> {
    match effect {
        SessionEffect::ApplyVideoAction(_) => None,
        SessionEffect::Navigate(intent) => Some(navigation(intent)),
        SessionEffect::ChatAppended(entry) => Some(chat_entry(entry)),
        SessionEffect::RoomEntered { room_code, is_host } => Some(if *is_host {
            format!("Room {room_code} is open, you are the host")
        } else {
            format!("Joined room {room_code}")
        }),
        SessionEffect::HostChanged { is_host: true } => Some("You are now the host".to_string()),
        SessionEffect::HostChanged { is_host: false } => None,
        SessionEffect::ErrorReported(message) => Some(format!("! {message}")),
        SessionEffect::SessionReset => Some("Disconnected from the room".to_string()),
    }
}

pub fn members(session: &WatchPartySession) -> Vec<String> {
    if session.room_code().is_none() {
        return vec!["Not in a room".to_string()];
    }
    let own_id = session.connection_id();
    session
        .members()
        .iter()
        .map(|member| {
            if Some(&member.connection_id) == own_id {
                format!("  {} (you)", member.nickname)
            } else {
                format!("  {}", member.nickname)
            }
        })
        .collect()
}

pub fn status(session: &WatchPartySession) -> Vec<String> {
    let mut lines = vec![
        format!("phase:      {:?}", session.phase()),
        format!("connection: {:?}", session.connection_status()),
    ];
    if let Some(code) = session.room_code() {
        let role = if session.is_host() { "host" } else { "member" };
        lines.push(format!("room:       {code} ({role})"));
        lines.push(format!("members:    {}", session.members().len()));
        lines.push(format!("chat:       {} entries", session.chat().len()));
    }
    if let Some(location) = session.location() {
        lines.push(format!("location:   {location}"));
    }
    if let Some(error) = session.last_error() {
        lines.push(format!("last error: {error}"));
    }
    lines
}
