//! Viewing location and navigation intents.
//!
//! The session never navigates by itself; it returns a [`NavigationIntent`]
//! and the host environment (browser shell, CLI, test harness) acts on it.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use url::Url;

use super::{
    error::ValueObjectError,
    value_object::{AnimeId, EpisodeId, RoomCode},
};

const WATCH_SEGMENT: &str = "watch";
const ROOM_PARAM: &str = "room";

/// Bytes escaped inside one path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Location of the episode currently being viewed.
///
/// Rendered as `/watch/{animeId}/{episodeId}` with an optional `?room={code}`.
/// Identifiers are percent-encoded per segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchLocation {
    pub anime_id: AnimeId,
    pub episode_id: EpisodeId,
    pub room_code: Option<RoomCode>,
}

impl WatchLocation {
    pub fn new(anime_id: AnimeId, episode_id: EpisodeId, room_code: Option<RoomCode>) -> Self {
        Self {
            anime_id,
            episode_id,
            room_code,
        }
    }

    /// The same location with the room parameter removed
    pub fn without_room(&self) -> Self {
        Self {
            room_code: None,
            ..self.clone()
        }
    }

    /// Render as a path with optional query string.
    pub fn to_path(&self) -> String {
        let mut path = format!(
            "/{WATCH_SEGMENT}/{}/{}",
            utf8_percent_encode(self.anime_id.as_str(), SEGMENT),
            utf8_percent_encode(self.episode_id.as_str(), SEGMENT)
        );
        if let Some(code) = &self.room_code {
            let query: String = url::form_urlencoded::Serializer::new(String::new())
                .append_pair(ROOM_PARAM, code.as_str())
                .finish();
            path.push('?');
            path.push_str(&query);
        }
        path
    }

    /// Parse a path (`/watch/a/e?room=c`) or an absolute URL.
    ///
    /// Unknown query parameters are ignored; an empty `room` counts as absent.
    pub fn parse(input: &str) -> Result<Self, ValueObjectError> {
        let invalid = || ValueObjectError::InvalidWatchLocation(input.to_string());

        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost/")
                .and_then(|base| base.join(input))
                .map_err(|_| invalid())?,
            Err(_) => return Err(invalid()),
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        let [watch, anime, episode] = segments.as_slice() else {
            return Err(invalid());
        };
        if *watch != WATCH_SEGMENT {
            return Err(invalid());
        }

        let room_code = url
            .query_pairs()
            .find(|(key, _)| key == ROOM_PARAM)
            .and_then(|(_, value)| RoomCode::from_remote(value.into_owned()).ok());

        let decode = |segment: &str| {
            percent_decode_str(segment)
                .decode_utf8()
                .map(|decoded| decoded.into_owned())
                .map_err(|_| invalid())
        };

        Ok(Self {
            anime_id: AnimeId::new(decode(*anime)?)?,
            episode_id: EpisodeId::new(decode(*episode)?)?,
            room_code,
        })
    }
}

impl fmt::Display for WatchLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// What the host environment should do with its visible location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Load a new location (new history entry, player reload)
    Navigate(WatchLocation),
    /// Rewrite the visible location in place without reloading
    Replace(WatchLocation),
}

impl NavigationIntent {
    pub fn location(&self) -> &WatchLocation {
        match self {
            Self::Navigate(location) | Self::Replace(location) => location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(anime: &str, episode: &str, room: Option<&str>) -> WatchLocation {
        WatchLocation::new(
            AnimeId::new(anime).unwrap(),
            EpisodeId::new(episode).unwrap(),
            room.map(|r| RoomCode::new(r).unwrap()),
        )
    }

    #[test]
    fn test_to_path_with_and_without_room() {
        // テスト項目: ルームコードの有無に応じてパスが組み立てられる
        assert_eq!(
            location("X", "5", Some("ABC")).to_path(),
            "/watch/X/5?room=ABC"
        );
        assert_eq!(location("X", "5", None).to_path(), "/watch/X/5");
    }

    #[test]
    fn test_parse_path() {
        // テスト項目: パスから WatchLocation を復元できる
        // when (操作):
        let parsed = WatchLocation::parse("/watch/one-piece/1071?room=QW3RTY").unwrap();

        // then (期待する結果):
        assert_eq!(parsed, location("one-piece", "1071", Some("QW3RTY")));
    }

    #[test]
    fn test_parse_absolute_url_ignores_other_params() {
        // テスト項目: 絶対 URL も解析でき、関係ないクエリは無視される
        let parsed =
            WatchLocation::parse("https://example.com/watch/X/5?t=30&room=ABC").unwrap();
        assert_eq!(parsed, location("X", "5", Some("ABC")));
    }

    #[test]
    fn test_parse_empty_room_is_absent() {
        // テスト項目: 空の room パラメータはルームなしとして扱う
        let parsed = WatchLocation::parse("/watch/X/5?room=").unwrap();
        assert_eq!(parsed.room_code, None);
    }

    #[test]
    fn test_parse_rejects_other_paths() {
        // テスト項目: /watch/{anime}/{episode} 以外のパスは拒否される
        assert!(WatchLocation::parse("/browse").is_err());
        assert!(WatchLocation::parse("/watch/X").is_err());
        assert!(WatchLocation::parse("/anime/X/5").is_err());
    }

    #[test]
    fn test_without_room_strips_only_room() {
        // テスト項目: without_room はルームコードだけを取り除く
        let tagged = location("X", "5", Some("ABC"));
        assert_eq!(tagged.without_room(), location("X", "5", None));
    }

    #[test]
    fn test_round_trip_through_path() {
        // テスト項目: to_path と parse は互いに逆変換になる
        let original = location("X", "12", Some("ROOM1"));
        assert_eq!(WatchLocation::parse(&original.to_path()).unwrap(), original);
    }

    #[test]
    fn test_round_trip_escapes_reserved_characters() {
        // テスト項目: 空白や区切り文字を含む ID もパス経由で元に戻る
        // given (前提条件):
        let original = location("one piece", "ep/1?", Some("ROOM1"));

        // when (操作):
        let path = original.to_path();

        // then (期待する結果):
        assert_eq!(path, "/watch/one%20piece/ep%2F1%3F?room=ROOM1");
        assert_eq!(WatchLocation::parse(&path).unwrap(), original);
    }

    #[test]
    fn test_parse_decodes_encoded_segments() {
        // テスト項目: エンコード済みのセグメントはデコードして扱う
        let parsed = WatchLocation::parse("/watch/one%20piece/5").unwrap();
        assert_eq!(parsed, location("one piece", "5", None));
    }
}
