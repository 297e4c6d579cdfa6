//! コマンドライン引数と環境変数による設定

use std::time::Duration;

use clap::Parser;

use crate::domain::WatchLocation;

use super::{command::UserCommand, error::ClientError};

pub const DEFAULT_URL: &str = "ws://127.0.0.1:3000/ws";

/// Watch party client
#[derive(Debug, Clone, Parser)]
#[command(name = "watchparty-client", version, about)]
pub struct ClientConfig {
    /// WebSocket endpoint of the room service
    #[arg(long, env = "WATCHPARTY_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Nickname used by --create / --room
    #[arg(short, long)]
    pub nickname: Option<String>,

    /// Join this room on startup
    #[arg(short, long, requires = "nickname", conflicts_with = "create")]
    pub room: Option<String>,

    /// Create a room on startup
    #[arg(long, requires = "nickname")]
    pub create: bool,

    /// Location being viewed at startup, e.g. /watch/frieren/1
    #[arg(long)]
    pub location: Option<String>,

    /// How long inbound playback actions are ignored after a broadcast
    #[arg(long, env = "WATCHPARTY_ECHO_WINDOW_MS", default_value_t = 100)]
    pub echo_window_ms: u64,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "WATCHPARTY_LOG", default_value = "info")]
    pub log_level: String,
}

impl ClientConfig {
    pub fn echo_window(&self) -> Duration {
        Duration::from_millis(self.echo_window_ms)
    }

    /// Room command to run before the prompt opens
    pub fn startup_command(&self) -> Option<UserCommand> {
        let nickname = self.nickname.clone()?;
        if self.create {
            return Some(UserCommand::Create { nickname });
        }
        self.room.clone().map(|room_code| UserCommand::Join {
            room_code,
            nickname,
        })
    }

    pub fn initial_location(&self) -> Result<Option<WatchLocation>, ClientError> {
        self.location
            .as_deref()
            .map(WatchLocation::parse)
            .transpose()
            .map_err(ClientError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしの場合は既定値になる
        let config = ClientConfig::try_parse_from(["watchparty-client"]).unwrap();
        assert_eq!(config.echo_window(), Duration::from_millis(config.echo_window_ms));
        assert!(!config.create);
        assert_eq!(config.startup_command(), None);
        assert_eq!(config.initial_location().unwrap(), None);
    }

    #[test]
    fn test_join_on_startup() {
        // テスト項目: --room と --nickname で起動時に参加する
        let config =
            ClientConfig::try_parse_from(["watchparty-client", "--room", "ABC", "-n", "bob"])
                .unwrap();
        assert_eq!(
            config.startup_command(),
            Some(UserCommand::Join {
                room_code: "ABC".to_string(),
                nickname: "bob".to_string()
            })
        );
    }

    #[test]
    fn test_create_on_startup() {
        // テスト項目: --create と --nickname で起動時にルームを作成する
        let config =
            ClientConfig::try_parse_from(["watchparty-client", "--create", "-n", "alice"]).unwrap();
        assert_eq!(
            config.startup_command(),
            Some(UserCommand::Create {
                nickname: "alice".to_string()
            })
        );
    }

    #[test]
    fn test_room_requires_nickname() {
        // テスト項目: ニックネームなしの --room は拒否される
        assert!(ClientConfig::try_parse_from(["watchparty-client", "--room", "ABC"]).is_err());
        assert!(
            ClientConfig::try_parse_from([
                "watchparty-client",
                "--create",
                "--room",
                "ABC",
                "-n",
                "a"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_initial_location_is_parsed() {
        // テスト項目: --location は視聴場所として解析される
        let config = ClientConfig::try_parse_from([
            "watchparty-client",
            "--location",
            "/watch/frieren/3",
        ])
        .unwrap();
        let location = config.initial_location().unwrap().unwrap();
        assert_eq!(location.to_path(), "/watch/frieren/3");

        let config =
            ClientConfig::try_parse_from(["watchparty-client", "--location", "/home"]).unwrap();
        assert!(config.initial_location().is_err());
    }
}
