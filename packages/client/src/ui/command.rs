//! REPL の入力行をコマンドに変換する

use thiserror::Error;

/// One line typed by the user
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Create { nickname: String },
    Join { room_code: String, nickname: String },
    Leave,
    /// Play from `position`, or from the local player position when omitted
    Play { position: Option<f64> },
    Pause { position: Option<f64> },
    Seek { position: f64 },
    Episode { anime_id: String, episode_id: String },
    Goto { path: String },
    Members,
    Status,
    Help,
    Quit,
    Chat(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid position '{0}': expected seconds")]
    InvalidPosition(String),

    #[error("Unknown command '/{0}', type /help for the list")]
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  /create <nickname>             create a room and become its host
  /join <room> <nickname>        join an existing room
  /leave                         leave the room and disconnect
  /play [seconds]                play (host only)
  /pause [seconds]               pause (host only)
  /seek <seconds>                seek (host only)
  /episode <anime> <episode>     switch the room to another episode (host only)
  /goto <path>                   set the location being viewed, e.g. /watch/frieren/3
  /members                       list room members
  /status                        show session state
  /help                          show this help
  /quit                          exit
Anything else is sent as a chat message. Start a line with // to send a literal '/'.";

/// Parse one input line.
///
/// Returns `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<UserCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if let Some(escaped) = line.strip_prefix("//") {
        return Ok(Some(UserCommand::Chat(format!("/{escaped}"))));
    }
    let Some(body) = line.strip_prefix('/') else {
        return Ok(Some(UserCommand::Chat(line.to_string())));
    };

    let mut words = body.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let command = match (name, args.as_slice()) {
        ("create", [nickname]) => UserCommand::Create {
            nickname: nickname.to_string(),
        },
        ("create", _) => return Err(CommandError::Usage("/create <nickname>")),
        ("join", [room_code, nickname]) => UserCommand::Join {
            room_code: room_code.to_string(),
            nickname: nickname.to_string(),
        },
        ("join", _) => return Err(CommandError::Usage("/join <room> <nickname>")),
        ("leave", []) => UserCommand::Leave,
        ("play", [] | [_]) => UserCommand::Play {
            position: optional_position(&args)?,
        },
        ("pause", [] | [_]) => UserCommand::Pause {
            position: optional_position(&args)?,
        },
        ("play", _) => return Err(CommandError::Usage("/play [seconds]")),
        ("pause", _) => return Err(CommandError::Usage("/pause [seconds]")),
        ("seek", [position]) => UserCommand::Seek {
            position: parse_position(position)?,
        },
        ("seek", _) => return Err(CommandError::Usage("/seek <seconds>")),
        ("episode", [anime_id, episode_id]) => UserCommand::Episode {
            anime_id: anime_id.to_string(),
            episode_id: episode_id.to_string(),
        },
        ("episode", _) => return Err(CommandError::Usage("/episode <anime> <episode>")),
        ("goto", [path]) => UserCommand::Goto {
            path: path.to_string(),
        },
        ("goto", _) => return Err(CommandError::Usage("/goto <path>")),
        ("members", []) => UserCommand::Members,
        ("status", []) => UserCommand::Status,
        ("help", _) => UserCommand::Help,
        ("quit" | "exit", []) => UserCommand::Quit,
        ("leave" | "members" | "status" | "quit" | "exit", _) => {
            return Err(CommandError::Usage("command takes no arguments"));
        }
        (other, _) => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn optional_position(args: &[&str]) -> Result<Option<f64>, CommandError> {
    args.first().map(|raw| parse_position(raw)).transpose()
}

fn parse_position(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .ok()
        .filter(|position| position.is_finite() && *position >= 0.0)
        .ok_or_else(|| CommandError::InvalidPosition(raw.to_string()))
}
