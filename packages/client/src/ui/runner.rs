//! 対話型クライアントのイベントループ
//!
//! ユーザー入力（別スレッドの rustyline）とサーバーからのイベントを
//! `tokio::select!` でひとつのループに集約し、セッションへ順番に渡します。

use std::sync::Arc;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    domain::{
        ConnectionIdFactory, Connector, NavigationIntent, Nickname, PlaybackCommand, RoomCode,
        TransportEvent, VideoAction, WatchLocation,
    },
    infrastructure::{SystemClock, WebSocketConnector},
    usecase::{SessionEffect, WatchPartySession},
};

use super::{
    command::{self, HELP, UserCommand},
    config::ClientConfig,
    error::ClientError,
    player::LocalPlayer,
    render, signal,
};

const PROMPT: &str = "> ";

/// Session plus the terminal-side state around it
pub struct ClientApp<C> {
    connector: C,
    session: WatchPartySession,
    /// Inbound events of the current connection
    events: Option<mpsc::UnboundedReceiver<TransportEvent>>,
    player: LocalPlayer,
}

impl<C: Connector> ClientApp<C> {
    pub fn new(connector: C, session: WatchPartySession) -> Self {
        Self {
            connector,
            session,
            events: None,
            player: LocalPlayer::default(),
        }
    }

    pub fn session(&self) -> &WatchPartySession {
        &self.session
    }

    pub fn player(&self) -> &LocalPlayer {
        &self.player
    }

    /// Run one user command, returning the lines to print.
    ///
    /// Room commands open a connection first when there is none.
    pub async fn handle_command(&mut self, command: UserCommand) -> Result<Vec<String>, ClientError> {
        match command {
            UserCommand::Create { nickname } => {
                // Validate before dialing
                let checked = Nickname::new(nickname.as_str())?;
                self.ensure_connected().await?;
                self.session.create_room(&nickname)?;
                Ok(vec![format!("Creating a room as {checked}...")])
            }
            UserCommand::Join {
                room_code,
                nickname,
            } => {
                let checked = RoomCode::new(room_code.as_str())?;
                Nickname::new(nickname.as_str())?;
                self.ensure_connected().await?;
                self.session.join_room(&room_code, &nickname)?;
                Ok(vec![format!("Joining room {checked}...")])
            }
            UserCommand::Leave => {
                let effects = self.session.leave_room()?;
                self.events = None;
                Ok(self.apply_effects(effects))
            }
            UserCommand::Play { position } => {
                let position = position.unwrap_or(self.player.position);
                self.broadcast(PlaybackCommand::Play { position })
            }
            UserCommand::Pause { position } => {
                let position = position.unwrap_or(self.player.position);
                self.broadcast(PlaybackCommand::Pause { position })
            }
            UserCommand::Seek { position } => self.broadcast(PlaybackCommand::Seek { position }),
            UserCommand::Episode {
                anime_id,
                episode_id,
            } => {
                let intent = self
                    .session
                    .broadcast_episode_change(&episode_id, &anime_id)?;
                Ok(match intent {
                    Some(intent) => vec![render::navigation(&intent)],
                    None => vec!["Already watching that episode".to_string()],
                })
            }
            UserCommand::Goto { path } => {
                let mut location = WatchLocation::parse(&path)?;
                location.room_code = self.session.room_code().cloned();
                self.session.set_location(Some(location.clone()));
                Ok(vec![render::navigation(&NavigationIntent::Navigate(
                    location,
                ))])
            }
            UserCommand::Members => Ok(render::members(&self.session)),
            UserCommand::Status => {
                let mut lines = render::status(&self.session);
                lines.push(format!(
                    "player:     {} at {:.1}s",
                    if self.player.playing { "playing" } else { "paused" },
                    self.player.position
                ));
                Ok(lines)
            }
            UserCommand::Help => Ok(HELP.lines().map(str::to_string).collect()),
            UserCommand::Quit => Ok(Vec::new()),
            UserCommand::Chat(text) => {
                self.session.send_message(&text)?;
                Ok(Vec::new())
            }
        }
    }

    /// Feed one transport event through the session, returning the lines to print
    pub fn handle_transport_event(&mut self, event: TransportEvent) -> Vec<String> {
        if matches!(event, TransportEvent::Disconnected) {
            self.events = None;
        }
        let effects = self.session.handle_transport_event(event);
        self.apply_effects(effects)
    }

    /// Next inbound event; never resolves while there is no connection
    pub async fn next_transport_event(&mut self) -> TransportEvent {
        match self.events.as_mut() {
            Some(events) => events.recv().await.unwrap_or(TransportEvent::Disconnected),
            None => std::future::pending().await,
        }
    }

    /// Leave the room, if any, before exiting
    pub fn shutdown(&mut self) -> Vec<String> {
        if self.session.room_code().is_none() {
            return Vec::new();
        }
        match self.session.leave_room() {
            Ok(effects) => {
                self.events = None;
                self.apply_effects(effects)
            }
            Err(e) => {
                tracing::warn!("Failed to leave room on exit: {}", e);
                Vec::new()
            }
        }
    }

    async fn ensure_connected(&mut self) -> Result<(), ClientError> {
        if self.session.phase().is_connected() {
            return Ok(());
        }
        let connection_id = ConnectionIdFactory::generate();
        let connection = self.connector.connect(&connection_id).await?;
        self.session.attach(connection_id, connection.transport)?;
        self.events = Some(connection.events);
        Ok(())
    }

    /// The host plays the action locally, then relays it to the room
    fn broadcast(&mut self, command: PlaybackCommand) -> Result<Vec<String>, ClientError> {
        let action = VideoAction::from(command);
        self.session.broadcast_action(action.clone())?;
        let applied = self.player.apply(&action);
        Ok(vec![render::playback(&action, applied)])
    }

    fn apply_effects(&mut self, effects: Vec<SessionEffect>) -> Vec<String> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                SessionEffect::ApplyVideoAction(action) => {
                    let applied = self.player.apply(action);
                    Some(render::playback(action, applied))
                }
                other => render::effect(other),
            })
            .collect()
    }
}

/// Read lines on a dedicated thread; the channel closes on EOF or Ctrl+C.
fn spawn_line_reader() -> Result<mpsc::Receiver<String>, ClientError> {
    let mut editor = DefaultEditor::new()?;
    let (tx, rx) = mpsc::channel::<String>(16);

    std::thread::spawn(move || {
        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });

    Ok(rx)
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

fn print_outcome(outcome: Result<Vec<String>, ClientError>) {
    match outcome {
        Ok(lines) => print_lines(lines),
        Err(e) => eprintln!("! {e}"),
    }
}

/// Run the interactive client until the user quits
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let connector = WebSocketConnector::new(&config.url)?;
    let mut session = WatchPartySession::new(Arc::new(SystemClock), config.echo_window());
    session.set_location(config.initial_location()?);
    let mut app = ClientApp::new(connector, session);

    tracing::info!("Using room service at {}", config.url);
    println!("Type /help for commands.");

    if let Some(command) = config.startup_command() {
        print_outcome(app.handle_command(command).await);
    }

    let mut input = spawn_line_reader()?;
    let shutdown = signal::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = input.recv() => {
                let Some(line) = line else { break };
                match command::parse(&line) {
                    Ok(Some(UserCommand::Quit)) => break,
                    Ok(Some(command)) => print_outcome(app.handle_command(command).await),
                    Ok(None) => {}
                    Err(e) => eprintln!("! {e}"),
                }
            }
            event = app.next_transport_event() => {
                print_lines(app.handle_transport_event(event));
            }
            () = &mut shutdown => break,
        }
    }

    print_lines(app.shutdown());
    tracing::info!("Client exited");
    Ok(())
}
