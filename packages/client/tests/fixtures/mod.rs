//! In-process stand-in for the room-coordination service.
//!
//! Hosts a single room with code [`ROOM_CODE`] on an `axum` WebSocket route
//! bound to an ephemeral port. Frames are built with `serde_json::json!` so
//! the tests pin the wire format independently of the client's DTOs.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
};

use axum::{
    Router,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::{
    net::TcpListener,
    sync::{Mutex, mpsc},
    task::JoinHandle,
};

pub const ROOM_CODE: &str = "ROOM1";

#[derive(Debug, Deserialize)]
struct ConnectQuery {
    connection_id: String,
}

struct FakeRoom {
    host_id: String,
    /// (connection id, nickname) in join order
    members: Vec<(String, String)>,
    chat: Vec<Value>,
    episode: Option<(Value, Value)>,
}

impl FakeRoom {
    fn members_json(&self) -> Value {
        Value::Array(
            self.members
                .iter()
                .map(|(id, nickname)| json!({ "id": id, "nickname": nickname }))
                .collect(),
        )
    }

    fn nickname_of(&self, id: &str) -> Option<String> {
        self.members
            .iter()
            .find(|(member_id, _)| member_id == id)
            .map(|(_, nickname)| nickname.clone())
    }
}

#[derive(Default)]
struct ServiceState {
    clients: HashMap<String, mpsc::UnboundedSender<String>>,
    room: Option<FakeRoom>,
    next_message_id: u64,
}

fn frame(event: &str, data: Value) -> String {
    json!({ "event": event, "data": data }).to_string()
}

fn send_to(clients: &HashMap<String, mpsc::UnboundedSender<String>>, id: &str, text: &str) {
    if let Some(sender) = clients.get(id) {
        let _ = sender.send(text.to_string());
    }
}

impl ServiceState {
    fn broadcast(&self, text: &str, except: Option<&str>) {
        let Some(room) = &self.room else { return };
        for (id, _) in &room.members {
            if Some(id.as_str()) != except {
                send_to(&self.clients, id, text);
            }
        }
    }

    fn handle(&mut self, from: &str, incoming: Value) {
        let data = &incoming["data"];
        match incoming["event"].as_str().unwrap_or_default() {
            "createRoom" => {
                let nickname = data["nickname"].as_str().unwrap_or_default().to_string();
                let room = FakeRoom {
                    host_id: from.to_string(),
                    members: vec![(from.to_string(), nickname)],
                    chat: Vec::new(),
                    episode: None,
                };
                let reply = frame(
                    "roomCreated",
                    json!({ "roomCode": ROOM_CODE, "isHost": true, "members": room.members_json() }),
                );
                self.room = Some(room);
                send_to(&self.clients, from, &reply);
            }
            "joinRoom" => {
                let nickname = data["nickname"].as_str().unwrap_or_default().to_string();
                let room = match &mut self.room {
                    Some(room) if data["roomCode"] == ROOM_CODE => room,
                    _ => {
                        let reply = frame("error", json!({ "message": "Room not found" }));
                        send_to(&self.clients, from, &reply);
                        return;
                    }
                };
                room.members.push((from.to_string(), nickname.clone()));

                let mut joined = json!({
                    "roomCode": ROOM_CODE,
                    "isHost": false,
                    "members": room.members_json(),
                    "chat": room.chat,
                });
                if let Some((episode_id, anime_id)) = &room.episode {
                    joined["currentEpisode"] = episode_id.clone();
                    joined["animeId"] = anime_id.clone();
                }
                let notice = frame(
                    "userJoined",
                    json!({ "members": room.members_json(), "nickname": nickname }),
                );
                send_to(&self.clients, from, &frame("roomJoined", joined));
                self.broadcast(&notice, Some(from));
            }
            "chatMessage" => {
                let Some(nickname) = self.room.as_ref().and_then(|room| room.nickname_of(from))
                else {
                    return;
                };
                self.next_message_id += 1;
                let id = self.next_message_id;
                let entry = json!({
                    "id": format!("msg-{id}"),
                    "nickname": nickname,
                    "message": data["message"],
                    "timestamp": chrono::Utc::now().timestamp_millis(),
                    "isSystem": false,
                });
                if let Some(room) = &mut self.room {
                    room.chat.push(entry.clone());
                }
                self.broadcast(&frame("chatMessage", entry), None);
            }
            "videoAction" => {
                if self.room.as_ref().is_some_and(|room| room.host_id == from) {
                    let relay = frame("videoAction", json!({ "action": data["action"] }));
                    self.broadcast(&relay, Some(from));
                }
            }
            "changeEpisode" => {
                let Some(room) = self.room.as_mut().filter(|room| room.host_id == from) else {
                    return;
                };
                room.episode = Some((data["episodeId"].clone(), data["animeId"].clone()));
                let relay = frame("changeEpisode", data.clone());
                self.broadcast(&relay, Some(from));
            }
            other => tracing::warn!("Fake service ignoring '{}'", other),
        }
    }

    fn remove(&mut self, id: &str) {
        self.clients.remove(id);
        let Some(room) = &mut self.room else { return };
        let Some(index) = room.members.iter().position(|(member_id, _)| member_id == id) else {
            return;
        };
        let (_, nickname) = room.members.remove(index);
        if room.members.is_empty() {
            self.room = None;
            return;
        }

        let notice = if room.host_id == id {
            let (new_host_id, new_host_nickname) = room.members[0].clone();
            room.host_id = new_host_id.clone();
            frame(
                "newHost",
                json!({
                    "members": room.members_json(),
                    "newHostId": new_host_id,
                    "newHostNickname": new_host_nickname,
                }),
            )
        } else {
            frame(
                "userLeft",
                json!({ "members": room.members_json(), "nickname": nickname }),
            )
        };
        self.broadcast(&notice, None);
    }
}

type SharedState = Arc<Mutex<ServiceState>>;

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.connection_id))
}

async fn handle_socket(socket: WebSocket, state: SharedState, connection_id: String) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    state.lock().await.clients.insert(connection_id.clone(), tx);

    // Forward queued frames; a dropped sender closes the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sender.send(Message::Text(text.into())).await.is_err() {
                return;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    });

    let recv_state = state.clone();
    let recv_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<Value>(text.as_str()) {
                    Ok(incoming) => recv_state.lock().await.handle(&recv_id, incoming),
                    Err(e) => tracing::warn!("Fake service got invalid JSON: {}", e),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.lock().await.remove(&connection_id);
}

pub struct FakeRoomService {
    addr: SocketAddr,
    state: SharedState,
    handle: JoinHandle<()>,
}

impl FakeRoomService {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake service");
        let addr = listener.local_addr().expect("Failed to read local address");
        let state = SharedState::default();

        let app = Router::new()
            .route("/ws", get(websocket_handler))
            .with_state(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake service stopped");
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Close every client socket from the service side
    pub async fn drop_connections(&self) {
        self.state.lock().await.clients.clear();
    }
}

impl Drop for FakeRoomService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
