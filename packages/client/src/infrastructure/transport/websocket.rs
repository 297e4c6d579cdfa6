//! WebSocket connection to the room-coordination service.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::{
    domain::{
        ClientEvent, Connection, ConnectionError, ConnectionId, ConnectionStatus, Connector,
        EventTransport, TransportEvent,
    },
    infrastructure::dto::websocket::{decode, encode},
};

/// Query parameter carrying the client's connection id
pub const CONNECTION_ID_PARAM: &str = "connection_id";

/// Opens one WebSocket connection per session
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    endpoint: Url,
}

impl WebSocketConnector {
    /// Create a connector for a `ws://` or `wss://` endpoint.
    ///
    /// # Errors
    ///
    /// `InvalidEndpoint` when the URL does not parse or has another scheme.
    pub fn new(endpoint: &str) -> Result<Self, ConnectionError> {
        let endpoint =
            Url::parse(endpoint).map_err(|_| ConnectionError::InvalidEndpoint(endpoint.into()))?;
        if !matches!(endpoint.scheme(), "ws" | "wss") {
            return Err(ConnectionError::InvalidEndpoint(endpoint.to_string()));
        }
        Ok(Self { endpoint })
    }

    /// URL used to connect as `connection_id`
    pub fn connection_url(&self, connection_id: &ConnectionId) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(CONNECTION_ID_PARAM, connection_id.as_str());
        url
    }
}

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self, connection_id: &ConnectionId) -> Result<Connection, ConnectionError> {
        let url = self.connection_url(connection_id);
        let (socket, _response) =
            connect_async(url.as_str())
                .await
                .map_err(|e| ConnectionError::ConnectFailed {
                    endpoint: self.endpoint.to_string(),
                    reason: e.to_string(),
                })?;
        tracing::info!("Connected to {} as '{}'", self.endpoint, connection_id);

        let (mut sender, mut receiver) = socket.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(true));

        // Spawn a task to forward queued frames to the socket
        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let is_close = matches!(msg, Message::Close(_));
                if let Err(e) = sender.send(msg).await {
                    tracing::warn!("Failed to write frame: {}", e);
                    break;
                }
                if is_close {
                    break;
                }
            }
            let _ = sender.close().await;
        });

        // Spawn a task to decode inbound frames until the socket goes away
        let reader_connected = connected.clone();
        tokio::spawn(async move {
            while let Some(msg) = receiver.next().await {
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::warn!("WebSocket error: {}", e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => match decode(text.as_str()) {
                        Ok(event) => {
                            if events_tx.send(TransportEvent::Event(event)).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Dropping undecodable frame: {}", e);
                        }
                    },
                    Message::Close(frame) => {
                        tracing::info!("Server closed the connection: {:?}", frame);
                        break;
                    }
                    Message::Ping(_) => {
                        tracing::debug!("Received ping");
                        // Pong is answered by tungstenite
                    }
                    _ => {}
                }
            }
            reader_connected.store(false, Ordering::SeqCst);
            let _ = events_tx.send(TransportEvent::Disconnected);
        });

        Ok(Connection {
            transport: Arc::new(WebSocketTransport {
                outbound: outbound_tx,
                connected,
            }),
            events: events_rx,
        })
    }
}

/// Outbound half of a WebSocket connection.
///
/// Dropping it closes the socket once queued frames are flushed.
pub struct WebSocketTransport {
    outbound: mpsc::UnboundedSender<Message>,
    connected: Arc<AtomicBool>,
}

impl EventTransport for WebSocketTransport {
    fn send(&self, event: ClientEvent) -> Result<(), ConnectionError> {
        if self.status() == ConnectionStatus::Disconnected {
            return Err(ConnectionError::Closed);
        }
        let name = event.name();
        let text = encode(event).map_err(|e| ConnectionError::Encode(e.to_string()))?;
        self.outbound
            .send(Message::Text(text.into()))
            .map_err(|_| ConnectionError::Closed)?;
        tracing::debug!("Queued '{}'", name);
        Ok(())
    }

    fn close(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            tracing::info!("Closing connection");
            let _ = self.outbound.send(Message::Close(None));
        }
    }

    fn status(&self) -> ConnectionStatus {
        if self.connected.load(Ordering::SeqCst) && !self.outbound.is_closed() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }
}
