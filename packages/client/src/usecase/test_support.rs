//! Test doubles shared by the usecase tests.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::time::Instant;

use crate::domain::{
    ClientEvent, Clock, ConnectionId, ConnectionStatus, Member, Nickname,
    transport::MockEventTransport,
};

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

/// Events captured by a mock transport
pub type SentEvents = Arc<Mutex<Vec<ClientEvent>>>;

/// Mock transport that reports `Connected`, records every send and
/// expects `close` at most once.
pub fn recording_transport() -> (MockEventTransport, SentEvents) {
    let sent: SentEvents = Arc::new(Mutex::new(Vec::new()));
    let mut transport = MockEventTransport::new();
    transport
        .expect_status()
        .return_const(ConnectionStatus::Connected);
    let sink = sent.clone();
    transport.expect_send().returning(move |event| {
        sink.lock().unwrap().push(event);
        Ok(())
    });
    transport.expect_close().times(0..=1).return_const(());
    (transport, sent)
}

pub fn member(id: &str, nickname: &str) -> Member {
    Member::new(
        ConnectionId::new(id).unwrap(),
        Nickname::new(nickname).unwrap(),
    )
}
