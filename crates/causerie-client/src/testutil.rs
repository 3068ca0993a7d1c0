//! Shared fixtures for the crate's tests.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;

use causerie_net::{
    BearerToken, CredentialStore, InMemoryServer, LocalHub, TransportEvent, TransportLink,
};
use causerie_shared::models::{Message, Room, User};
use causerie_shared::types::{MessageId, RoomId, UserId};

use crate::state::{SessionConfig, SessionState, SharedSession};

pub(crate) fn user(name: &str) -> User {
    User {
        id: UserId::new(),
        display_name: name.to_string(),
        avatar_url: None,
    }
}

pub(crate) fn room_with(members: Vec<User>) -> Room {
    Room {
        id: RoomId::new(),
        name: "room".to_string(),
        members,
        is_group: true,
    }
}

pub(crate) fn message_in(room: RoomId, sender: &User, text: &str) -> Message {
    Message {
        id: MessageId::new(),
        room_id: room,
        sender: sender.clone(),
        text: text.to_string(),
        attachments: Vec::new(),
        reply_to: None,
        created_at: Utc::now(),
    }
}

/// One client session wired to an in-memory server and a local hub.
pub(crate) struct Harness {
    pub server: Arc<InMemoryServer>,
    pub hub: LocalHub,
    pub session: SharedSession,
    /// The session link's delivery stream; tests hand it to the bridge.
    pub transport_events: Option<mpsc::Receiver<TransportEvent>>,
}

pub(crate) async fn harness_for(me: &User, token: &str) -> Harness {
    let server = Arc::new(InMemoryServer::new());
    server.register_user(token, me.clone());

    let hub = LocalHub::spawn();
    let TransportLink { cmd_tx, events } = hub.attach().await.unwrap();

    let auth = Arc::new(CredentialStore::with_token(BearerToken::new(token)));
    let session = SessionState::new(
        SessionConfig::default(),
        auth,
        server.clone(),
        server.clone(),
        cmd_tx,
    )
    .into_shared();

    Harness {
        server,
        hub,
        session,
        transport_events: Some(events),
    }
}

/// Poll a condition until it holds or a two-second deadline passes.
pub(crate) async fn eventually(mut check: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !check() {
        if tokio::time::Instant::now() > deadline {
            panic!("condition not met in time");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
