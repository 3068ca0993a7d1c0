//! An in-process backend implementing the REST contracts.
//!
//! Used by tests and local development in place of a real server: it
//! authorizes bearer tokens against a registry, keeps per-room message
//! logs, and assigns identifiers, timestamps, and attachment URLs the way
//! the real backend would. An `offline` switch turns every call into a
//! network failure for exercising recovery paths.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use causerie_shared::models::{Attachment, Message, Room, User};
use causerie_shared::types::{MediaKind, MessageId, RoomId, UserId};

use crate::api::{ApiError, DirectoryApi, MessageApi, OutgoingMessage};
use crate::auth::BearerToken;

#[derive(Default)]
struct ServerState {
    tokens: HashMap<String, User>,
    users: Vec<User>,
    rooms: Vec<Room>,
    messages: HashMap<RoomId, Vec<Message>>,
    offline: bool,
}

/// In-memory stand-in for the REST backend.
#[derive(Default)]
pub struct InMemoryServer {
    state: Mutex<ServerState>,
}

impl InMemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and the token that authenticates as them.
    pub fn register_user(&self, token: impl Into<String>, user: User) {
        let mut state = self.lock();
        state.tokens.insert(token.into(), user.clone());
        state.users.push(user);
    }

    /// Add a room to the directory.
    pub fn add_room(&self, room: Room) {
        self.lock().rooms.push(room);
    }

    /// Seed a room's history with pre-existing messages.
    pub fn seed_history(&self, room: RoomId, messages: Vec<Message>) {
        self.lock().messages.entry(room).or_default().extend(messages);
    }

    /// Make every call fail with a network error (or restore service).
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn authorize(state: &ServerState, token: Option<&BearerToken>) -> Result<User, ApiError> {
        if state.offline {
            return Err(ApiError::Network("server unreachable".to_string()));
        }
        let token = token.ok_or(ApiError::Unauthorized)?;
        state
            .tokens
            .get(token.as_str())
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

#[async_trait]
impl MessageApi for InMemoryServer {
    async fn fetch_history(
        &self,
        token: Option<&BearerToken>,
        room: RoomId,
    ) -> Result<Vec<Message>, ApiError> {
        let state = self.lock();
        Self::authorize(&state, token)?;
        Ok(state.messages.get(&room).cloned().unwrap_or_default())
    }

    async fn send_message(
        &self,
        token: Option<&BearerToken>,
        outgoing: OutgoingMessage,
    ) -> Result<Message, ApiError> {
        let mut state = self.lock();
        let sender = Self::authorize(&state, token)?;

        let id = MessageId::new();
        let attachments = outgoing
            .attachments
            .iter()
            .map(|file| {
                let kind = MediaKind::from_mime(&file.mime)
                    .ok_or_else(|| ApiError::Rejected(format!("Unsupported media type: {}", file.mime)))?;
                Ok(Attachment {
                    file_name: file.name.clone(),
                    kind,
                    size: file.data.len() as u64,
                    url: format!("/uploads/{}/{}", id, file.name),
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        let message = Message {
            id,
            room_id: outgoing.room_id,
            sender,
            text: outgoing.text,
            attachments,
            reply_to: outgoing.reply_to,
            created_at: Utc::now(),
        };

        state
            .messages
            .entry(outgoing.room_id)
            .or_default()
            .push(message.clone());

        Ok(message)
    }
}

#[async_trait]
impl DirectoryApi for InMemoryServer {
    async fn fetch_me(&self, token: Option<&BearerToken>) -> Result<User, ApiError> {
        let state = self.lock();
        Self::authorize(&state, token)
    }

    async fn fetch_rooms(&self, token: Option<&BearerToken>) -> Result<Vec<Room>, ApiError> {
        let state = self.lock();
        let me = Self::authorize(&state, token)?;
        Ok(state
            .rooms
            .iter()
            .filter(|room| room.members.iter().any(|m| m.id == me.id))
            .cloned()
            .collect())
    }

    async fn fetch_users(&self, token: Option<&BearerToken>) -> Result<Vec<User>, ApiError> {
        let state = self.lock();
        Self::authorize(&state, token)?;
        Ok(state.users.clone())
    }

    async fn create_direct_room(
        &self,
        token: Option<&BearerToken>,
        user: UserId,
    ) -> Result<Room, ApiError> {
        let mut state = self.lock();
        let me = Self::authorize(&state, token)?;

        let existing = state
            .rooms
            .iter()
            .find(|room| {
                !room.is_group
                    && room.members.iter().any(|m| m.id == me.id)
                    && room.members.iter().any(|m| m.id == user)
            })
            .cloned();
        if let Some(room) = existing {
            return Ok(room);
        }

        let other = state
            .users
            .iter()
            .find(|u| u.id == user)
            .cloned()
            .ok_or_else(|| ApiError::Rejected("Unknown user".to_string()))?;

        let room = Room {
            id: RoomId::new(),
            name: other.display_name.clone(),
            members: vec![me, other],
            is_group: false,
        };
        state.rooms.push(room.clone());
        Ok(room)
    }
}
