//! REST backend contracts.
//!
//! The wire format is the backend's concern; the core consumes these
//! traits and treats every failure as recoverable.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use causerie_shared::models::{Message, Room, User};
use causerie_shared::types::{MessageId, RoomId, UserId};

use crate::auth::BearerToken;

/// Failure modes surfaced by the REST backend.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never reached the backend or the connection dropped.
    #[error("Network error: {0}")]
    Network(String),

    /// The credential was missing, expired, or rejected.
    #[error("Authorization rejected")]
    Unauthorized,

    /// The backend refused the request for any other reason.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// A file carried along with an outgoing message.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub name: String,
    pub mime: String,
    pub data: Bytes,
}

/// Everything the backend needs to persist a new message.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub room_id: RoomId,
    pub text: String,
    pub reply_to: Option<MessageId>,
    pub attachments: Vec<FilePayload>,
}

/// Message persistence and history endpoints.
#[async_trait]
pub trait MessageApi: Send + Sync {
    /// Fetch the full ordered history of a room, oldest first.
    async fn fetch_history(
        &self,
        token: Option<&BearerToken>,
        room: RoomId,
    ) -> Result<Vec<Message>, ApiError>;

    /// Persist a new message and return it with resolved attachment
    /// references.
    async fn send_message(
        &self,
        token: Option<&BearerToken>,
        outgoing: OutgoingMessage,
    ) -> Result<Message, ApiError>;
}

/// Directory endpoints loaded when the client starts.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// The user the credential belongs to.
    async fn fetch_me(&self, token: Option<&BearerToken>) -> Result<User, ApiError>;

    /// Every room the user participates in.
    async fn fetch_rooms(&self, token: Option<&BearerToken>) -> Result<Vec<Room>, ApiError>;

    /// The full user directory.
    async fn fetch_users(&self, token: Option<&BearerToken>) -> Result<Vec<User>, ApiError>;

    /// Create (or return) a direct room shared with the given user.
    async fn create_direct_room(
        &self,
        token: Option<&BearerToken>,
        user: UserId,
    ) -> Result<Room, ApiError>;
}
