//! Domain model structs for the chat core.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to a presentation shell or carried on the wire protocol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MediaKind, MessageId, RoomId, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A user identity. Referenced by messages and rooms, never owned by them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier assigned by the backend.
    pub id: UserId,
    /// Human-readable display name, matched against by `@mentions`.
    pub display_name: String,
    /// Optional avatar reference.
    pub avatar_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A conversation scope: an ordered message log plus a member set.
///
/// Immutable for the session; selecting a different room triggers a full
/// re-subscription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,
    /// Display name (for direct rooms, typically the other member's name).
    pub name: String,
    /// Ordered member set.
    pub members: Vec<User>,
    /// Group rooms hold any number of members; direct rooms exactly two.
    pub is_group: bool,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message.
///
/// Identifiers are globally unique and immutable once created; a message
/// belongs to exactly one room for its lifetime and is never edited or
/// deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier, assigned by the backend on persist.
    pub id: MessageId,
    /// The room this message belongs to.
    pub room_id: RoomId,
    /// The sending user.
    pub sender: User,
    /// Body text.
    pub text: String,
    /// Ordered list of persisted attachments.
    pub attachments: Vec<Attachment>,
    /// Message this one replies to, if any. Resolved against the loaded
    /// log at render time; the target may not be loaded.
    pub reply_to: Option<MessageId>,
    /// When the message was persisted.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// A persisted file reference attached to a message.
///
/// Exists only after a send completes; before that, files live as staged
/// candidates on the client with no server identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Original file name.
    pub file_name: String,
    /// Media category (image or document).
    pub kind: MediaKind,
    /// File size in bytes.
    pub size: u64,
    /// URL assigned by the backend.
    pub url: String,
}
