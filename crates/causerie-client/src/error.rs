use thiserror::Error;

use causerie_net::ApiError;

/// Errors surfaced by client core operations.
///
/// Nothing here is fatal: validation failures leave the composition
/// intact for correction, API failures are retryable, and a superseded
/// completion simply means a newer room selection won.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No room is currently selected.
    #[error("No active room")]
    NoActiveRoom,

    /// No signed-in user is loaded yet.
    #[error("Not signed in")]
    NotAuthenticated,

    /// A send was attempted with neither text nor staged files.
    #[error("Message text or attachments required")]
    EmptyMessage,

    /// Adding the files would exceed the staging capacity.
    #[error("Cannot stage more than {max} files")]
    AttachmentCapacity { max: usize },

    /// The reply target is not in the active room's loaded messages.
    #[error("Reply target is not in the active room")]
    UnknownReplyTarget,

    /// The referenced user is not a member of the active room.
    #[error("User is not a member of the active room")]
    UnknownMember,

    /// The operation completed after a newer room selection invalidated
    /// it; its result was discarded.
    #[error("Superseded by a newer room selection")]
    Superseded,

    /// The backend rejected or never received a request.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The transport command channel is closed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The shared session lock was poisoned by a panicking task.
    #[error("Session lock poisoned")]
    LockPoisoned,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
