//! Async command functions driven by the presentation layer.
//!
//! Every command takes the shared session handle explicitly; none of them
//! holds the lock across an await.

pub mod attachments;
pub mod compose;
pub mod directory;
pub mod messaging;
pub mod rooms;
