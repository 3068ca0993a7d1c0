//! Startup directory load and direct-conversation lookup.

use tracing::info;

use causerie_shared::models::{Room, User};

use crate::error::{ClientError, Result};
use crate::state::SharedSession;

/// Load the signed-in user, room list, and user directory in one pass.
///
/// Called once after the credential is available, before any room is
/// selected.
pub async fn bootstrap(session: &SharedSession) -> Result<User> {
    let (auth, directory) = {
        let guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
        (guard.auth.clone(), guard.directory.clone())
    };
    let token = auth.credential();

    let (me, rooms, users) = tokio::join!(
        directory.fetch_me(token.as_ref()),
        directory.fetch_rooms(token.as_ref()),
        directory.fetch_users(token.as_ref()),
    );
    let me = me?;
    let rooms = rooms?;
    let users = users?;

    let mut guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    info!(user = %me.id, rooms = rooms.len(), users = users.len(), "Directory loaded");
    guard.current_user = Some(me.clone());
    guard.rooms = rooms;
    guard.users = users;
    Ok(me)
}

/// Find or create the direct room shared with `user`.
///
/// An existing non-group room containing both participants is reused;
/// otherwise the backend creates one and the room list grows. The caller
/// passes the result to `select_room` to switch into it.
pub async fn open_conversation(session: &SharedSession, user: &User) -> Result<Room> {
    let (existing, auth, directory) = {
        let guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
        let me = guard
            .current_user
            .as_ref()
            .ok_or(ClientError::NotAuthenticated)?;

        let existing = guard
            .rooms
            .iter()
            .find(|room| {
                !room.is_group
                    && room.members.iter().any(|m| m.id == user.id)
                    && room.members.iter().any(|m| m.id == me.id)
            })
            .cloned();

        (existing, guard.auth.clone(), guard.directory.clone())
    };

    if let Some(room) = existing {
        return Ok(room);
    }

    let token = auth.credential();
    let room = directory.create_direct_room(token.as_ref(), user.id).await?;

    let mut guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    info!(room = %room.id, with = %user.id, "Direct room created");
    guard.rooms.push(room.clone());
    Ok(room)
}
