//! Room selection and history synchronization.

use tracing::{info, warn};

use causerie_net::messages::{join_room, leave_room};
use causerie_shared::models::{Message, Room};

use crate::error::{ClientError, Result};
use crate::state::SharedSession;

/// Make `room` the active room and load its history.
///
/// Selecting the already-active room is a no-op that returns the current
/// view. Otherwise the previous subscription is dropped, the store and
/// composition are reset, the new room is joined, and the history fetch
/// is awaited. A newer selection invalidates an in-flight fetch: the
/// stale completion returns [`ClientError::Superseded`] and touches
/// nothing.
///
/// History failure leaves the room selected and subscribed with an empty
/// store, so later deliveries still populate it.
pub async fn select_room(session: &SharedSession, room: Room) -> Result<Vec<Message>> {
    let (epoch, previous, api, auth, hub_tx) = {
        let mut guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;

        if guard.active_room.as_ref().map(|r| r.id) == Some(room.id) {
            return Ok(guard.store.all().to_vec());
        }

        guard.epoch += 1;
        let previous = guard.active_room.replace(room.clone());
        guard.store.reset_for_activation();
        guard.composition.reset();

        (
            guard.epoch,
            previous,
            guard.api.clone(),
            guard.auth.clone(),
            guard.hub_tx.clone(),
        )
    };

    if let Some(previous) = previous {
        // Idempotent; failure only means the hub itself is gone.
        let _ = leave_room(&hub_tx, previous.id).await;
    }
    join_room(&hub_tx, room.id)
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    let token = auth.credential();
    let history = api.fetch_history(token.as_ref(), room.id).await;

    let mut guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    if guard.epoch != epoch {
        return Err(ClientError::Superseded);
    }

    match history {
        Ok(messages) => {
            guard.store.ingest_history(messages);
            info!(room = %room.id, count = guard.store.len(), "Room history loaded");
            Ok(guard.store.all().to_vec())
        }
        Err(e) => {
            guard.store.mark_history_failed();
            warn!(room = %room.id, error = %e, "History fetch failed; room stays subscribed");
            Err(ClientError::Api(e))
        }
    }
}
