use tokio::sync::mpsc;
use tracing::{debug, error};

use causerie_shared::protocol::WireEvent;
use causerie_shared::types::RoomId;

use crate::hub::{TransportCommand, TransportEvent};

/// Subscribe a link to a room channel.
pub async fn join_room(cmd_tx: &mpsc::Sender<TransportCommand>, room: RoomId) -> anyhow::Result<()> {
    debug!(room = %room, "Joining room channel");

    cmd_tx
        .send(TransportCommand::Join(room))
        .await
        .map_err(|_| anyhow::anyhow!("Transport command channel closed"))?;

    Ok(())
}

/// Unsubscribe a link from a room channel. Idempotent.
pub async fn leave_room(cmd_tx: &mpsc::Sender<TransportCommand>, room: RoomId) -> anyhow::Result<()> {
    debug!(room = %room, "Leaving room channel");

    cmd_tx
        .send(TransportCommand::Leave(room))
        .await
        .map_err(|_| anyhow::anyhow!("Transport command channel closed"))?;

    Ok(())
}

/// Publish a wire event on a room channel.
pub async fn publish_event(
    cmd_tx: &mpsc::Sender<TransportCommand>,
    room: RoomId,
    event: &WireEvent,
) -> anyhow::Result<()> {
    let data = event
        .to_bytes()
        .map_err(|e| anyhow::anyhow!("Serialization error: {e}"))?;

    debug!(room = %room, len = data.len(), "Publishing event");

    cmd_tx
        .send(TransportCommand::Emit { room, data })
        .await
        .map_err(|_| anyhow::anyhow!("Transport command channel closed"))?;

    Ok(())
}

/// Checks if a delivery belongs to the given room, and decodes it if so.
pub fn try_decode_delivery(event: &TransportEvent, room: RoomId) -> Option<WireEvent> {
    let TransportEvent::Delivered {
        room: delivered,
        data,
    } = event;

    if *delivered != room {
        debug!(room = %delivered, "Delivery for another room ignored");
        return None;
    }

    match WireEvent::from_bytes(data) {
        Ok(event) => Some(event),
        Err(e) => {
            error!(room = %room, error = %e, "Failed to decode delivery");
            None
        }
    }
}
