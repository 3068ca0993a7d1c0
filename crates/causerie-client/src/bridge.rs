//! Transport bridge: routes hub deliveries into the message store and
//! forwards appended messages to the presentation layer.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use causerie_net::hub::TransportEvent;
use causerie_net::messages::try_decode_delivery;
use causerie_shared::protocol::WireEvent;

use crate::events::{emit_event, EventSink, SessionEvent};
use crate::state::SharedSession;
use crate::store::LiveIngest;

/// Spawn the delivery loop for an attached transport link.
///
/// Returns the presentation event receiver and the loop's join handle.
/// The loop ends when the link's event channel closes.
pub fn start_transport_bridge(
    session: SharedSession,
    events: mpsc::Receiver<TransportEvent>,
) -> (mpsc::UnboundedReceiver<SessionEvent>, JoinHandle<()>) {
    let (sink, receiver) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        delivery_loop(session, events, sink).await;
    });

    (receiver, handle)
}

/// Main loop that receives transport deliveries and dispatches them into
/// the active room's store.
async fn delivery_loop(
    session: SharedSession,
    mut events: mpsc::Receiver<TransportEvent>,
    sink: EventSink,
) {
    info!("Transport bridge started");

    while let Some(event) = events.recv().await {
        let (outcome, message) = {
            let mut guard = match session.lock() {
                Ok(guard) => guard,
                Err(_) => {
                    warn!("Session lock poisoned, stopping bridge");
                    return;
                }
            };

            let Some(active) = guard.active_room.as_ref().map(|room| room.id) else {
                debug!("Delivery before any room selection ignored");
                continue;
            };

            // Deliveries for any other room are dropped here; this guards
            // the race between unsubscribe and an in-flight delivery.
            let Some(wire) = try_decode_delivery(&event, active) else {
                continue;
            };

            let WireEvent::MessageDelivered(message) = wire;
            if message.room_id != active {
                debug!(room = %message.room_id, "Message payload for another room dropped");
                continue;
            }

            (guard.store.ingest_live(message.clone()), message)
        };

        match outcome {
            LiveIngest::Appended => {
                info!(message = %message.id, room = %message.room_id, "Live message appended");
                emit_event(&sink, SessionEvent::MessageDelivered { message });
            }
            LiveIngest::Buffered => {
                debug!(message = %message.id, "Live message buffered until history lands");
            }
            LiveIngest::Duplicate => {
                debug!(message = %message.id, "Duplicate delivery ignored");
            }
        }
    }

    warn!("Transport bridge loop ended");
}
