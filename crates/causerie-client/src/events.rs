use serde::Serialize;
use tokio::sync::mpsc;

use causerie_shared::models::Message;

/// Pushes from the bridge loop to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum SessionEvent {
    /// A live message landed in the active room's store.
    MessageDelivered { message: Message },
}

/// Sender half of the presentation event channel.
pub type EventSink = mpsc::UnboundedSender<SessionEvent>;

pub fn emit_event(sink: &EventSink, event: SessionEvent) {
    if let Err(e) = sink.send(event) {
        tracing::error!(error = %e, "Failed to emit session event");
    }
}
