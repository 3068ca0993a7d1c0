//! Wire payloads carried on the realtime room channel.
//!
//! The channel is browser-facing, so payloads are encoded as JSON. The
//! transport itself treats them as opaque bytes; only the two ends decode.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::models::Message;

/// All event payloads exchanged on a room channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum WireEvent {
    /// A message was persisted and fanned out to the room, the sender's
    /// own client included.
    MessageDelivered(Message),
}

impl WireEvent {
    /// Serialize to the JSON wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize from the JSON wire form.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(data)?)
    }
}
