//! Ordered, deduplicated message log for the active room.

use std::collections::HashSet;

use causerie_shared::models::Message;
use causerie_shared::types::MessageId;

/// Outcome of feeding one live delivery into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveIngest {
    /// The message was appended to the visible sequence.
    Appended,
    /// History has not landed yet; the message was queued for replay.
    Buffered,
    /// A message with the same identifier is already present.
    Duplicate,
}

/// Append-only log of the active room's messages.
///
/// Every room activation starts the store in a buffering state: live
/// deliveries are queued until the history fetch settles, so the visible
/// sequence is always the history prefix followed by live arrivals, never
/// interleaved out of order. Identifier-based deduplication is the single
/// mechanism reconciling double deliveries (self-echo, at-least-once
/// transport) to one logical entry.
#[derive(Debug)]
pub struct MessageStore {
    entries: Vec<Message>,
    ids: HashSet<MessageId>,
    buffered: Option<Vec<Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            ids: HashSet::new(),
            buffered: Some(Vec::new()),
        }
    }

    /// Drop everything and arm the buffer for a fresh room activation.
    pub fn reset_for_activation(&mut self) {
        self.entries.clear();
        self.ids.clear();
        self.buffered = Some(Vec::new());
    }

    /// Install the server-ordered history, then replay any deliveries
    /// that were buffered while the fetch was in flight.
    ///
    /// Called at most once per room activation.
    pub fn ingest_history(&mut self, messages: Vec<Message>) {
        self.entries.clear();
        self.ids.clear();
        for message in messages {
            self.append_unique(message);
        }
        let buffered = self.buffered.take().unwrap_or_default();
        for message in buffered {
            self.append_unique(message);
        }
    }

    /// History fetch failed: keep the prefix empty but replay the buffer,
    /// so deliveries that arrived after subscription are not lost and
    /// future deliveries append directly.
    pub fn mark_history_failed(&mut self) {
        self.ingest_history(Vec::new());
    }

    /// Feed one live delivery into the store.
    pub fn ingest_live(&mut self, message: Message) -> LiveIngest {
        if let Some(buffer) = self.buffered.as_mut() {
            buffer.push(message);
            LiveIngest::Buffered
        } else if self.append_unique(message) {
            LiveIngest::Appended
        } else {
            LiveIngest::Duplicate
        }
    }

    /// The current ordered sequence, for rendering.
    pub fn all(&self) -> &[Message] {
        &self.entries
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.entries.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the store is still buffering deliveries for this
    /// activation.
    pub fn awaiting_history(&self) -> bool {
        self.buffered.is_some()
    }

    fn append_unique(&mut self, message: Message) -> bool {
        if self.ids.insert(message.id) {
            self.entries.push(message);
            true
        } else {
            false
        }
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
