//! The in-progress, unsent message state for the active room.

use causerie_shared::types::MessageId;

use crate::attachments::AttachmentStager;

/// Draft state owned by the session for the currently active room.
///
/// Discarded wholesale on send or room switch; no other component
/// mutates it directly.
#[derive(Debug)]
pub struct Composition {
    /// Current draft text.
    pub text: String,
    /// Files staged for the next send.
    pub stager: AttachmentStager,
    /// Message the draft is declared to be responding to.
    pub reply_to: Option<MessageId>,
    /// Case-folded fragment of an in-progress `@mention`, if any.
    pub mention_query: Option<String>,
}

impl Composition {
    pub fn new(max_staged: usize) -> Self {
        Self {
            text: String::new(),
            stager: AttachmentStager::new(max_staged),
            reply_to: None,
            mention_query: None,
        }
    }

    /// Drop all draft state, releasing staged previews.
    pub fn reset(&mut self) {
        self.text.clear();
        self.stager.clear();
        self.reply_to = None;
        self.mention_query = None;
    }

    /// Whether a send would carry any content.
    pub fn has_content(&self) -> bool {
        !self.text.is_empty() || !self.stager.is_empty()
    }
}
