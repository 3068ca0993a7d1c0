//! Reply threading: render-time preview resolution.
//!
//! A message stores only the id of the message it replies to. The preview
//! is resolved against the loaded log; an unloaded target is a normal
//! display state (partial history), not a fault.

use causerie_shared::constants::REPLY_SNIPPET_MAX_CHARS;
use causerie_shared::models::Message;
use causerie_shared::types::MediaKind;

use crate::store::MessageStore;

/// What the presentation layer shows above a replying message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPreview {
    /// The target message is loaded; show its projection.
    Loaded(ReplySnippet),
    /// The target id is not in the loaded set.
    NotLoaded,
}

/// Lightweight projection of a reply target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplySnippet {
    pub sender_name: String,
    pub body: ReplyBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBody {
    /// Opening fragment of the target's text.
    Text(String),
    /// The target's first attachment.
    Attachment { file_name: String, kind: MediaKind },
}

/// Resolve the preview for a message's reply target, if it has one.
pub fn resolve_preview(store: &MessageStore, message: &Message) -> Option<ReplyPreview> {
    let target_id = message.reply_to?;
    let preview = match store.get(target_id) {
        Some(target) => ReplyPreview::Loaded(snippet_of(target)),
        None => ReplyPreview::NotLoaded,
    };
    Some(preview)
}

fn snippet_of(target: &Message) -> ReplySnippet {
    let body = match target.attachments.first() {
        Some(file) => ReplyBody::Attachment {
            file_name: file.file_name.clone(),
            kind: file.kind,
        },
        None => ReplyBody::Text(truncate_chars(&target.text, REPLY_SNIPPET_MAX_CHARS)),
    };
    ReplySnippet {
        sender_name: target.sender.display_name.clone(),
        body,
    }
}

/// Truncate on a char boundary so multi-byte text cannot be split.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}
