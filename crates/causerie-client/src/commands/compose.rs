//! Draft editing: mention detection and commit, reply targeting, and
//! render-time lookups against the active room.

use causerie_shared::models::{Message, User};
use causerie_shared::types::{MessageId, UserId};

use crate::error::{ClientError, Result};
use crate::mentions::{self, MentionCandidate, MessageSpan};
use crate::reply::{self, ReplyPreview};
use crate::state::SharedSession;

/// Update the draft text and recompute mention candidates.
///
/// The candidate list is empty unless the draft ends in an `@token`.
pub fn set_draft(session: &SharedSession, text: String) -> Result<Vec<MentionCandidate>> {
    let mut guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    let state = &mut *guard;
    let room = state.active_room.as_ref().ok_or(ClientError::NoActiveRoom)?;

    let query = mentions::active_query(&text);
    let candidates = match &query {
        Some(query) => mentions::candidates(query, &room.members),
        None => Vec::new(),
    };

    state.composition.text = text;
    state.composition.mention_query = query;
    Ok(candidates)
}

/// Replace the trailing mention token with the chosen member's name.
///
/// Returns the updated draft. Without a trailing token the draft comes
/// back unchanged; earlier mentions are never retouched.
pub fn commit_mention(session: &SharedSession, user: UserId) -> Result<String> {
    let mut guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    let state = &mut *guard;
    let room = state.active_room.as_ref().ok_or(ClientError::NoActiveRoom)?;
    let member = room
        .members
        .iter()
        .find(|m| m.id == user)
        .ok_or(ClientError::UnknownMember)?;

    state.composition.text = mentions::commit(&state.composition.text, &member.display_name);
    state.composition.mention_query = None;
    Ok(state.composition.text.clone())
}

/// Resolve a clicked mention against the current room's member list.
///
/// Returns the member to open a conversation with; a name that does not
/// resolve, or resolves to the current user, is suppressed.
pub fn mention_click(session: &SharedSession, name: &str) -> Result<Option<User>> {
    let guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    let current = guard
        .current_user
        .as_ref()
        .ok_or(ClientError::NotAuthenticated)?;
    let room = guard.active_room.as_ref().ok_or(ClientError::NoActiveRoom)?;

    Ok(mentions::resolve_click(name, &room.members, current))
}

/// Parse a stored message body into text and mention spans.
pub fn message_spans(session: &SharedSession, text: &str) -> Result<Vec<MessageSpan>> {
    let guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    let room = guard.active_room.as_ref().ok_or(ClientError::NoActiveRoom)?;
    Ok(mentions::message_spans(text, &room.members))
}

/// Declare the draft a reply to `target`.
///
/// The target must be present in the active room's loaded messages.
pub fn set_reply_target(session: &SharedSession, target: MessageId) -> Result<()> {
    let mut guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    if !guard.store.contains(target) {
        return Err(ClientError::UnknownReplyTarget);
    }
    guard.composition.reply_to = Some(target);
    Ok(())
}

/// Drop the reply association.
pub fn clear_reply_target(session: &SharedSession) -> Result<()> {
    let mut guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    guard.composition.reply_to = None;
    Ok(())
}

/// Resolve the reply preview for a rendered message.
pub fn reply_preview(session: &SharedSession, message: &Message) -> Result<Option<ReplyPreview>> {
    let guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    Ok(reply::resolve_preview(&guard.store, message))
}

/// Validate a scroll-to-original request.
///
/// Returns the target id when it is loaded; `None` suppresses the
/// request.
pub fn reply_jump(session: &SharedSession, target: MessageId) -> Result<Option<MessageId>> {
    let guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
    Ok(guard.store.contains(target).then_some(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::rooms::select_room;
    use crate::reply::{ReplyBody, ReplySnippet};
    use crate::testutil::{harness_for, message_in, room_with, user};

    #[tokio::test]
    async fn draft_updates_surface_ranked_candidates() {
        let joanna = user("Joanna");
        let john = user("John");
        let mark = user("Mark");
        let harness = harness_for(&joanna, "tok").await;
        let room = room_with(vec![john.clone(), joanna.clone(), mark]);
        select_room(&harness.session, room).await.unwrap();

        let candidates = set_draft(&harness.session, "hello @jo".to_string()).unwrap();
        let names: Vec<&str> = candidates
            .iter()
            .map(|c| c.user.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Joanna", "John"]);
        assert_eq!(
            harness.session.lock().unwrap().composition.mention_query,
            Some("jo".to_string())
        );

        let candidates = set_draft(&harness.session, "hello @jo there".to_string()).unwrap();
        assert!(candidates.is_empty());
        assert!(harness
            .session
            .lock()
            .unwrap()
            .composition
            .mention_query
            .is_none());
    }

    #[tokio::test]
    async fn committing_a_candidate_rewrites_the_draft() {
        let joanna = user("Joanna");
        let john = user("John");
        let harness = harness_for(&joanna, "tok").await;
        let room = room_with(vec![joanna.clone(), john.clone()]);
        select_room(&harness.session, room).await.unwrap();

        set_draft(&harness.session, "hello @jo".to_string()).unwrap();
        let text = commit_mention(&harness.session, john.id).unwrap();
        assert_eq!(text, "hello @John ");
        assert!(harness
            .session
            .lock()
            .unwrap()
            .composition
            .mention_query
            .is_none());

        let stranger = user("Stranger");
        let err = commit_mention(&harness.session, stranger.id).unwrap_err();
        assert!(matches!(err, ClientError::UnknownMember));
    }

    #[tokio::test]
    async fn mention_click_goes_through_the_current_member_list() {
        let joanna = user("Joanna");
        let mark = user("Mark");
        let harness = harness_for(&joanna, "tok").await;
        let room = room_with(vec![joanna.clone(), mark.clone()]);
        select_room(&harness.session, room).await.unwrap();
        harness.session.lock().unwrap().current_user = Some(joanna.clone());

        assert_eq!(mention_click(&harness.session, "Mark").unwrap(), Some(mark));
        assert_eq!(mention_click(&harness.session, "Joanna").unwrap(), None);
        assert_eq!(mention_click(&harness.session, "Ghost").unwrap(), None);
    }

    #[tokio::test]
    async fn reply_target_must_be_loaded() {
        let joanna = user("Joanna");
        let harness = harness_for(&joanna, "tok").await;
        let room = room_with(vec![joanna.clone()]);
        let loaded = message_in(room.id, &joanna, "target");
        harness.server.seed_history(room.id, vec![loaded.clone()]);
        select_room(&harness.session, room.clone()).await.unwrap();

        let err = set_reply_target(&harness.session, MessageId::new()).unwrap_err();
        assert!(matches!(err, ClientError::UnknownReplyTarget));

        set_reply_target(&harness.session, loaded.id).unwrap();
        assert_eq!(
            harness.session.lock().unwrap().composition.reply_to,
            Some(loaded.id)
        );

        clear_reply_target(&harness.session).unwrap();
        assert!(harness.session.lock().unwrap().composition.reply_to.is_none());
    }

    #[tokio::test]
    async fn previews_and_jumps_resolve_against_the_store() {
        let joanna = user("Joanna");
        let harness = harness_for(&joanna, "tok").await;
        let room = room_with(vec![joanna.clone()]);
        let target = message_in(room.id, &joanna, "original");
        let mut replying = message_in(room.id, &joanna, "reply");
        replying.reply_to = Some(target.id);
        harness
            .server
            .seed_history(room.id, vec![target.clone(), replying.clone()]);
        select_room(&harness.session, room.clone()).await.unwrap();

        let preview = reply_preview(&harness.session, &replying).unwrap();
        assert_eq!(
            preview,
            Some(ReplyPreview::Loaded(ReplySnippet {
                sender_name: "Joanna".to_string(),
                body: ReplyBody::Text("original".to_string()),
            }))
        );

        // A reply whose target never loaded shows the marker state.
        let mut orphan = message_in(room.id, &joanna, "orphan");
        orphan.reply_to = Some(MessageId::new());
        assert_eq!(
            reply_preview(&harness.session, &orphan).unwrap(),
            Some(ReplyPreview::NotLoaded)
        );

        assert_eq!(
            reply_jump(&harness.session, target.id).unwrap(),
            Some(target.id)
        );
        assert_eq!(reply_jump(&harness.session, MessageId::new()).unwrap(), None);
    }
}
