//! Message send orchestration.

use tracing::info;

use causerie_net::messages::publish_event;
use causerie_net::{FilePayload, OutgoingMessage};
use causerie_shared::models::Message;
use causerie_shared::protocol::WireEvent;

use crate::error::{ClientError, Result};
use crate::state::SharedSession;

/// Submit the active composition.
///
/// Requires an active room and a non-empty draft (text or staged files);
/// validation failures perform no network activity and leave the
/// composition intact. On success the persisted message is broadcast on
/// the realtime channel and the composition is cleared. The sender's own
/// broadcast loops back through the live channel; the store's id-based
/// deduplication is the sole mechanism preventing a duplicate visible
/// entry. API failure leaves composition and staged files untouched so
/// the user can retry without redoing input.
pub async fn send_message(session: &SharedSession) -> Result<Message> {
    let (epoch, outgoing, api, auth, hub_tx) = {
        let guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;

        let room = guard.active_room.as_ref().ok_or(ClientError::NoActiveRoom)?;
        if !guard.composition.has_content() {
            return Err(ClientError::EmptyMessage);
        }

        let attachments = guard
            .composition
            .stager
            .staged()
            .iter()
            .map(|file| FilePayload {
                name: file.name.clone(),
                mime: file.mime.clone(),
                data: file.data.clone(),
            })
            .collect();

        let outgoing = OutgoingMessage {
            room_id: room.id,
            text: guard.composition.text.clone(),
            reply_to: guard.composition.reply_to,
            attachments,
        };

        (
            guard.epoch,
            outgoing,
            guard.api.clone(),
            guard.auth.clone(),
            guard.hub_tx.clone(),
        )
    };

    let token = auth.credential();
    let message = api.send_message(token.as_ref(), outgoing).await?;

    publish_event(
        &hub_tx,
        message.room_id,
        &WireEvent::MessageDelivered(message.clone()),
    )
    .await
    .map_err(|e| ClientError::Transport(e.to_string()))?;

    {
        let mut guard = session.lock().map_err(|_| ClientError::LockPoisoned)?;
        // A room switch mid-send already discarded this composition; the
        // epoch check keeps the new room's draft untouched.
        if guard.epoch == epoch {
            guard.composition.reset();
        }
    }

    info!(message = %message.id, room = %message.room_id, "Message sent");
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::start_transport_bridge;
    use crate::commands::rooms::select_room;
    use crate::events::SessionEvent;
    use crate::testutil::{eventually, harness_for, message_in, room_with, user};

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use bytes::Bytes;

    use causerie_net::{join_room, publish_event, ApiError, BearerToken, MessageApi};

    use crate::attachments::{FileCandidate, PreviewResource};

    #[tokio::test]
    async fn send_without_a_room_is_rejected() {
        let joanna = user("Joanna");
        let harness = harness_for(&joanna, "tok").await;

        let result = send_message(&harness.session).await;
        assert!(matches!(result, Err(ClientError::NoActiveRoom)));
    }

    #[tokio::test]
    async fn empty_send_fails_without_touching_the_api() {
        let joanna = user("Joanna");
        let harness = harness_for(&joanna, "tok").await;
        let room = room_with(vec![joanna.clone()]);
        select_room(&harness.session, room.clone()).await.unwrap();

        let result = send_message(&harness.session).await;
        assert!(matches!(result, Err(ClientError::EmptyMessage)));

        // Nothing reached the backend.
        let token = BearerToken::new("tok");
        let history = harness
            .server
            .fetch_history(Some(&token), room.id)
            .await
            .unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn send_persists_broadcasts_and_clears() {
        let joanna = user("Joanna");
        let mut harness = harness_for(&joanna, "tok").await;
        let room = room_with(vec![joanna.clone()]);
        select_room(&harness.session, room.clone()).await.unwrap();

        let (mut events, _handle) = start_transport_bridge(
            harness.session.clone(),
            harness.transport_events.take().unwrap(),
        );

        let releases = Arc::new(AtomicUsize::new(0));
        let hook = releases.clone();
        {
            let mut guard = harness.session.lock().unwrap();
            guard.composition.text = "hello room".to_string();
            guard
                .composition
                .stager
                .add_files(vec![FileCandidate {
                    name: "cat.png".to_string(),
                    mime: "image/png".to_string(),
                    data: Bytes::from_static(b"pngbytes"),
                    preview: Some(PreviewResource::new(move || {
                        hook.fetch_add(1, Ordering::SeqCst);
                    })),
                }])
                .unwrap();
        }

        let sent = send_message(&harness.session).await.unwrap();
        assert_eq!(sent.text, "hello room");
        assert_eq!(sent.attachments.len(), 1);
        assert!(sent.attachments[0].url.contains("cat.png"));

        // The composition is cleared and the preview released.
        {
            let guard = harness.session.lock().unwrap();
            assert!(!guard.composition.has_content());
            assert!(guard.composition.stager.is_empty());
        }
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        // The self-echo arrives through the live channel exactly once.
        let SessionEvent::MessageDelivered { message } = events.recv().await.unwrap();
        assert_eq!(message.id, sent.id);
        assert_eq!(harness.session.lock().unwrap().store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_deliveries_stay_a_single_entry() {
        let joanna = user("Joanna");
        let mark = user("Mark");
        let mut harness = harness_for(&joanna, "tok").await;
        let room = room_with(vec![joanna.clone(), mark.clone()]);
        select_room(&harness.session, room.clone()).await.unwrap();

        let (_events, _handle) = start_transport_bridge(
            harness.session.clone(),
            harness.transport_events.take().unwrap(),
        );

        let other = harness.hub.attach().await.unwrap();
        join_room(&other.cmd_tx, room.id).await.unwrap();

        // At-least-once delivery: the same message lands twice, then a
        // distinct one; ordering per link is preserved.
        let echoed = message_in(room.id, &mark, "once only");
        let marker = message_in(room.id, &mark, "marker");
        for message in [echoed.clone(), echoed.clone(), marker.clone()] {
            publish_event(
                &other.cmd_tx,
                room.id,
                &WireEvent::MessageDelivered(message),
            )
            .await
            .unwrap();
        }

        let session = harness.session.clone();
        eventually(move || session.lock().unwrap().store.contains(marker.id)).await;

        let guard = harness.session.lock().unwrap();
        let texts: Vec<&str> = guard.store.all().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["once only", "marker"]);
    }

    #[tokio::test]
    async fn send_failure_leaves_the_composition_for_retry() {
        let joanna = user("Joanna");
        let harness = harness_for(&joanna, "tok").await;
        let room = room_with(vec![joanna.clone()]);
        select_room(&harness.session, room).await.unwrap();

        {
            let mut guard = harness.session.lock().unwrap();
            guard.composition.text = "do not lose me".to_string();
        }

        harness.server.set_offline(true);
        let result = send_message(&harness.session).await;
        assert!(matches!(result, Err(ClientError::Api(ApiError::Network(_)))));

        let guard = harness.session.lock().unwrap();
        assert_eq!(guard.composition.text, "do not lose me");
    }
}
