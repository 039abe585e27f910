use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::app_state::core::AppState;
use crate::app_state::MessageUpdatedEvent;
use crate::chat_history::MessageKind;
use crate::EventBus;

/// Appends a finalized message to the transcript. If a request placeholder
/// is outstanding it stays last; the new entry lands just before it.
#[instrument(skip(state, event_bus, content))]
pub async fn add_msg_immediate(
    state: &Arc<AppState>,
    event_bus: &Arc<EventBus>,
    new_msg_id: Uuid,
    content: String,
    kind: MessageKind,
) {
    tracing::trace!("Starting add_msg_immediate");
    let mut chat_guard = state.chat.0.write().await;
    let message_id = chat_guard.add_message(new_msg_id, kind, content);
    drop(chat_guard);

    event_bus.send(MessageUpdatedEvent::new(message_id).into());
}

/// Empties the transcript and returns the request lifecycle to idle. An
/// in-flight call is abandoned; its late completion no longer matches and is
/// dropped by the completion handler.
pub async fn clear_history(state: &Arc<AppState>, event_bus: &Arc<EventBus>) {
    let mut chat_guard = state.chat.0.write().await;
    chat_guard.clear();
    drop(chat_guard);

    let abandoned = state.pending.write().await.take();
    if let Some(pending) = abandoned {
        tracing::debug!(request_id = %pending.request_id, "abandoning in-flight request on clear");
    }

    event_bus.send(MessageUpdatedEvent::new(Uuid::nil()).into());
}
