use std::sync::Arc;
use std::time::Instant;

use tracing::instrument;
use uuid::Uuid;

use crate::app_state::core::{AppState, PendingRequest};
use crate::app_state::MessageUpdatedEvent;
use crate::backend::{self, BackendError, BackendResponse, RequestKind};
use crate::chat_history::{MessageKind, MessageStatus, MessageUpdate};
use crate::error::{ErrorExt as _, ErrorSeverity};
use crate::{AppEvent, EventBus};

/// Starts a backend call: appends the user entry and the request placeholder,
/// records the pending slot, and hands the call to the backend worker.
///
/// Submitting while a request is already outstanding is a silent no-op: the
/// transcript and the pending slot are left untouched and no call is issued.
#[instrument(skip(state, event_bus, payload))]
pub async fn submit_request(
    state: &Arc<AppState>,
    event_bus: &Arc<EventBus>,
    kind: RequestKind,
    payload: String,
    new_msg_id: Uuid,
) {
    {
        let pending_guard = state.pending.read().await;
        if pending_guard.is_some() {
            tracing::debug!(%kind, "request already outstanding, dropping submission");
            return;
        }
    }

    let user_line = match kind {
        RequestKind::Ask => payload.clone(),
        RequestKind::Remember => format!("remember {payload}"),
    };

    let placeholder_id = Uuid::new_v4();
    let request_id = Uuid::new_v4();

    let mut chat_guard = state.chat.0.write().await;
    chat_guard.add_message(new_msg_id, MessageKind::User, user_line);
    if let Err(e) = chat_guard.add_placeholder(placeholder_id, kind.label()) {
        // Unreachable while the pending slot guards submission.
        tracing::error!("failed to append request placeholder: {}", e);
        return;
    }
    drop(chat_guard);

    *state.pending.write().await = Some(PendingRequest {
        request_id,
        kind,
        payload: payload.clone(),
        placeholder_id,
        started: Instant::now(),
    });

    event_bus.send(MessageUpdatedEvent::new(placeholder_id).into());
    event_bus.send(AppEvent::Backend(backend::Event::Request {
        request_id,
        kind,
        payload,
    }));
}

/// Resolves the outstanding request with its outcome, replacing the
/// placeholder in place and re-enabling submission. Completions that no
/// longer match the pending slot (cleared transcript) are dropped.
#[instrument(skip(state, event_bus, outcome))]
pub async fn complete_request(
    state: &Arc<AppState>,
    event_bus: &Arc<EventBus>,
    request_id: Uuid,
    outcome: Result<BackendResponse, BackendError>,
) {
    let pending = state
        .pending
        .write()
        .await
        .take_if(|p| p.request_id == request_id);
    let Some(pending) = pending else {
        tracing::warn!(%request_id, "dropping completion for unknown or abandoned request");
        return;
    };
    tracing::debug!(
        elapsed_ms = pending.started.elapsed().as_millis() as u64,
        "request completed"
    );

    let update = match outcome {
        Ok(response) if response.success => MessageUpdate {
            content: Some(response.answer),
            kind: Some(MessageKind::Assistant),
            status: Some(MessageStatus::Completed),
        },
        Ok(response) => MessageUpdate {
            content: Some(format!("Error: {}", response.answer)),
            kind: Some(MessageKind::SysInfo),
            status: Some(MessageStatus::Error {
                description: response.answer,
            }),
        },
        Err(e) => MessageUpdate {
            content: Some(format!("Error: {e}")),
            kind: Some(MessageKind::SysInfo),
            status: Some(MessageStatus::Error {
                description: e.to_string(),
            }),
        },
    };

    let mut chat_guard = state.chat.0.write().await;
    match chat_guard.resolve_placeholder(pending.placeholder_id, update) {
        Ok(message_id) => {
            drop(chat_guard);
            event_bus.send(MessageUpdatedEvent::new(message_id).into());
        }
        Err(e) => {
            drop(chat_guard);
            e.emit_error();
            event_bus.send_error(
                format!("failed to resolve request placeholder: {e}"),
                ErrorSeverity::Error,
            );
        }
    }
}
