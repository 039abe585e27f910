use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace_span;

use super::core::AppState;
use super::handlers;
use crate::app_state::StateCommand;
use crate::EventBus;

/// Central actor owning all state mutation. Commands arrive over a bounded
/// channel; every handler broadcasts the resulting change back to the UI.
pub async fn state_manager(
    state: Arc<AppState>,
    mut cmd_rx: mpsc::Receiver<StateCommand>,
    event_bus: Arc<EventBus>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        let span = trace_span!("processing", cmd = %cmd.discriminant());
        let _enter = span.enter();

        match cmd {
            StateCommand::AddMessageImmediate {
                msg,
                kind,
                new_msg_id,
            } => {
                handlers::chat::add_msg_immediate(&state, &event_bus, new_msg_id, msg, kind).await;
            }
            StateCommand::SubmitRequest {
                kind,
                payload,
                new_msg_id,
            } => {
                handlers::request::submit_request(&state, &event_bus, kind, payload, new_msg_id)
                    .await;
            }
            StateCommand::CompleteRequest {
                request_id,
                outcome,
            } => {
                handlers::request::complete_request(&state, &event_bus, request_id, outcome).await;
            }
            StateCommand::ClearHistory => {
                handlers::chat::clear_history(&state, &event_bus).await;
            }
        };
    }
}
