use uuid::Uuid;

use crate::backend::{BackendError, BackendResponse, RequestKind};
use crate::chat_history::MessageKind;

/// Defines the complete set of possible state mutation operations.
///
/// Each variant is an atomic command sent to the central `state_manager`
/// actor, the sole entry point for modifying `AppState`.
#[derive(Debug)]
pub enum StateCommand {
    /// Adds a finalized message to the transcript.
    AddMessageImmediate {
        msg: String,
        kind: MessageKind,
        new_msg_id: Uuid,
    },

    /// Submits an ask/remember line: appends the user entry plus the request
    /// placeholder and issues the backend call. Silently dropped while a
    /// request is already outstanding.
    SubmitRequest {
        kind: RequestKind,
        payload: String,
        new_msg_id: Uuid,
    },

    /// Reports the outcome of an outstanding backend call. Resolves the
    /// placeholder in place and re-enables submission.
    CompleteRequest {
        request_id: Uuid,
        outcome: Result<BackendResponse, BackendError>,
    },

    /// Empties the transcript and abandons any outstanding request.
    ClearHistory,
}

impl StateCommand {
    pub fn discriminant(&self) -> &'static str {
        match self {
            StateCommand::AddMessageImmediate { .. } => "AddMessageImmediate",
            StateCommand::SubmitRequest { .. } => "SubmitRequest",
            StateCommand::CompleteRequest { .. } => "CompleteRequest",
            StateCommand::ClearHistory => "ClearHistory",
        }
    }
}
