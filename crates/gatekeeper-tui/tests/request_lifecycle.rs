//! Async tests driving the state manager through the request lifecycle:
//! Idle -> Pending -> (Resolved | Failed) -> Idle. The backend worker is not
//! spawned; completions are injected directly, as the worker would do.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;
use uuid::Uuid;

use gatekeeper_tui::app_state::{state_manager, AppState, StateCommand};
use gatekeeper_tui::backend::{BackendError, BackendResponse, Event as BackendEvent, RequestKind};
use gatekeeper_tui::chat_history::{MessageKind, MessageStatus};
use gatekeeper_tui::user_config::UserConfig;
use gatekeeper_tui::{AppEvent, EventBus, EventBusCaps, EventPriority};

struct Harness {
    state: Arc<AppState>,
    cmd_tx: mpsc::Sender<StateCommand>,
    realtime_rx: broadcast::Receiver<AppEvent>,
    background_rx: broadcast::Receiver<AppEvent>,
}

fn harness() -> Harness {
    let event_bus = Arc::new(EventBus::new(EventBusCaps::default()));
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let state = Arc::new(AppState::new(UserConfig::default()));
    let realtime_rx = event_bus.subscribe(EventPriority::Realtime);
    let background_rx = event_bus.subscribe(EventPriority::Background);
    tokio::spawn(state_manager(state.clone(), cmd_rx, event_bus));
    Harness {
        state,
        cmd_tx,
        realtime_rx,
        background_rx,
    }
}

impl Harness {
    /// Sends a command that is expected to mutate state, and waits for the
    /// resulting broadcast so assertions observe the mutation.
    async fn send_and_sync(&mut self, cmd: StateCommand) {
        self.cmd_tx.send(cmd).await.expect("state manager alive");
        timeout(Duration::from_secs(1), self.realtime_rx.recv())
            .await
            .expect("timed out waiting for state change")
            .expect("event bus alive");
    }

    /// Sends a command that is expected to be swallowed, then proves the
    /// manager processed it by syncing on a follow-up barrier message.
    async fn send_then_barrier(&mut self, cmd: StateCommand) {
        self.cmd_tx.send(cmd).await.expect("state manager alive");
        self.send_and_sync(StateCommand::AddMessageImmediate {
            msg: "barrier".to_string(),
            kind: MessageKind::SysInfo,
            new_msg_id: Uuid::new_v4(),
        })
        .await;
    }

    async fn submit(&mut self, kind: RequestKind, payload: &str) {
        self.send_and_sync(StateCommand::SubmitRequest {
            kind,
            payload: payload.to_string(),
            new_msg_id: Uuid::new_v4(),
        })
        .await;
    }

    /// The request event the backend worker would have picked up.
    async fn issued_request(&mut self) -> (Uuid, RequestKind, String) {
        let event = timeout(Duration::from_secs(1), self.background_rx.recv())
            .await
            .expect("timed out waiting for backend request")
            .expect("event bus alive");
        match event {
            AppEvent::Backend(BackendEvent::Request {
                request_id,
                kind,
                payload,
            }) => (request_id, kind, payload),
            other => panic!("expected backend request, got {other:?}"),
        }
    }

    async fn transcript(&self) -> Vec<(MessageKind, String, MessageStatus)> {
        let guard = self.state.chat.0.read().await;
        guard
            .messages()
            .iter()
            .map(|m| (m.kind, m.content.clone(), m.status.clone()))
            .collect()
    }
}

#[tokio::test]
async fn ask_appends_user_entry_and_placeholder() {
    let mut h = harness();
    h.submit(RequestKind::Ask, "hello").await;

    let transcript = h.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].0, MessageKind::User);
    assert_eq!(transcript[0].1, "hello");
    assert_eq!(transcript[1].2, MessageStatus::Generating);
    assert_eq!(transcript[1].1, "Searching knowledge base...");
    assert!(h.state.is_pending().await);

    let (_, kind, payload) = h.issued_request().await;
    assert_eq!(kind, RequestKind::Ask);
    assert_eq!(payload, "hello");
}

#[tokio::test]
async fn successful_answer_replaces_placeholder() {
    let mut h = harness();
    h.submit(RequestKind::Ask, "hello").await;
    let (request_id, _, _) = h.issued_request().await;

    h.send_and_sync(StateCommand::CompleteRequest {
        request_id,
        outcome: Ok(BackendResponse {
            answer: "hi there".to_string(),
            success: true,
        }),
    })
    .await;

    let transcript = h.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].0, MessageKind::Assistant);
    assert_eq!(transcript[1].1, "hi there");
    assert_eq!(transcript[1].2, MessageStatus::Completed);
    assert!(!h.state.is_pending().await);
}

#[tokio::test]
async fn unsuccessful_answer_becomes_error_entry() {
    let mut h = harness();
    h.submit(RequestKind::Remember, "fact: sky is blue").await;

    let transcript = h.transcript().await;
    assert_eq!(transcript[0].1, "remember fact: sky is blue");
    assert_eq!(transcript[1].1, "Indexing knowledge base...");

    let (request_id, kind, payload) = h.issued_request().await;
    assert_eq!(kind, RequestKind::Remember);
    assert_eq!(payload, "fact: sky is blue");

    h.send_and_sync(StateCommand::CompleteRequest {
        request_id,
        outcome: Ok(BackendResponse {
            answer: "stored".to_string(),
            success: false,
        }),
    })
    .await;

    let transcript = h.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].0, MessageKind::SysInfo);
    assert!(transcript[1].1.contains("stored"));
    assert!(matches!(transcript[1].2, MessageStatus::Error { .. }));
    assert!(!h.state.is_pending().await);
}

#[tokio::test]
async fn timeout_fails_the_request_and_reenables_submission() {
    let mut h = harness();
    h.submit(RequestKind::Ask, "slow question").await;
    let (request_id, _, _) = h.issued_request().await;

    h.send_and_sync(StateCommand::CompleteRequest {
        request_id,
        outcome: Err(BackendError::Timeout),
    })
    .await;

    let transcript = h.transcript().await;
    assert!(transcript[1].1.contains("timed out"));
    assert!(matches!(transcript[1].2, MessageStatus::Error { .. }));
    assert!(!h.state.is_pending().await);

    // A fresh submission is accepted after the failure.
    h.submit(RequestKind::Ask, "again").await;
    assert!(h.state.is_pending().await);
    assert_eq!(h.transcript().await.len(), 4);
}

#[tokio::test]
async fn submitting_while_pending_is_a_silent_noop() {
    let mut h = harness();
    h.submit(RequestKind::Ask, "first").await;
    let _ = h.issued_request().await;
    let before = h.transcript().await.len();

    h.send_then_barrier(StateCommand::SubmitRequest {
        kind: RequestKind::Ask,
        payload: "second".to_string(),
        new_msg_id: Uuid::new_v4(),
    })
    .await;

    // Only the barrier entry was added; no second request was issued.
    let transcript = h.transcript().await;
    assert_eq!(transcript.len(), before + 1);
    assert!(transcript.iter().all(|(_, content, _)| content != "second"));
    assert!(matches!(
        h.background_rx.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));

    let pending = h.state.pending.read().await;
    assert_eq!(pending.as_ref().unwrap().payload, "first");
}

#[tokio::test]
async fn entries_added_while_pending_stay_before_the_placeholder() {
    let mut h = harness();
    h.submit(RequestKind::Ask, "hello").await;

    h.send_and_sync(StateCommand::AddMessageImmediate {
        msg: "note".to_string(),
        kind: MessageKind::SysInfo,
        new_msg_id: Uuid::new_v4(),
    })
    .await;

    let transcript = h.transcript().await;
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1].1, "note");
    assert_eq!(transcript[2].2, MessageStatus::Generating);
}

#[tokio::test]
async fn clear_empties_transcript_and_resets_lifecycle() {
    let mut h = harness();
    h.send_and_sync(StateCommand::AddMessageImmediate {
        msg: "old entry".to_string(),
        kind: MessageKind::SysInfo,
        new_msg_id: Uuid::new_v4(),
    })
    .await;
    h.submit(RequestKind::Ask, "hello").await;
    let (request_id, _, _) = h.issued_request().await;

    h.send_and_sync(StateCommand::ClearHistory).await;
    assert!(h.transcript().await.is_empty());
    assert!(!h.state.is_pending().await);

    // The abandoned call's late completion is dropped, not resurrected.
    h.send_then_barrier(StateCommand::CompleteRequest {
        request_id,
        outcome: Ok(BackendResponse {
            answer: "too late".to_string(),
            success: true,
        }),
    })
    .await;
    let transcript = h.transcript().await;
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].1, "barrier");
}
