pub mod lifecycle;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tracing::instrument;
use uuid::Uuid;

use crate::app_state::StateCommand;
use crate::error::ResultExt as _;
use crate::user_config::BackendConfig;
use crate::AppEvent;

/// Timeout enforced by the transport on every knowledge-base call. A timed
/// out call resolves the pending request as failed; there is no retry.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The two calls the knowledge base answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Ask,
    Remember,
}

impl RequestKind {
    /// Canonical placeholder label shown while the call is outstanding.
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Ask => "Searching knowledge base...",
            RequestKind::Remember => "Indexing knowledge base...",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Ask => write!(f, "ask"),
            RequestKind::Remember => write!(f, "remember"),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct AskRequest<'a> {
    pub query: &'a str,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BackendResponse {
    pub answer: String,
    pub success: bool,
}

/// Errors from the transport layer. A well-formed `success:false` response is
/// not a `BackendError`; it is surfaced through `BackendResponse` itself.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("request to knowledge base failed: {0}")]
    Request(String),

    #[error("request to knowledge base timed out")]
    Timeout,

    #[error("failed to decode knowledge base response: {0}")]
    Decode(String),

    #[error("knowledge base returned status {status}: {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout
        } else if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Request(e.to_string())
        }
    }
}

/// Backend-domain events carried on the bus. Completions do not travel here;
/// they return to the state manager as `StateCommand::CompleteRequest`.
#[derive(Clone, Debug)]
pub enum Event {
    Request {
        request_id: Uuid,
        kind: RequestKind,
        payload: String,
    },
}

/// HTTP client for the knowledge-base service.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    client: Client,
    base_url: String,
}

impl KnowledgeBase {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    pub async fn call(&self, kind: RequestKind, payload: &str) -> Result<BackendResponse, BackendError> {
        match kind {
            RequestKind::Ask => self.ask(payload).await,
            RequestKind::Remember => self.remember(payload).await,
        }
    }

    /// `POST /ask` with a JSON `{"query": ...}` body.
    pub async fn ask(&self, query: &str) -> Result<BackendResponse, BackendError> {
        let response = self
            .client
            .post(format!("{}/ask", self.base_url))
            .json(&AskRequest { query })
            .send()
            .await?;
        Self::read_response(response).await
    }

    /// `POST /remember` with the raw data as a `text/plain` body.
    pub async fn remember(&self, data: &str) -> Result<BackendResponse, BackendError> {
        let response = self
            .client
            .post(format!("{}/remember", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(data.to_owned())
            .send()
            .await?;
        Self::read_response(response).await
    }

    async fn read_response(response: reqwest::Response) -> Result<BackendResponse, BackendError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not retrieve error body".to_string());
            return Err(BackendError::Api { status, message });
        }
        response
            .json::<BackendResponse>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

/// Worker loop: listens for request events and runs each call off the UI
/// loop, reporting the outcome back to the state manager.
pub async fn backend_manager(
    mut event_rx: broadcast::Receiver<AppEvent>,
    cmd_tx: mpsc::Sender<StateCommand>,
    kb: KnowledgeBase,
) {
    use broadcast::error::RecvError;
    loop {
        match event_rx.recv().await {
            Ok(AppEvent::Backend(Event::Request {
                request_id,
                kind,
                payload,
            })) => {
                tracing::info!(%request_id, %kind, "Received knowledge base request");
                tokio::spawn(process_request(
                    kb.clone(),
                    cmd_tx.clone(),
                    request_id,
                    kind,
                    payload,
                ));
            }
            Ok(_) => {}
            Err(RecvError::Closed) => break,
            Err(RecvError::Lagged(lag)) => {
                tracing::warn!("backend event channel lagging by {} messages", lag);
            }
        }
    }
}

#[instrument(skip(kb, cmd_tx, payload))]
async fn process_request(
    kb: KnowledgeBase,
    cmd_tx: mpsc::Sender<StateCommand>,
    request_id: Uuid,
    kind: RequestKind,
    payload: String,
) {
    let outcome = kb.call(kind, &payload).await.emit_warning();
    if cmd_tx
        .send(StateCommand::CompleteRequest {
            request_id,
            outcome,
        })
        .await
        .is_err()
    {
        tracing::error!("Failed to deliver request completion: state manager channel closed.");
    }
}
