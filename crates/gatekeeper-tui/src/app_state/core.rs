use std::time::Instant;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::RequestKind;
use crate::chat_history::ChatHistory;
use crate::user_config::UserConfig;

/// AppState holds all shared session data.
/// It is designed for concurrent reads and synchronized writes: the UI holds
/// a read-only handle, and all mutation goes through the state manager.
#[derive(Debug)]
pub struct AppState {
    pub chat: ChatState,     // High-write frequency
    pub config: ConfigState, // Read-heavy

    /// The at-most-one outstanding backend call. `Some` while a request is
    /// Pending; submissions arriving in that window are silently dropped.
    pub pending: RwLock<Option<PendingRequest>>,
}

impl AppState {
    pub fn new(config: UserConfig) -> Self {
        Self {
            chat: ChatState(RwLock::new(ChatHistory::new())),
            config: ConfigState(RwLock::new(config)),
            pending: RwLock::new(None),
        }
    }

    pub async fn is_pending(&self) -> bool {
        self.pending.read().await.is_some()
    }
}

#[derive(Debug, Default)]
pub struct ChatState(pub RwLock<ChatHistory>);

impl ChatState {
    pub fn new(history: ChatHistory) -> Self {
        ChatState(RwLock::new(history))
    }
}

impl std::ops::Deref for ChatState {
    type Target = RwLock<ChatHistory>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Default)]
pub struct ConfigState(RwLock<UserConfig>);

impl ConfigState {
    pub fn new(config: UserConfig) -> Self {
        ConfigState(RwLock::new(config))
    }
}

impl std::ops::Deref for ConfigState {
    type Target = RwLock<UserConfig>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Bookkeeping for the single outstanding backend call.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub request_id: Uuid,
    pub kind: RequestKind,
    pub payload: String,
    pub placeholder_id: Uuid,
    pub started: Instant,
}
