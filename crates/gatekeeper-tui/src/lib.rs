pub mod app;
pub mod app_state;
pub mod backend;
pub mod chat_history;
pub mod error;
pub mod event_bus;
pub mod markdown;
pub mod tracing_setup;
pub mod user_config;

pub use event_bus::*;

use std::sync::Arc;

use color_eyre::Result;
use tokio::sync::mpsc;

use app::App;
use app_state::{state_manager, AppState, MessageUpdatedEvent, StateCommand};
use backend::lifecycle::{self, BackendLauncher, ProcessLauncher};

/// All events carried on the [`EventBus`]. Real-time events feed the UI;
/// background events feed the workers.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Backend(backend::Event),
    /// A transcript entry was added or updated. UI should refresh.
    MessageUpdated(MessageUpdatedEvent),
    Error(ErrorEvent),
}

impl AppEvent {
    pub fn priority(&self) -> EventPriority {
        match self {
            AppEvent::Backend(_) => EventPriority::Background,
            AppEvent::MessageUpdated(_) => EventPriority::Realtime,
            AppEvent::Error(_) => EventPriority::Realtime,
        }
    }
}

pub async fn try_main() -> Result<()> {
    let config = user_config::UserConfig::load()?;

    // Make sure the knowledge base is reachable before the loop starts. A
    // failed spawn is not fatal: the first call will surface the connection
    // error in the transcript.
    let mut launcher = ProcessLauncher::new(&config.backend);
    lifecycle::ensure_running(&mut launcher).await;

    let event_bus = Arc::new(EventBus::new(EventBusCaps::default()));

    // Create command channel with backpressure
    let (cmd_tx, cmd_rx) = mpsc::channel::<StateCommand>(1024);

    let state = Arc::new(AppState::new(config.clone()));

    // Spawn state manager first
    tokio::spawn(state_manager(state.clone(), cmd_rx, event_bus.clone()));

    // Spawn the backend worker with its own bus subscription
    let kb = backend::KnowledgeBase::new(&config.backend)?;
    tokio::spawn(backend::backend_manager(
        event_bus.subscribe(EventPriority::Background),
        cmd_tx.clone(),
        kb,
    ));

    let terminal = ratatui::init();
    let app = App::new(state, cmd_tx, &event_bus, &config.ui);
    let result = app.run(terminal).await;
    ratatui::restore();

    // A quit while a request is in flight abandons the call along with the
    // spawned backend.
    launcher.shutdown();
    result
}
