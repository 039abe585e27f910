mod core;
mod events;

pub mod commands;
mod dispatcher;
pub mod handlers;

// Public re-exports to keep the external API flat
pub use commands::StateCommand;
pub use core::{AppState, ChatState, ConfigState, PendingRequest};
pub use dispatcher::state_manager;
pub use events::MessageUpdatedEvent;
