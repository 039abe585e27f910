use uuid::Uuid;

use crate::AppEvent;

/// Event fired when a transcript entry was added or updated.
///
/// This is a "minimal" or "ID-based" event. It intentionally does not carry
/// the new message data: subscribers re-read the shared `AppState`, which
/// keeps a single source of truth and prevents the UI from rendering stale
/// content.
#[derive(Debug, Clone, Copy)]
pub struct MessageUpdatedEvent(pub Uuid);

impl MessageUpdatedEvent {
    pub fn new(message_id: Uuid) -> Self {
        Self(message_id)
    }
}

impl From<MessageUpdatedEvent> for AppEvent {
    fn from(event: MessageUpdatedEvent) -> Self {
        AppEvent::MessageUpdated(event)
    }
}
