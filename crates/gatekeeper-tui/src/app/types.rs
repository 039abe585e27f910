/*!
Types and lightweight data structures for the app module.

Intended usage:
- message_item consumes RenderableMessage for measurement/rendering.
- input::keymap uses Mode to decide the active keymap.
- The App struct stores Mode for modal behavior (Normal/Insert).
*/

use crate::chat_history::{MessageKind, MessageStatus};

/// Editing/interaction mode for the TUI.
#[derive(Default, Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mode {
    /// Vim-like Normal mode: transcript scrolling.
    Normal,
    /// Default text input mode.
    #[default]
    Insert,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Normal => write!(f, "Normal"),
            Mode::Insert => write!(f, "Insert"),
        }
    }
}

/// Minimal message data required by the renderer. This is intentionally
/// a small, copy-on-read snapshot separate from the full chat model.
#[derive(Debug, Clone)]
pub struct RenderableMessage {
    pub(crate) kind: MessageKind,
    pub(crate) content: String,
    pub(crate) status: MessageStatus,
}
