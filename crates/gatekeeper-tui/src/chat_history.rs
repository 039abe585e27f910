use std::fmt;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Error)]
pub enum ChatError {
    #[error("Message not found: {0}")]
    MessageNotFound(Uuid),
    #[error("Message {0} is already finalized and cannot be updated")]
    NotGenerating(Uuid),
    #[error("A request placeholder is already present")]
    PlaceholderExists,
}

/// Logical author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Assistant,
    SysInfo,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::User => write!(f, "User"),
            MessageKind::Assistant => write!(f, "Assistant"),
            MessageKind::SysInfo => write!(f, "SysInfo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MessageStatus {
    #[default]
    Completed,
    /// Transient state of the request placeholder while a backend call is
    /// outstanding. The entry is resolved in place when the call finishes.
    Generating,
    Error {
        description: String,
    },
}

impl MessageStatus {
    pub fn is_generating(&self) -> bool {
        matches!(self, MessageStatus::Generating)
    }
}

/// An individual entry in the conversation transcript.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub kind: MessageKind,
    pub content: String,
    pub status: MessageStatus,
}

/// Partial update applied to a message when its request resolves.
#[derive(Debug, Clone, Default)]
pub struct MessageUpdate {
    pub content: Option<String>,
    pub kind: Option<MessageKind>,
    pub status: Option<MessageStatus>,
}

impl Message {
    /// Apply a partial update. Only a `Generating` placeholder may be
    /// updated; every other entry is immutable once appended.
    pub fn try_update(&mut self, update: MessageUpdate) -> Result<(), ChatError> {
        if !self.status.is_generating() {
            return Err(ChatError::NotGenerating(self.id));
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        Ok(())
    }
}

/// Ordered log of transcript entries.
///
/// Invariant: at most one `Generating` placeholder exists at any time, and
/// when present it is the last entry. Regular appends that arrive while a
/// placeholder is outstanding are inserted just before it.
#[derive(Debug, Default)]
pub struct ChatHistory {
    messages: Vec<Message>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends a finalized message, keeping any outstanding placeholder last.
    pub fn add_message(&mut self, id: Uuid, kind: MessageKind, content: impl Into<String>) -> Uuid {
        let message = Message {
            id,
            kind,
            content: content.into(),
            status: MessageStatus::Completed,
        };
        match self.messages.last() {
            Some(last) if last.status.is_generating() => {
                let idx = self.messages.len() - 1;
                self.messages.insert(idx, message);
            }
            _ => self.messages.push(message),
        }
        id
    }

    /// Appends the transient placeholder entry for an outstanding request.
    pub fn add_placeholder(&mut self, id: Uuid, label: impl Into<String>) -> Result<Uuid, ChatError> {
        if self.placeholder().is_some() {
            return Err(ChatError::PlaceholderExists);
        }
        self.messages.push(Message {
            id,
            kind: MessageKind::Assistant,
            content: label.into(),
            status: MessageStatus::Generating,
        });
        Ok(id)
    }

    /// The outstanding placeholder, if any.
    pub fn placeholder(&self) -> Option<&Message> {
        self.messages.last().filter(|m| m.status.is_generating())
    }

    /// Resolves a placeholder in place with the outcome of its request.
    pub fn resolve_placeholder(&mut self, id: Uuid, update: MessageUpdate) -> Result<Uuid, ChatError> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ChatError::MessageNotFound(id))?;
        message.try_update(update)?;
        Ok(id)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with_placeholder() -> (ChatHistory, Uuid) {
        let mut history = ChatHistory::new();
        history.add_message(Uuid::new_v4(), MessageKind::User, "hello");
        let placeholder_id = history
            .add_placeholder(Uuid::new_v4(), "Searching knowledge base...")
            .unwrap();
        (history, placeholder_id)
    }

    #[test]
    fn placeholder_is_always_last() {
        let (mut history, _) = history_with_placeholder();
        history.add_message(Uuid::new_v4(), MessageKind::SysInfo, "note");
        let messages = history.messages();
        assert_eq!(messages.len(), 3);
        assert!(messages.last().unwrap().status.is_generating());
        assert_eq!(messages[1].content, "note");
    }

    #[test]
    fn second_placeholder_is_rejected() {
        let (mut history, _) = history_with_placeholder();
        let err = history.add_placeholder(Uuid::new_v4(), "again");
        assert!(matches!(err, Err(ChatError::PlaceholderExists)));
        let generating = history
            .messages()
            .iter()
            .filter(|m| m.status.is_generating())
            .count();
        assert_eq!(generating, 1);
    }

    #[test]
    fn resolve_replaces_in_place() {
        let (mut history, placeholder_id) = history_with_placeholder();
        history
            .resolve_placeholder(
                placeholder_id,
                MessageUpdate {
                    content: Some("hi there".to_string()),
                    status: Some(MessageStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap();
        let last = history.messages().last().unwrap();
        assert_eq!(last.content, "hi there");
        assert_eq!(last.kind, MessageKind::Assistant);
        assert!(history.placeholder().is_none());
    }

    #[test]
    fn completed_messages_are_immutable() {
        let mut history = ChatHistory::new();
        let id = history.add_message(Uuid::new_v4(), MessageKind::User, "hello");
        let err = history.resolve_placeholder(
            id,
            MessageUpdate {
                content: Some("rewritten".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(err, Err(ChatError::NotGenerating(_))));
        assert_eq!(history.messages()[0].content, "hello");
    }

    #[test]
    fn resolve_unknown_id_errors() {
        let (mut history, _) = history_with_placeholder();
        let err = history.resolve_placeholder(Uuid::new_v4(), MessageUpdate::default());
        assert!(matches!(err, Err(ChatError::MessageNotFound(_))));
    }

    #[test]
    fn clear_empties_transcript() {
        let (mut history, _) = history_with_placeholder();
        history.clear();
        assert!(history.is_empty());
        assert!(history.placeholder().is_none());
    }
}
