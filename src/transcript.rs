//! Transcript: the append-only conversation history.
//!
//! Messages are only ever appended. The one exception is the assistant
//! message currently being revealed: it is *open*, and its content may grow
//! by prefix extension until it is closed. A closed message never changes.

use crate::error::TranscriptError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a message within a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    /// The raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person at the keyboard.
    User,
    /// The language model.
    Assistant,
}

/// A reference attached to an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display title.
    pub title: String,
    /// Link target.
    pub url: String,
    /// Icon URL.
    pub favicon: String,
}

/// One entry in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Identity within the transcript.
    pub id: MessageId,
    /// Author.
    pub role: Role,
    /// Text content. Grows while the message is being revealed.
    pub content: String,
    /// Attached image as a data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Creation time, serialized as RFC 3339.
    pub timestamp: DateTime<Utc>,
    /// Whether this is a synthetic error reply.
    #[serde(default)]
    pub is_error: bool,
    /// References for assistant replies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

impl Message {
    fn new(id: MessageId, role: Role, content: String) -> Self {
        Self {
            id,
            role,
            content,
            image: None,
            timestamp: Utc::now(),
            is_error: false,
            sources: Vec::new(),
        }
    }
}

/// Ordered, append-only list of messages.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
    /// The message whose content may still grow.
    open: Option<MessageId>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&mut self, message: Message) -> MessageId {
        let id = message.id;
        // Only the tail may ever be open, so appending closes any open message.
        self.open = None;
        self.messages.push(message);
        id
    }

    fn allocate(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a user prompt.
    pub fn push_user(&mut self, content: impl Into<String>, image: Option<String>) -> MessageId {
        let id = self.allocate();
        let mut message = Message::new(id, Role::User, content.into());
        message.image = image;
        self.append(message)
    }

    /// Append an empty assistant message that is open for growth.
    pub fn open_assistant(&mut self, sources: Vec<Source>) -> MessageId {
        let id = self.allocate();
        let mut message = Message::new(id, Role::Assistant, String::new());
        message.sources = sources;
        self.append(message);
        self.open = Some(id);
        id
    }

    /// Append a complete assistant error message.
    pub fn push_error(&mut self, content: impl Into<String>) -> MessageId {
        let id = self.allocate();
        let mut message = Message::new(id, Role::Assistant, content.into());
        message.is_error = true;
        self.append(message)
    }

    /// Commit a new revealed prefix for the open message.
    ///
    /// The new content must extend the current content.
    pub fn extend_content(&mut self, id: MessageId, revealed: &str) -> Result<(), TranscriptError> {
        if self.open != Some(id) {
            return Err(if self.get(id).is_some() {
                TranscriptError::Closed(id)
            } else {
                TranscriptError::UnknownMessage(id)
            });
        }

        let message = self
            .messages
            .last_mut()
            .filter(|m| m.id == id)
            .ok_or(TranscriptError::UnknownMessage(id))?;

        if !revealed.starts_with(message.content.as_str()) {
            return Err(TranscriptError::NotPrefixExtension {
                id,
                current: message.content.len(),
                proposed: revealed.len(),
            });
        }

        let grown = &revealed[message.content.len()..];
        message.content.push_str(grown);
        Ok(())
    }

    /// Close the open message. Its content is final from now on.
    pub fn close(&mut self, id: MessageId) {
        if self.open == Some(id) {
            self.open = None;
        }
    }

    /// The message that may still grow, if any.
    pub const fn open_message(&self) -> Option<MessageId> {
        self.open
    }

    /// Look up a message.
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        // Ids are allocated in order, so the index search is exact.
        self.messages
            .binary_search_by_key(&id, |m| m.id)
            .ok()
            .map(|i| &self.messages[i])
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The newest message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if nothing has been said yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_order_and_ids() {
        let mut transcript = Transcript::new();
        let a = transcript.push_user("hi", None);
        let b = transcript.open_assistant(Vec::new());
        assert!(a < b);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.get(b).map(|m| m.role), Some(Role::Assistant));
        assert_eq!(transcript.open_message(), Some(b));
    }

    #[test]
    fn test_extend_content_grows_by_prefix() {
        let mut transcript = Transcript::new();
        let id = transcript.open_assistant(Vec::new());
        transcript.extend_content(id, "He").unwrap();
        transcript.extend_content(id, "Hello").unwrap();
        assert_eq!(transcript.get(id).unwrap().content, "Hello");

        let err = transcript.extend_content(id, "Help").unwrap_err();
        assert!(matches!(err, TranscriptError::NotPrefixExtension { .. }));
    }

    #[test]
    fn test_closed_message_is_frozen() {
        let mut transcript = Transcript::new();
        let id = transcript.open_assistant(Vec::new());
        transcript.extend_content(id, "done").unwrap();
        transcript.close(id);
        assert!(matches!(
            transcript.extend_content(id, "done!"),
            Err(TranscriptError::Closed(_))
        ));
    }

    #[test]
    fn test_append_closes_open_message() {
        let mut transcript = Transcript::new();
        let id = transcript.open_assistant(Vec::new());
        transcript.push_user("next", None);
        assert_eq!(transcript.open_message(), None);
        assert!(transcript.extend_content(id, "late").is_err());
    }

    #[test]
    fn test_error_message_flagged() {
        let mut transcript = Transcript::new();
        let id = transcript.push_error("oops");
        let message = transcript.get(id).unwrap();
        assert!(message.is_error);
        assert_eq!(message.role, Role::Assistant);
    }

    #[test]
    fn test_message_serializes_iso_timestamp() {
        let mut transcript = Transcript::new();
        let id = transcript.push_user("hi", None);
        let json = serde_json::to_value(transcript.get(id).unwrap()).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["isError"], false);
        let stamp = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
