//! Chat data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::parser::Citation;

/// Maximum characters of the first user message kept as a session title
pub const TITLE_MAX_CHARS: usize = 50;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message id
    pub id: String,
    /// Message role (user, assistant)
    pub role: Role,
    /// Display text; for assistant messages the citation block is already
    /// stripped
    pub content: String,
    /// Citations attached to an assistant message; always empty for user
    /// messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Citation>,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
        }
    }

    /// Create an assistant message with its parsed citations
    pub fn assistant(content: impl Into<String>, sources: Vec<Citation>) -> Self {
        Self {
            id: new_message_id(),
            role: Role::Assistant,
            content: content.into(),
            sources,
        }
    }
}

/// One persisted conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session id
    pub id: String,
    /// Title derived from the first user message
    pub title: String,
    /// Messages in conversation order
    pub messages: Vec<ChatMessage>,
    /// Session creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a session from its opening user message
    pub fn new(first_message: ChatMessage) -> Self {
        let now = Utc::now();
        Self {
            id: format!("chat-{}", Uuid::new_v4()),
            title: derive_title(&first_message.content),
            messages: vec![first_message],
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message and bump the update time
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }
}

fn new_message_id() -> String {
    format!("msg-{}", Uuid::new_v4())
}

/// First [`TITLE_MAX_CHARS`] characters of the opening message, with an
/// ellipsis appended when truncated. Counts characters, not bytes; most
/// input is Arabic.
pub fn derive_title(first_message: &str) -> String {
    let mut title: String = first_message.chars().take(TITLE_MAX_CHARS).collect();
    if first_message.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_verbatim_when_short() {
        let text = "a".repeat(40);
        assert_eq!(derive_title(&text), text);
    }

    #[test]
    fn test_title_is_truncated_with_ellipsis() {
        let text = "b".repeat(60);
        let title = derive_title(&text);
        assert_eq!(title, format!("{}...", "b".repeat(50)));
    }

    #[test]
    fn test_title_boundary_at_exactly_max_chars() {
        let text = "c".repeat(50);
        assert_eq!(derive_title(&text), text);
    }

    #[test]
    fn test_title_counts_chars_not_bytes() {
        let text = "س".repeat(60);
        let title = derive_title(&text);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_user_message_has_no_sources() {
        let message = ChatMessage::user("Hello");
        assert_eq!(message.role, Role::User);
        assert!(message.sources.is_empty());
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = ChatMessage::user("one");
        let b = ChatMessage::user("one");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_session_from_first_message() {
        let session = ChatSession::new(ChatMessage::user("How is the GPA calculated?"));
        assert_eq!(session.title, "How is the GPA calculated?");
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.created_at, session.updated_at);
    }

    #[test]
    fn test_append_bumps_updated_at() {
        let mut session = ChatSession::new(ChatMessage::user("q"));
        let created = session.created_at;
        session.append(ChatMessage::assistant("a", Vec::new()));
        assert_eq!(session.messages.len(), 2);
        assert!(session.updated_at >= created);
    }

    #[test]
    fn test_session_serde_round_trip() {
        let mut session = ChatSession::new(ChatMessage::user("q"));
        session.append(ChatMessage::assistant(
            "a",
            vec![Citation {
                title: "doc.pdf".to_string(),
                page: "3".to_string(),
            }],
        ));
        let raw = serde_json::to_string(&session).unwrap();
        let restored: ChatSession = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored, session);
    }
}
