//! Conversation data structures
//!
//! This module provides the message log and conversation types. Messages are
//! immutable once created and appended in display order; a conversation's
//! title is derived from its first user message.

use crate::types::{ConversationId, MessageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a derived conversation title, in characters.
pub const TITLE_MAX_CHARS: usize = 30;

/// Title used before the user has said anything.
pub const DEFAULT_TITLE: &str = "New chat";

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user
    User,
    /// Message produced by the assistant
    Bot,
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier for the message
    pub id: MessageId,
    /// Content of the message
    pub text: String,
    /// Role of the message sender
    pub role: MessageRole,
    /// Timestamp when the message was created
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            role: MessageRole::User,
            timestamp: Utc::now(),
        }
    }

    /// Create a new bot message
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            role: MessageRole::Bot,
            timestamp: Utc::now(),
        }
    }
}

/// Summary entry for a conversation, as shown in the chat-history list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation identifier
    pub id: ConversationId,
    /// Derived title
    pub title: String,
    /// Last-updated timestamp
    pub timestamp: DateTime<Utc>,
}

/// One ordered thread of messages between user and assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier for the conversation
    pub id: ConversationId,
    /// Display title, derived from the first user message
    pub title: String,
    /// Last-updated timestamp
    pub timestamp: DateTime<Utc>,
    /// Message log in display order
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Create a new empty conversation with the placeholder title
    pub fn new() -> Self {
        Self {
            id: ConversationId::new(),
            title: DEFAULT_TITLE.to_string(),
            timestamp: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Append a message to the log.
    ///
    /// The log is append-only: prior messages are never edited or removed
    /// except by deleting the whole conversation.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.timestamp = Utc::now();
        self.refresh_title();
    }

    /// Recompute the title from the first user message, if there is one.
    ///
    /// Keeps the placeholder until the user has sent something.
    pub fn refresh_title(&mut self) {
        if let Some(derived) = self.derived_title() {
            self.title = derived;
        }
    }

    /// Title derived from the first user message, truncated to
    /// [`TITLE_MAX_CHARS`] characters. `None` if no user message exists yet.
    pub fn derived_title(&self) -> Option<String> {
        self.messages
            .iter()
            .find(|m| m.role == MessageRole::User)
            .map(|m| truncate_chars(m.text.trim(), TITLE_MAX_CHARS))
    }

    /// Summary entry for this conversation
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id,
            title: self.title.clone(),
            timestamp: self.timestamp,
        }
    }

    /// The most recent message, if any
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Messages with a specific role
    pub fn messages_by_role(&self, role: MessageRole) -> Vec<&ChatMessage> {
        self.messages.iter().filter(|m| m.role == role).collect()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

// Truncation must land on a char boundary, not a byte offset.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
