//! Chat data model shared by the store, the facade and the conversation flow.

use crate::wire::iso8601;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a chat session.
pub type SessionId = String;

/// Current time truncated to the precision the wire format keeps.
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Generate a new, time-ordered session id.
pub fn new_session_id() -> SessionId {
    format!("chat_{}", Uuid::now_v7().simple())
}

/// Single chat message. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique, time-ordered message id.
    pub id: String,
    /// Message body.
    pub text: String,
    /// Whether the visitor wrote the message.
    pub is_user: bool,
    /// Creation time.
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Build a message with an explicit timestamp.
    pub fn new(text: impl Into<String>, is_user: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            text: text.into(),
            is_user,
            timestamp,
        }
    }

    /// Build a visitor message stamped now.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, true, now_millis())
    }

    /// Build a tour guide message stamped now.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, false, now_millis())
    }
}

/// Chat conversation thread with its metadata.
///
/// `created_at` tracks the first message and `updated_at` the last one; use
/// [`ChatSession::push`] to append so both stay in sync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Session identifier.
    pub id: SessionId,
    /// Messages in append order.
    pub messages: Vec<Message>,
    /// Timestamp of the first message.
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last message.
    #[serde(with = "iso8601")]
    pub updated_at: DateTime<Utc>,
    /// Photo the conversation started from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
}

impl ChatSession {
    /// Create an empty session stamped now.
    pub fn new(id: impl Into<SessionId>) -> Self {
        let now = now_millis();
        Self {
            id: id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            image_uri: None,
        }
    }

    /// Create a session from existing messages, deriving its timestamps.
    pub fn from_messages(
        id: impl Into<SessionId>,
        messages: Vec<Message>,
        image_uri: Option<String>,
    ) -> Self {
        let mut session = Self::new(id).with_image_uri(image_uri);
        for message in messages {
            session.push(message);
        }
        session
    }

    pub fn with_image_uri(mut self, image_uri: Option<String>) -> Self {
        self.image_uri = image_uri;
        self
    }

    /// Append a message and refresh the session timestamps.
    pub fn push(&mut self, message: Message) {
        if self.messages.is_empty() {
            self.created_at = message.timestamp;
        }
        self.updated_at = message.timestamp;
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// True when the last message is the visitor's and has no reply yet.
    pub fn is_awaiting_reply(&self) -> bool {
        self.last_message().is_some_and(|message| message.is_user)
    }
}
