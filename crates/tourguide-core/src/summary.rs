//! List-view summaries of chat sessions.

use crate::types::{ChatSession, SessionId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tourguide_config::ChatConfig;

/// Condensed view of a session for the past-chats list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: SessionId,
    /// First visitor message (or first message), truncated.
    pub title: String,
    /// Last message, truncated.
    pub preview: String,
    pub message_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn from_session(session: &ChatSession, config: &ChatConfig) -> Self {
        let title = session
            .messages
            .iter()
            .find(|message| message.is_user)
            .or_else(|| session.messages.first())
            .map_or_else(
                || "Empty Chat".to_string(),
                |message| truncate_with_ellipsis(&message.text, config.title_max_chars),
            );
        let preview = session.last_message().map_or_else(
            || "No messages".to_string(),
            |message| truncate_with_ellipsis(&message.text, config.preview_max_chars),
        );
        Self {
            id: session.id.clone(),
            title,
            preview,
            message_count: session.messages.len(),
            updated_at: session.updated_at,
        }
    }

    /// Relative "last updated" label as of `now`.
    pub fn updated_label(&self, now: DateTime<Utc>) -> String {
        relative_label(self.updated_at, now)
    }

    /// `1 message` / `N messages`.
    pub fn count_label(&self) -> String {
        if self.message_count == 1 {
            "1 message".to_string()
        } else {
            format!("{} messages", self.message_count)
        }
    }
}

/// Truncate to `max_chars` characters, appending `...` when shortened.
fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

/// Coarse age label: minutes, hours, then days up to a week, then the date.
pub fn relative_label(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = elapsed.num_days();
    if days < 7 {
        return format!("{days}d ago");
    }
    at.format("%Y-%m-%d").to_string()
}
