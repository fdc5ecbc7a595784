//! Chat session persistence and building-unlock progress for the tour guide.
//!
//! This crate owns the data model, the unlock tracker, the chat session
//! store, and the in-memory progress facade the application reads from.

pub mod backend;
pub mod chat;
pub mod conversation;
pub mod error;
pub mod progress;
pub mod summary;
pub mod types;
pub mod unlock;
pub mod wire;

pub use backend::{ChatBackend, HttpChatBackend};
pub use chat::{ChatSessionStore, SESSION_KEY_PREFIX, SESSIONS_INDEX_KEY};
pub use conversation::Conversation;
pub use error::TourGuideError;
pub use progress::{ProgressContext, ProgressSummary, Readiness};
pub use summary::SessionSummary;
pub use types::{ChatSession, Message, SessionId, new_session_id};
pub use unlock::{UNLOCKED_BUILDINGS_KEY, UnlockTracker};
pub use wire::StoredValue;
