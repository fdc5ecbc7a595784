//! One chat thread driven against the remote chat backend.

use crate::backend::ChatBackend;
use crate::chat::ChatSessionStore;
use crate::error::TourGuideError;
use crate::types::{ChatSession, Message, new_session_id};
use log::{debug, info, warn};
use std::sync::Arc;

/// A chat session plus the collaborators needed to continue it.
///
/// Every appended message triggers a full save. Save failures are logged and
/// swallowed so chatting is never blocked by storage.
pub struct Conversation {
    store: Arc<ChatSessionStore>,
    backend: Arc<dyn ChatBackend>,
    session: ChatSession,
}

impl Conversation {
    /// Start a new session opened by `greeting`.
    pub async fn start(
        store: Arc<ChatSessionStore>,
        backend: Arc<dyn ChatBackend>,
        greeting: impl Into<String>,
        image_uri: Option<String>,
    ) -> Self {
        let session = greeted_session(new_session_id(), greeting.into(), image_uri);
        info!("started conversation (session_id={})", session.id);
        let conversation = Self {
            store,
            backend,
            session,
        };
        conversation.persist().await;
        conversation
    }

    /// Continue `session_id`, or start it fresh with `greeting` if nothing usable is stored.
    ///
    /// A stored image uri wins over `image_uri`. Corrupt records are returned
    /// as errors rather than overwritten.
    pub async fn resume(
        store: Arc<ChatSessionStore>,
        backend: Arc<dyn ChatBackend>,
        session_id: &str,
        greeting: impl Into<String>,
        image_uri: Option<String>,
    ) -> Result<Self, TourGuideError> {
        let session = match store.get_session(session_id).await? {
            Some(mut session) if !session.messages.is_empty() => {
                debug!(
                    "resumed conversation (session_id={}, messages={})",
                    session.id,
                    session.messages.len()
                );
                if session.image_uri.is_none() {
                    session.image_uri = image_uri;
                }
                session
            }
            _ => {
                info!("session not found; starting fresh (session_id={session_id})");
                greeted_session(session_id.to_string(), greeting.into(), image_uri)
            }
        };
        let conversation = Self {
            store,
            backend,
            session,
        };
        conversation.persist().await;
        Ok(conversation)
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn into_session(self) -> ChatSession {
        self.session
    }

    /// Send visitor text and wait for the reply.
    ///
    /// Blank input is ignored (`Ok(None)`). If the backend fails, the visitor
    /// message stays in the session, already persisted, and the error is
    /// returned.
    pub async fn send(&mut self, text: &str) -> Result<Option<&Message>, TourGuideError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.session.push(Message::user(text));
        self.persist().await;

        let reply = match self.backend.reply(&self.session.messages).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(
                    "chat reply failed (session_id={}): {err}",
                    self.session.id
                );
                return Err(err);
            }
        };
        self.session.push(Message::assistant(reply));
        self.persist().await;
        Ok(self.session.last_message())
    }

    async fn persist(&self) {
        if let Err(err) = self.store.save_session(&self.session).await {
            warn!(
                "failed to save chat session (session_id={}): {err}",
                self.session.id
            );
        }
    }
}

fn greeted_session(id: String, greeting: String, image_uri: Option<String>) -> ChatSession {
    let mut session = ChatSession::new(id).with_image_uri(image_uri);
    session.push(Message::assistant(greeting));
    session
}
