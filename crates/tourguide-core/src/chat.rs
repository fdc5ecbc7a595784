//! Chat session store backed by a session index plus one record per session.

use crate::error::TourGuideError;
use crate::types::{ChatSession, SessionId};
use crate::wire::{StoredValue, decode};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tourguide_storage::KeyValueStore;

/// Storage key holding the JSON array of session ids, most recent first.
pub const SESSIONS_INDEX_KEY: &str = "chat_sessions";
/// Prefix for per-session record keys.
pub const SESSION_KEY_PREFIX: &str = "chat_session:";

/// Storage key for a session record.
pub fn session_key(session_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{session_id}")
}

/// Persists chat sessions and keeps the session index in sync.
///
/// Index entries without a record are stale and skipped on read. The reverse
/// (a record missing from the index) would make the session unreachable, so
/// every save re-checks index membership.
pub struct ChatSessionStore {
    store: Arc<dyn KeyValueStore>,
    /// Held across every mutation that touches the index.
    index_lock: Mutex<()>,
}

impl ChatSessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            index_lock: Mutex::new(()),
        }
    }

    /// Write the full session record and make sure the index lists it.
    pub async fn save_session(&self, session: &ChatSession) -> Result<(), TourGuideError> {
        let payload = serde_json::to_string(session)?;
        let _guard = self.index_lock.lock().await;
        self.store.set(&session_key(&session.id), &payload).await?;
        debug!(
            "saved session record (session_id={}, messages={})",
            session.id,
            session.messages.len()
        );

        let mut ids = match self.load_index().await? {
            StoredValue::Present(ids) => ids,
            StoredValue::Absent => Vec::new(),
            StoredValue::Corrupt(reason) => {
                warn!("rebuilding corrupt session index: {reason}");
                let mut ids = self.scan_session_ids().await?;
                ids.retain(|id| id != &session.id);
                ids.insert(0, session.id.clone());
                self.write_index(&ids).await?;
                return Ok(());
            }
        };
        if !ids.contains(&session.id) {
            ids.insert(0, session.id.clone());
            self.write_index(&ids).await?;
            info!("indexed new session (session_id={})", session.id);
        }
        Ok(())
    }

    /// Load a session by id.
    ///
    /// Returns `Ok(None)` when no record exists and a `Corrupt` error when the
    /// record cannot be decoded.
    pub async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<ChatSession>, TourGuideError> {
        let key = session_key(session_id);
        match decode::<ChatSession>(self.store.get(&key).await?) {
            StoredValue::Present(session) => Ok(Some(session)),
            StoredValue::Absent => Ok(None),
            StoredValue::Corrupt(reason) => Err(TourGuideError::Corrupt { key, reason }),
        }
    }

    /// All indexed sessions, most recently updated first.
    ///
    /// Stale index entries and undecodable records are skipped.
    pub async fn get_all_sessions(&self) -> Result<Vec<ChatSession>, TourGuideError> {
        let ids = self.session_ids().await?;
        let mut seen = HashSet::new();
        let mut sessions = Vec::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(id.clone()) {
                continue;
            }
            match self.get_session(&id).await {
                Ok(Some(session)) => sessions.push(session),
                Ok(None) => debug!("skipping stale index entry (session_id={id})"),
                Err(TourGuideError::Corrupt { key, reason }) => {
                    warn!("skipping corrupt session record (key={key}): {reason}");
                }
                Err(err) => return Err(err),
            }
        }
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    /// Session ids in index order; a corrupt index reads as empty.
    pub async fn session_ids(&self) -> Result<Vec<SessionId>, TourGuideError> {
        Ok(match self.load_index().await? {
            StoredValue::Present(ids) => ids,
            StoredValue::Absent => Vec::new(),
            StoredValue::Corrupt(reason) => {
                warn!("ignoring corrupt session index: {reason}");
                Vec::new()
            }
        })
    }

    /// Remove a session record and its index entry.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), TourGuideError> {
        let _guard = self.index_lock.lock().await;
        self.store.remove(&session_key(session_id)).await?;
        match self.load_index().await? {
            StoredValue::Present(mut ids) => {
                let before = ids.len();
                ids.retain(|id| id != session_id);
                if ids.len() != before {
                    self.write_index(&ids).await?;
                }
            }
            StoredValue::Absent => {}
            StoredValue::Corrupt(reason) => {
                warn!("rebuilding corrupt session index: {reason}");
                let ids = self.scan_session_ids().await?;
                self.write_index(&ids).await?;
            }
        }
        info!("deleted session (session_id={session_id})");
        Ok(())
    }

    /// Remove every indexed session and then the index itself.
    pub async fn clear_all(&self) -> Result<(), TourGuideError> {
        let _guard = self.index_lock.lock().await;
        let ids = match self.load_index().await? {
            StoredValue::Present(ids) => ids,
            StoredValue::Absent => Vec::new(),
            StoredValue::Corrupt(reason) => {
                warn!("clearing sessions found by scan; index is corrupt: {reason}");
                self.scan_session_ids().await?
            }
        };
        for id in &ids {
            self.store.remove(&session_key(id)).await?;
        }
        self.store.remove(SESSIONS_INDEX_KEY).await?;
        info!("cleared chat sessions (count={})", ids.len());
        Ok(())
    }

    async fn load_index(&self) -> Result<StoredValue<Vec<SessionId>>, TourGuideError> {
        Ok(decode(self.store.get(SESSIONS_INDEX_KEY).await?))
    }

    async fn write_index(&self, ids: &[SessionId]) -> Result<(), TourGuideError> {
        let payload = serde_json::to_string(ids)?;
        self.store.set(SESSIONS_INDEX_KEY, &payload).await?;
        Ok(())
    }

    /// Recover session ids from the stored record keys.
    async fn scan_session_ids(&self) -> Result<Vec<SessionId>, TourGuideError> {
        let keys = self.store.keys(SESSION_KEY_PREFIX).await?;
        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(SESSION_KEY_PREFIX).map(str::to_string))
            .collect())
    }
}
