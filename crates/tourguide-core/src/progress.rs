//! In-memory progress facade over the unlock tracker and chat store.

use crate::chat::ChatSessionStore;
use crate::error::TourGuideError;
use crate::types::ChatSession;
use crate::unlock::UnlockTracker;
use log::{debug, info, warn};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tourguide_config::UNRECOGNIZED_BUILDING;

/// Facade readiness. Never moves back to `Loading` once `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Uninitialized,
    Loading,
    Ready,
}

/// Unlock progress against a building catalogue.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProgressSummary {
    pub unlocked: usize,
    pub total: usize,
    /// 0-100; 0 for an empty catalogue.
    pub percentage: f64,
}

/// Application-facing view of unlock progress and chat history.
///
/// Holds an in-memory mirror of the unlocked set so lookups are synchronous.
/// The mirror is loaded once by [`ProgressContext::init`] and afterwards
/// updated write-through: storage first, then the mirror, without reading
/// storage back.
pub struct ProgressContext {
    tracker: Arc<UnlockTracker>,
    chats: Arc<ChatSessionStore>,
    unlocked: RwLock<Vec<String>>,
    readiness: RwLock<Readiness>,
}

impl ProgressContext {
    /// Create an uninitialized context; call [`ProgressContext::init`] before use.
    pub fn new(tracker: Arc<UnlockTracker>, chats: Arc<ChatSessionStore>) -> Self {
        Self {
            tracker,
            chats,
            unlocked: RwLock::new(Vec::new()),
            readiness: RwLock::new(Readiness::Uninitialized),
        }
    }

    /// Create a context and perform the initial load.
    pub async fn load(tracker: Arc<UnlockTracker>, chats: Arc<ChatSessionStore>) -> Self {
        let context = Self::new(tracker, chats);
        context.init().await;
        context
    }

    /// Load the unlocked set once. Later calls are no-ops.
    ///
    /// Unreadable storage leaves the mirror empty; the context still becomes
    /// ready.
    pub async fn init(&self) {
        {
            let mut readiness = self.readiness.write();
            if *readiness != Readiness::Uninitialized {
                debug!("progress context already initialized ({:?})", *readiness);
                return;
            }
            *readiness = Readiness::Loading;
        }
        let unlocked = self.tracker.get_unlocked().await;
        info!("progress context ready (unlocked={})", unlocked.len());
        *self.unlocked.write() = unlocked;
        *self.readiness.write() = Readiness::Ready;
    }

    pub fn readiness(&self) -> Readiness {
        *self.readiness.read()
    }

    /// True until the initial load completes; unlock queries are provisional meanwhile.
    pub fn is_loading(&self) -> bool {
        self.readiness() != Readiness::Ready
    }

    /// Snapshot of unlocked building ids in unlock order.
    pub fn unlocked_buildings(&self) -> Vec<String> {
        self.unlocked.read().clone()
    }

    pub fn is_unlocked(&self, building_id: &str) -> bool {
        self.unlocked.read().iter().any(|id| id == building_id)
    }

    /// Unlock a building as a side effect of a scan.
    ///
    /// Returns whether the in-memory set changed. Storage failures are logged
    /// and leave the set untouched; they never reach the caller.
    pub async fn unlock_building(&self, building_id: &str) -> bool {
        if building_id == UNRECOGNIZED_BUILDING {
            debug!("scan did not resolve to a building; nothing to unlock");
            return false;
        }
        if self.is_unlocked(building_id) {
            return false;
        }
        if let Err(err) = self.tracker.unlock(building_id).await {
            warn!("failed to persist unlock (building_id={building_id}): {err}");
            return false;
        }
        let mut unlocked = self.unlocked.write();
        if unlocked.iter().any(|id| id == building_id) {
            return false;
        }
        unlocked.push(building_id.to_string());
        true
    }

    /// Forget all unlock progress. Storage failures are returned to the caller.
    pub async fn clear_storage(&self) -> Result<(), TourGuideError> {
        if let Err(err) = self.tracker.reset().await {
            warn!("failed to clear unlock progress: {err}");
            return Err(err);
        }
        self.unlocked.write().clear();
        Ok(())
    }

    /// Progress over `catalogue`; ids outside the catalogue are not counted.
    pub fn progress(&self, catalogue: &[String]) -> ProgressSummary {
        let unlocked = catalogue
            .iter()
            .filter(|id| self.is_unlocked(id))
            .count();
        let total = catalogue.len();
        let percentage = if total == 0 {
            0.0
        } else {
            unlocked as f64 / total as f64 * 100.0
        };
        ProgressSummary {
            unlocked,
            total,
            percentage,
        }
    }

    pub async fn save_chat_session(&self, session: &ChatSession) -> Result<(), TourGuideError> {
        self.chats.save_session(session).await
    }

    pub async fn get_chat_session(
        &self,
        session_id: &str,
    ) -> Result<Option<ChatSession>, TourGuideError> {
        self.chats.get_session(session_id).await
    }

    pub async fn get_all_chat_sessions(&self) -> Result<Vec<ChatSession>, TourGuideError> {
        self.chats.get_all_sessions().await
    }

    pub async fn delete_chat_session(&self, session_id: &str) -> Result<(), TourGuideError> {
        self.chats.delete_session(session_id).await
    }

    pub async fn clear_all_chat_sessions(&self) -> Result<(), TourGuideError> {
        self.chats.clear_all().await
    }

    /// Shared chat store, for building conversations.
    pub fn chat_store(&self) -> Arc<ChatSessionStore> {
        self.chats.clone()
    }
}
