//! Storage selection and the [`TourGuide`] handle tying config, progress and chat together.

use log::{debug, info};
use std::sync::Arc;
use tourguide_config::{StorageConfig, StorageProvider, TourGuideConfig};
use tourguide_core::{
    ChatBackend, ChatSessionStore, Conversation, HttpChatBackend, ProgressContext,
    ProgressSummary, SessionSummary, TourGuideError, UnlockTracker,
};
use tourguide_storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};

/// Open the key-value store selected by `config`.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match config.provider {
        StorageProvider::File => {
            let root = config.resolved_path();
            debug!("opening file store (root={})", root.display());
            Ok(Arc::new(FileKeyValueStore::new(root)?))
        }
        StorageProvider::Memory => {
            debug!("opening in-memory store");
            Ok(Arc::new(MemoryKeyValueStore::new()))
        }
    }
}

/// Loaded configuration plus the progress facade and chat backend built from it.
pub struct TourGuide {
    config: TourGuideConfig,
    progress: ProgressContext,
    backend: Arc<dyn ChatBackend>,
}

impl TourGuide {
    /// Open storage and talk to the HTTP chat backend named in `config`.
    pub async fn open(config: TourGuideConfig) -> Result<Self, StorageError> {
        let backend = Arc::new(HttpChatBackend::from_config(&config.backend));
        Self::with_backend(config, backend).await
    }

    /// Open storage and use `backend` for chat replies.
    pub async fn with_backend(
        config: TourGuideConfig,
        backend: Arc<dyn ChatBackend>,
    ) -> Result<Self, StorageError> {
        let store = open_store(&config.storage)?;
        let progress = ProgressContext::load(
            Arc::new(UnlockTracker::new(store.clone())),
            Arc::new(ChatSessionStore::new(store)),
        )
        .await;
        info!(
            "tour guide ready (provider={:?}, buildings={})",
            config.storage.provider,
            config.campus.buildings.len()
        );
        Ok(Self {
            config,
            progress,
            backend,
        })
    }

    pub fn config(&self) -> &TourGuideConfig {
        &self.config
    }

    pub fn progress(&self) -> &ProgressContext {
        &self.progress
    }

    /// Progress against the configured building catalogue.
    pub fn progress_summary(&self) -> ProgressSummary {
        self.progress.progress(&self.config.campus.buildings)
    }

    /// Past chats, most recently updated first.
    pub async fn session_summaries(&self) -> Result<Vec<SessionSummary>, TourGuideError> {
        Ok(self
            .progress
            .get_all_chat_sessions()
            .await?
            .iter()
            .map(|session| SessionSummary::from_session(session, &self.config.chat))
            .collect())
    }

    /// Start a conversation about `building`, greeting the visitor by name.
    pub async fn start_conversation(
        &self,
        building: &str,
        image_uri: Option<String>,
    ) -> Conversation {
        Conversation::start(
            self.progress.chat_store(),
            self.backend.clone(),
            self.config.chat.greeting_for(building),
            image_uri,
        )
        .await
    }

    /// Resume `session_id`, starting it fresh about `building` if nothing usable is stored.
    pub async fn resume_conversation(
        &self,
        session_id: &str,
        building: &str,
        image_uri: Option<String>,
    ) -> Result<Conversation, TourGuideError> {
        Conversation::resume(
            self.progress.chat_store(),
            self.backend.clone(),
            session_id,
            self.config.chat.greeting_for(building),
            image_uri,
        )
        .await
    }
}
