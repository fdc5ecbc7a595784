//! Configuration schema for the tour guide.

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory under the user's home holding config and durable state.
pub const DEFAULT_HOME_DIR: &str = ".tourguide";
/// Sentinel building id produced when recognition fails.
pub const UNRECOGNIZED_BUILDING: &str = "Error";
/// Placeholder substituted into the greeting template.
pub const BUILDING_PLACEHOLDER: &str = "{building}";

/// Root config for the tour guide SDK.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TourGuideConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub campus: CampusConfig,
}

impl TourGuideConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> TourGuideConfigBuilder {
        TourGuideConfigBuilder::new()
    }
}

/// Builder for assembling a `TourGuideConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct TourGuideConfigBuilder {
    config: TourGuideConfig,
}

impl TourGuideConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: TourGuideConfig::default(),
        }
    }

    /// Replace the storage configuration.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Replace the chat backend configuration.
    pub fn backend(mut self, backend: BackendConfig) -> Self {
        self.config.backend = backend;
        self
    }

    /// Replace the chat presentation configuration.
    pub fn chat(mut self, chat: ChatConfig) -> Self {
        self.config.chat = chat;
        self
    }

    /// Replace the campus building catalogue.
    pub fn campus(mut self, campus: CampusConfig) -> Self {
        self.config.campus = campus;
        self
    }

    /// Finalize and return the built `TourGuideConfig`.
    pub fn build(self) -> TourGuideConfig {
        self.config
    }
}

/// Which key-value backend holds durable state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageProvider {
    #[default]
    File,
    Memory,
}

/// Durable storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,
    /// Root directory for the file provider; defaults to `~/.tourguide/store`.
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    /// Resolve the directory used by the file provider.
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => PathBuf::from(path),
            None => default_storage_path(),
        }
    }
}

/// Default storage root under the home directory, falling back to the cwd.
fn default_storage_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(DEFAULT_HOME_DIR).join("store")
}

/// Remote chat service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_path")]
    pub chat_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
        }
    }
}

impl BackendConfig {
    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.chat_path.trim_start_matches('/')
        )
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_chat_path() -> String {
    "/chat".to_string()
}

/// Chat greeting and listing presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Opening assistant message; `{building}` is replaced by the building name.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
    #[serde(default = "default_preview_max_chars")]
    pub preview_max_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            title_max_chars: default_title_max_chars(),
            preview_max_chars: default_preview_max_chars(),
        }
    }
}

impl ChatConfig {
    /// Render the greeting for a building.
    pub fn greeting_for(&self, building: &str) -> String {
        self.greeting.replace(BUILDING_PLACEHOLDER, building)
    }
}

fn default_greeting() -> String {
    "Hi, Welcome to CMU! I'm your personal AI campus Tour Guide. \
     What would you like to know about {building}?"
        .to_string()
}

fn default_title_max_chars() -> usize {
    50
}

fn default_preview_max_chars() -> usize {
    80
}

/// Catalogue of unlockable buildings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CampusConfig {
    #[serde(default)]
    pub buildings: Vec<String>,
}
