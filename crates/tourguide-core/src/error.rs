//! Error types for the tour guide core crate.

use thiserror::Error;
use tourguide_storage::StorageError;

/// Errors returned by core persistence and conversation operations.
#[derive(Debug, Error)]
pub enum TourGuideError {
    /// The key-value store rejected an operation.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// A stored payload could not be decoded.
    #[error("corrupt record at {key}: {reason}")]
    Corrupt { key: String, reason: String },
    /// Encoding a record failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The remote chat service failed.
    #[error("chat backend error: {0}")]
    Backend(String),
}
