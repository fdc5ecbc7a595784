//! Error types for key-value storage.

/// Errors returned by key-value stores.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Key cannot be stored by this backend.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
    /// Backend rejected the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
