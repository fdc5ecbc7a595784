//! Key-value adapter abstraction.

use crate::error::StorageError;
use async_trait::async_trait;

#[async_trait]
/// Asynchronous string-keyed storage.
///
/// Values are opaque strings; callers own the serialization format. A missing
/// key is `Ok(None)`, never an error.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// List stored keys starting with `prefix`, sorted.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
