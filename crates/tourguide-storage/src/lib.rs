//! Durable string-keyed storage used by the tour guide persistence layer.

pub mod error;
pub mod file;
mod key;
pub mod memory;
pub mod store;

/// Storage error type.
pub use error::StorageError;
/// File-backed store (one file per key).
pub use file::FileKeyValueStore;
/// Process-local store used for tests and ephemeral runs.
pub use memory::MemoryKeyValueStore;
/// Key-value adapter interface.
pub use store::KeyValueStore;
