use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tourguide_storage::{KeyValueStore, MemoryKeyValueStore, StorageError};

/// Memory store whose writes can be switched to fail.
///
/// Reads always succeed unless `fail_reads` is set.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryKeyValueStore,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects every write from the start.
    pub fn rejecting_writes() -> Self {
        let store = Self::default();
        store.set_fail_writes(true);
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

fn check(flag: &AtomicBool, op: &str) -> Result<(), StorageError> {
    if flag.load(Ordering::SeqCst) {
        Err(StorageError::Unavailable(format!("{op} rejected")))
    } else {
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check(&self.fail_reads, "get")?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check(&self.fail_writes, "set")?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        check(&self.fail_writes, "remove")?;
        self.inner.remove(key).await
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        check(&self.fail_reads, "keys")?;
        self.inner.keys(prefix).await
    }
}

/// Store that reports success for writes but silently discards them.
#[derive(Default)]
pub struct DroppingStore {
    inner: MemoryKeyValueStore,
    dropped: Mutex<Vec<String>>,
}

impl DroppingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys whose writes were discarded.
    pub fn dropped_keys(&self) -> Vec<String> {
        self.dropped.lock().clone()
    }
}

#[async_trait]
impl KeyValueStore for DroppingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        self.dropped.lock().push(key.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        self.inner.keys(prefix).await
    }
}
