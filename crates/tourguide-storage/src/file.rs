//! File-backed key-value store.

use crate::error::StorageError;
use crate::key::{decode_key, encode_key};
use crate::store::KeyValueStore;
use async_trait::async_trait;
use log::{debug, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Extension for committed value files.
const VALUE_EXTENSION: &str = "kv";

/// Key-value store keeping one file per key under a root directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a half-written value.
#[derive(Debug)]
pub struct FileKeyValueStore {
    /// Root directory for value files.
    root: PathBuf,
    /// Serialize writers so temp files are never shared.
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        info!("initialized file key-value store (root={})", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory backing this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the committed value file for a key.
    fn value_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let stem = encode_key(key)?;
        Ok(self.root.join(format!("{stem}.{VALUE_EXTENSION}")))
    }

    /// Path to the temporary file used while writing a key.
    fn temp_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let stem = encode_key(key)?;
        Ok(self.root.join(format!("{stem}.{VALUE_EXTENSION}.tmp")))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.value_path(key)?;
        let temp_path = self.temp_path(key)?;
        let _guard = self.write_lock.lock().await;
        fs::write(&temp_path, value).await?;
        fs::rename(&temp_path, &path).await?;
        debug!("stored value (key={key}, len={})", value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.value_path(key)?;
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("removed value (key={key})");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            let Some(key) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(decode_key)
            else {
                continue;
            };
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
