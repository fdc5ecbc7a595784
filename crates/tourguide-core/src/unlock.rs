//! Durable set of unlocked building ids.

use crate::error::TourGuideError;
use crate::wire::{StoredValue, decode};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;
use tourguide_config::UNRECOGNIZED_BUILDING;
use tourguide_storage::KeyValueStore;

/// Storage key holding the JSON array of unlocked building ids.
pub const UNLOCKED_BUILDINGS_KEY: &str = "unlocked_buildings";

/// Tracks which buildings have been unlocked.
///
/// The set is kept as a JSON array in unlock order. Reads never fail: missing,
/// corrupt or unreadable records all count as "nothing unlocked yet".
pub struct UnlockTracker {
    store: Arc<dyn KeyValueStore>,
    /// Held across each read-modify-write of the unlock record.
    write_lock: Mutex<()>,
}

impl UnlockTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Read the stored record, distinguishing absent from corrupt data.
    pub async fn load(&self) -> Result<StoredValue<Vec<String>>, TourGuideError> {
        let raw = self.store.get(UNLOCKED_BUILDINGS_KEY).await?;
        Ok(match decode::<Vec<String>>(raw) {
            StoredValue::Present(ids) => StoredValue::Present(dedup(ids)),
            other => other,
        })
    }

    /// Unlocked building ids in unlock order; empty when nothing usable is stored.
    pub async fn get_unlocked(&self) -> Vec<String> {
        match self.load().await {
            Ok(StoredValue::Present(ids)) => ids,
            Ok(StoredValue::Absent) => Vec::new(),
            Ok(StoredValue::Corrupt(reason)) => {
                warn!("ignoring corrupt unlock record: {reason}");
                Vec::new()
            }
            Err(err) => {
                warn!("failed to read unlock record: {err}");
                Vec::new()
            }
        }
    }

    /// Record `building_id` as unlocked.
    ///
    /// Returns `Ok(true)` when the stored set changed. The recognition
    /// sentinel and ids already present leave storage untouched. A failed read
    /// is returned before anything is written, so stored progress never shrinks.
    pub async fn unlock(&self, building_id: &str) -> Result<bool, TourGuideError> {
        if building_id == UNRECOGNIZED_BUILDING {
            debug!("ignoring unlock for unrecognized building");
            return Ok(false);
        }
        let _guard = self.write_lock.lock().await;
        let mut unlocked = match self.load().await? {
            StoredValue::Present(ids) => ids,
            StoredValue::Absent => Vec::new(),
            StoredValue::Corrupt(reason) => {
                warn!("replacing corrupt unlock record: {reason}");
                Vec::new()
            }
        };
        if unlocked.iter().any(|id| id == building_id) {
            return Ok(false);
        }
        unlocked.push(building_id.to_string());
        let payload = serde_json::to_string(&unlocked)?;
        self.store.set(UNLOCKED_BUILDINGS_KEY, &payload).await?;
        info!(
            "unlocked building (building_id={building_id}, total={})",
            unlocked.len()
        );
        Ok(true)
    }

    /// Membership check against storage.
    pub async fn is_unlocked(&self, building_id: &str) -> bool {
        self.get_unlocked()
            .await
            .iter()
            .any(|id| id == building_id)
    }

    /// Forget every unlocked building.
    pub async fn reset(&self) -> Result<(), TourGuideError> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(UNLOCKED_BUILDINGS_KEY).await?;
        info!("unlock progress reset");
        Ok(())
    }
}

/// Drop repeated ids, keeping the first occurrence.
fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::{UNLOCKED_BUILDINGS_KEY, UnlockTracker};
    use crate::wire::StoredValue;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tourguide_storage::{KeyValueStore, MemoryKeyValueStore};

    fn tracker() -> (Arc<MemoryKeyValueStore>, UnlockTracker) {
        let store = Arc::new(MemoryKeyValueStore::new());
        let tracker = UnlockTracker::new(store.clone());
        (store, tracker)
    }

    #[tokio::test]
    async fn unlock_is_idempotent() {
        let (store, tracker) = tracker();
        assert!(tracker.unlock("Tepper").await.expect("unlock"));
        assert!(!tracker.unlock("Tepper").await.expect("unlock again"));
        assert!(!tracker.unlock("Tepper").await.expect("unlock third"));

        assert_eq!(tracker.get_unlocked().await, vec!["Tepper".to_string()]);
        assert_eq!(
            store.get(UNLOCKED_BUILDINGS_KEY).await.expect("get"),
            Some("[\"Tepper\"]".to_string())
        );
    }

    #[tokio::test]
    async fn sentinel_is_never_stored() {
        let (store, tracker) = tracker();
        assert!(!tracker.unlock("Error").await.expect("unlock"));
        assert!(!tracker.unlock("Error").await.expect("unlock"));
        assert!(tracker.get_unlocked().await.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn keeps_unlock_order() {
        let (_store, tracker) = tracker();
        for id in ["Gates", "Hunt", "Tepper", "Hunt"] {
            tracker.unlock(id).await.expect("unlock");
        }
        assert_eq!(
            tracker.get_unlocked().await,
            vec!["Gates".to_string(), "Hunt".to_string(), "Tepper".to_string()]
        );
        assert!(tracker.is_unlocked("Hunt").await);
        assert!(!tracker.is_unlocked("Doherty").await);
    }

    #[tokio::test]
    async fn corrupt_record_reads_as_empty_and_is_replaced() {
        let (store, tracker) = tracker();
        store
            .set(UNLOCKED_BUILDINGS_KEY, "{\"oops\":")
            .await
            .expect("seed");

        assert!(tracker.load().await.expect("load").is_corrupt());
        assert!(tracker.get_unlocked().await.is_empty());

        tracker.unlock("Gates").await.expect("unlock");
        assert_eq!(
            tracker.load().await.expect("load"),
            StoredValue::Present(vec!["Gates".to_string()])
        );
    }

    #[tokio::test]
    async fn stored_duplicates_are_collapsed() {
        let (store, tracker) = tracker();
        store
            .set(UNLOCKED_BUILDINGS_KEY, "[\"Gates\",\"Gates\",\"Hunt\"]")
            .await
            .expect("seed");
        assert_eq!(
            tracker.get_unlocked().await,
            vec!["Gates".to_string(), "Hunt".to_string()]
        );
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let (store, tracker) = tracker();
        tracker.unlock("Gates").await.expect("unlock");
        tracker.reset().await.expect("reset");
        assert!(tracker.get_unlocked().await.is_empty());
        assert_eq!(tracker.load().await.expect("load"), StoredValue::Absent);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn concurrent_unlocks_are_not_lost() {
        let (_store, tracker) = tracker();
        let tracker = Arc::new(tracker);
        let mut handles = Vec::new();
        for idx in 0..16 {
            let tracker = tracker.clone();
            handles.push(tokio::spawn(async move {
                tracker
                    .unlock(&format!("building-{idx}"))
                    .await
                    .expect("unlock")
            }));
        }
        for handle in handles {
            handle.await.expect("join");
        }
        assert_eq!(tracker.get_unlocked().await.len(), 16);
    }
}
