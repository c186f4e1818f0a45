//! In-process key-value store, used by tests and ephemeral hosts.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use super::{KeyValueStore, KvWrite};
use crate::{Error, Result};

/// Key-value store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `StorageUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Copy of all current entries
    pub async fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.lock().await.clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(Error::StorageUnavailable(
                "in-memory store marked unavailable".into(),
            ))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        self.check_available()?;
        let entries = self.entries.lock().await;
        Ok(keys.iter().map(|key| entries.get(*key).cloned()).collect())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_available()?;
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn write_batch(&self, writes: Vec<KvWrite>) -> Result<()> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        for write in writes {
            match write {
                KvWrite::Set { key, value } => {
                    entries.insert(key, value);
                }
                KvWrite::Remove { key } => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_set_get_remove() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);

        store.set("a", "1").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));

        store.remove("a").await.unwrap();
        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_get_many_preserves_order() {
        let store = MemoryKeyValueStore::new();
        store.set("b", "2").await.unwrap();

        let values = store.get_many(&["a", "b"]).await.unwrap();
        assert_eq!(values, vec![None, Some("2".to_string())]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_write_batch_applies_in_order() {
        let store = MemoryKeyValueStore::new();
        store.set("gone", "x").await.unwrap();

        store
            .write_batch(vec![
                KvWrite::set("k", "first"),
                KvWrite::set("k", "second"),
                KvWrite::remove("gone"),
            ])
            .await
            .unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("k").map(String::as_str), Some("second"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unavailable_store_fails_without_writing() {
        let store = MemoryKeyValueStore::new();
        store.set_unavailable(true);

        let error = store.set("k", "v").await.unwrap_err();
        assert!(matches!(error, Error::StorageUnavailable(_)));

        store.set_unavailable(false);
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
