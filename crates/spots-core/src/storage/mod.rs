//! Key-value persistence port and the spot store built on top of it.

mod memory;
mod spot_store;

use std::future::Future;

use crate::Result;

pub use memory::MemoryKeyValueStore;
pub use spot_store::{SpotStore, LAST_SPOT_KEY, MAX_SPOTS, SPOT_LIST_KEY};

/// A single write inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

impl KvWrite {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove { key: key.into() }
    }
}

/// Opaque string key-value storage.
///
/// Single-key reads and writes are atomic. `get_many` observes one consistent
/// snapshot and `write_batch` applies all of its writes or none of them.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Read several keys from one snapshot, in the order given
    fn get_many(&self, keys: &[&str]) -> impl Future<Output = Result<Vec<Option<String>>>> + Send;

    /// Write a single value
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;

    /// Remove a key; removing an absent key succeeds
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Apply all writes atomically
    fn write_batch(&self, writes: Vec<KvWrite>) -> impl Future<Output = Result<()>> + Send;
}
