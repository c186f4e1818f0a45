//! Spot store: the "last spot" pointer plus the bounded history list.

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use super::{KeyValueStore, KvWrite};
use crate::error::{Error, Result};
use crate::models::{Spot, SpotId, SpotPatch};

/// Storage key of the most recently saved spot
pub const LAST_SPOT_KEY: &str = "spot:last";
/// Storage key of the history list, most recent first
pub const SPOT_LIST_KEY: &str = "spot:list";
/// Maximum number of spots kept in the history list
pub const MAX_SPOTS: usize = 100;

/// Owner of the two spot slots in a key-value store.
///
/// Both slots are always written through one atomic batch, and every
/// read-modify-write sequence runs under the store's write lock.
pub struct SpotStore<S> {
    kv: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> SpotStore<S> {
    /// Create a store over the given key-value backend
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying key-value backend
    pub const fn backend(&self) -> &S {
        &self.kv
    }

    /// The most recently saved spot, if any
    pub async fn get_last_spot(&self) -> Result<Option<Spot>> {
        let raw = self.kv.get(LAST_SPOT_KEY).await?;
        raw.map(|raw| decode(LAST_SPOT_KEY, &raw)).transpose()
    }

    /// The full history, most recent first
    pub async fn get_spot_list(&self) -> Result<Vec<Spot>> {
        self.read_list().await
    }

    /// Look up a single spot in the history list
    pub async fn find_spot(&self, id: &SpotId) -> Result<Option<Spot>> {
        let list = self.read_list().await?;
        Ok(list.into_iter().find(|spot| &spot.id == id))
    }

    /// Persist a spot as the new last spot and at the front of the history.
    ///
    /// An existing entry with the same id is replaced; the list is cut to
    /// [`MAX_SPOTS`] entries.
    pub async fn save_spot(&self, spot: &Spot) -> Result<()> {
        spot.validate()?;
        let _guard = self.write_lock.lock().await;
        self.save_locked(spot).await
    }

    /// Apply a field-wise change to the current stored copy of a spot and
    /// save it. Returns `None` without writing when the spot no longer exists.
    pub async fn update_spot(&self, id: &SpotId, patch: &SpotPatch) -> Result<Option<Spot>> {
        let _guard = self.write_lock.lock().await;
        let Some(mut spot) = self
            .read_list()
            .await?
            .into_iter()
            .find(|spot| &spot.id == id)
        else {
            tracing::debug!(spot_id = %id, "Skipping update of missing spot");
            return Ok(None);
        };

        patch.apply(&mut spot);
        spot.validate()?;
        self.save_locked(&spot).await?;
        Ok(Some(spot))
    }

    /// Remove a spot from the history.
    ///
    /// If it was the last spot, the pointer moves to the new head of the
    /// list, or is cleared when the list is empty. Absent ids are a no-op.
    pub async fn delete_spot(&self, id: &SpotId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut snapshot = self
            .kv
            .get_many(&[LAST_SPOT_KEY, SPOT_LIST_KEY])
            .await?
            .into_iter();
        let raw_last = snapshot.next().flatten();
        let raw_list = snapshot.next().flatten();

        let list: Vec<Spot> = match raw_list {
            Some(raw) => decode(SPOT_LIST_KEY, &raw)?,
            None => Vec::new(),
        };
        let last: Option<Spot> = raw_last
            .map(|raw| decode(LAST_SPOT_KEY, &raw))
            .transpose()?;

        let original_len = list.len();
        let next_list: Vec<Spot> = list.into_iter().filter(|spot| &spot.id != id).collect();

        let mut writes = Vec::new();
        if next_list.len() != original_len {
            writes.push(KvWrite::set(SPOT_LIST_KEY, encode(&next_list)?));
        }
        if last.is_some_and(|last| &last.id == id) {
            match next_list.first() {
                Some(head) => writes.push(KvWrite::set(LAST_SPOT_KEY, encode(head)?)),
                None => writes.push(KvWrite::remove(LAST_SPOT_KEY)),
            }
        }

        if writes.is_empty() {
            tracing::debug!(spot_id = %id, "Delete of unknown spot is a no-op");
            return Ok(());
        }

        self.kv.write_batch(writes).await?;
        tracing::debug!(spot_id = %id, remaining = next_list.len(), "Deleted spot");
        Ok(())
    }

    /// Remove both slots
    pub async fn clear_all_spots(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.kv
            .write_batch(vec![
                KvWrite::remove(LAST_SPOT_KEY),
                KvWrite::remove(SPOT_LIST_KEY),
            ])
            .await
    }

    async fn save_locked(&self, spot: &Spot) -> Result<()> {
        let list = self.read_list().await?;
        let next_list = prepend_unique(list, spot.clone());

        self.kv
            .write_batch(vec![
                KvWrite::set(LAST_SPOT_KEY, encode(spot)?),
                KvWrite::set(SPOT_LIST_KEY, encode(&next_list)?),
            ])
            .await?;
        tracing::debug!(spot_id = %spot.id, entries = next_list.len(), "Saved spot");
        Ok(())
    }

    async fn read_list(&self) -> Result<Vec<Spot>> {
        match self.kv.get(SPOT_LIST_KEY).await? {
            Some(raw) => decode(SPOT_LIST_KEY, &raw),
            None => Ok(Vec::new()),
        }
    }
}

fn prepend_unique(list: Vec<Spot>, spot: Spot) -> Vec<Spot> {
    let mut next = Vec::with_capacity(list.len().min(MAX_SPOTS - 1) + 1);
    let id = spot.id.clone();
    next.push(spot);
    next.extend(list.into_iter().filter(|existing| existing.id != id));
    next.truncate(MAX_SPOTS);
    next
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|source| Error::corrupt(key, source))
}

fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}
