//! Shared spot service used by client front-ends.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;

use super::enrichment::enrich_spot;
use crate::db::{Database, LibSqlKeyValueStore};
use crate::geocode::Geocoder;
use crate::location::LocationProvider;
use crate::models::{AccuracyTier, Spot, SpotId, SpotPatch};
use crate::storage::{KeyValueStore, MemoryKeyValueStore, SpotStore};
use crate::{Error, Result};

/// User-supplied details for a spot being marked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpotDraft {
    pub title: Option<String>,
    pub note: Option<String>,
}

/// Result of marking a spot
#[derive(Debug)]
pub struct MarkedSpot {
    /// The record as first saved
    pub spot: Spot,
    /// Background address lookup, when enrichment is enabled.
    ///
    /// Dropping the handle does not cancel it. Resolves to the enriched
    /// record, or `None` when nothing was written.
    pub enrichment: Option<JoinHandle<Option<Spot>>>,
}

struct Inner<S, L, G> {
    store: SpotStore<S>,
    location: L,
    geocoder: G,
}

/// Orchestrates location, storage, and geocoding for spot operations.
pub struct SpotService<S, L, G> {
    inner: Arc<Inner<S, L, G>>,
    enrichment_enabled: bool,
}

impl<S, L, G> Clone for SpotService<S, L, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            enrichment_enabled: self.enrichment_enabled,
        }
    }
}

impl<L, G> SpotService<LibSqlKeyValueStore, L, G>
where
    L: LocationProvider + 'static,
    G: Geocoder + 'static,
{
    /// Open a service backed by a database file at the given path.
    pub async fn open_path(
        db_path: impl Into<PathBuf>,
        location: L,
        geocoder: G,
    ) -> Result<Self> {
        let db = Database::open(db_path.into()).await?;
        let kv = LibSqlKeyValueStore::new(Arc::new(db));
        Ok(Self::new(SpotStore::new(kv), location, geocoder))
    }
}

impl<L, G> SpotService<MemoryKeyValueStore, L, G>
where
    L: LocationProvider + 'static,
    G: Geocoder + 'static,
{
    /// Service over an in-memory store (primarily for tests).
    pub fn in_memory(location: L, geocoder: G) -> Self {
        Self::new(SpotStore::new(MemoryKeyValueStore::new()), location, geocoder)
    }
}

impl<S, L, G> SpotService<S, L, G>
where
    S: KeyValueStore + 'static,
    L: LocationProvider + 'static,
    G: Geocoder + 'static,
{
    pub fn new(store: SpotStore<S>, location: L, geocoder: G) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                location,
                geocoder,
            }),
            enrichment_enabled: true,
        }
    }

    /// Enable or disable background address enrichment
    #[must_use]
    pub const fn with_enrichment(mut self, enabled: bool) -> Self {
        self.enrichment_enabled = enabled;
        self
    }

    /// The spot store behind this service
    pub fn store(&self) -> &SpotStore<S> {
        &self.inner.store
    }

    /// Mark the current position as a new spot.
    ///
    /// Saves the spot first, then looks up its address in the background.
    pub async fn mark_spot(&self, draft: SpotDraft) -> Result<MarkedSpot> {
        if !self.inner.location.request_permission().await {
            return Err(Error::PermissionDenied);
        }

        let position = self
            .inner
            .location
            .get_position(AccuracyTier::Balanced)
            .await?;

        let spot = Spot::from_position(&position)
            .with_title(draft.title)
            .with_note(draft.note);
        self.inner.store.save_spot(&spot).await?;
        tracing::info!(spot_id = %spot.id, "Marked spot at {}", spot.coordinates_label());

        let enrichment = self
            .enrichment_enabled
            .then(|| self.spawn_enrichment(spot.clone()));

        Ok(MarkedSpot { spot, enrichment })
    }

    fn spawn_enrichment(&self, spot: Spot) -> JoinHandle<Option<Spot>> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match enrich_spot(&inner.store, &inner.geocoder, &spot).await {
                Ok(updated) => updated,
                Err(error) => {
                    tracing::debug!(spot_id = %spot.id, "Address enrichment failed: {error}");
                    None
                }
            }
        })
    }

    pub async fn last_spot(&self) -> Result<Option<Spot>> {
        self.inner.store.get_last_spot().await
    }

    pub async fn list_spots(&self) -> Result<Vec<Spot>> {
        self.inner.store.get_spot_list().await
    }

    pub async fn find_spot(&self, id: &SpotId) -> Result<Option<Spot>> {
        self.inner.store.find_spot(id).await
    }

    /// Save a full record under its id (edit of an existing spot or import)
    pub async fn save_spot(&self, spot: &Spot) -> Result<()> {
        self.inner.store.save_spot(spot).await
    }

    /// Set or clear the title of a spot
    pub async fn rename_spot(&self, id: &SpotId, title: Option<String>) -> Result<Option<Spot>> {
        self.inner
            .store
            .update_spot(id, &SpotPatch::title(title))
            .await
    }

    /// Set or clear the note of a spot
    pub async fn annotate_spot(&self, id: &SpotId, note: Option<String>) -> Result<Option<Spot>> {
        self.inner.store.update_spot(id, &SpotPatch::note(note)).await
    }

    pub async fn delete_spot(&self, id: &SpotId) -> Result<()> {
        self.inner.store.delete_spot(id).await
    }

    pub async fn clear_spots(&self) -> Result<()> {
        self.inner.store.clear_all_spots().await
    }
}
