//! Best-effort address enrichment of saved spots.

use crate::geocode::Geocoder;
use crate::models::{Spot, SpotPatch};
use crate::storage::{KeyValueStore, SpotStore};
use crate::Result;

/// Resolve an address for `spot` and merge it into the stored record.
///
/// Only the address label is written, onto whatever the store holds for the
/// spot at that moment, so edits made in the meantime survive. Returns the
/// updated record, or `None` when no address was found or the spot has been
/// deleted.
pub async fn enrich_spot<S, G>(store: &SpotStore<S>, geocoder: &G, spot: &Spot) -> Result<Option<Spot>>
where
    S: KeyValueStore,
    G: Geocoder,
{
    let Some(label) = geocoder.reverse_geocode(spot.lat, spot.lng).await? else {
        tracing::debug!(spot_id = %spot.id, "No address found for spot");
        return Ok(None);
    };

    let updated = store
        .update_spot(&spot.id, &SpotPatch::address_label(label))
        .await?;
    if updated.is_some() {
        tracing::debug!(spot_id = %spot.id, "Attached address to spot");
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::NoopGeocoder;
    use crate::storage::MemoryKeyValueStore;
    use crate::Error;

    struct FixedGeocoder(&'static str);

    impl Geocoder for FixedGeocoder {
        async fn reverse_geocode(&self, _lat: f64, _lng: f64) -> Result<Option<String>> {
            Ok(Some(self.0.to_string()))
        }
    }

    struct FailingGeocoder;

    impl Geocoder for FailingGeocoder {
        async fn reverse_geocode(&self, _lat: f64, _lng: f64) -> Result<Option<String>> {
            Err(Error::Geocoding("offline".into()))
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_enrichment_keeps_concurrent_rename() {
        let store = SpotStore::new(MemoryKeyValueStore::new());
        let captured = Spot::new(45.0, 9.0);
        store.save_spot(&captured).await.unwrap();

        // User renames after the enrichment captured its snapshot
        store
            .update_spot(&captured.id, &SpotPatch::title(Some("Home".to_string())))
            .await
            .unwrap();

        let updated = enrich_spot(&store, &FixedGeocoder("Via Roma 1"), &captured)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title.as_deref(), Some("Home"));
        assert_eq!(updated.address_label.as_deref(), Some("Via Roma 1"));
        assert_eq!(store.find_spot(&captured.id).await.unwrap(), Some(updated));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_enrichment_after_delete_writes_nothing() {
        let store = SpotStore::new(MemoryKeyValueStore::new());
        let spot = Spot::new(45.0, 9.0);
        store.save_spot(&spot).await.unwrap();
        store.delete_spot(&spot.id).await.unwrap();

        let updated = enrich_spot(&store, &FixedGeocoder("Via Roma 1"), &spot)
            .await
            .unwrap();

        assert_eq!(updated, None);
        assert!(store.get_spot_list().await.unwrap().is_empty());
        assert_eq!(store.get_last_spot().await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_enrichment_without_address_is_noop() {
        let store = SpotStore::new(MemoryKeyValueStore::new());
        let spot = Spot::new(45.0, 9.0);
        store.save_spot(&spot).await.unwrap();

        assert_eq!(enrich_spot(&store, &NoopGeocoder, &spot).await.unwrap(), None);
        assert_eq!(store.get_last_spot().await.unwrap(), Some(spot));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_enrichment_propagates_geocoder_errors() {
        let store = SpotStore::new(MemoryKeyValueStore::new());
        let spot = Spot::new(45.0, 9.0);
        store.save_spot(&spot).await.unwrap();

        let error = enrich_spot(&store, &FailingGeocoder, &spot).await.unwrap_err();
        assert!(matches!(error, Error::Geocoding(_)));
    }
}
