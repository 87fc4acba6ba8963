//! Region store trait for dependency injection.

use std::time::Duration;

use crate::region::RegionKey;
use crate::road::RegionFeatureCollection;

/// Persistent per-region storage as seen by the coordinator.
///
/// Lookups never fail: corrupt or missing entries read as `None`. Writes are
/// best-effort and report success as a bool.
///
/// # Example
///
/// ```
/// use asphalt::cache::{NoOpStore, RegionStore};
/// use asphalt::region::RegionKey;
///
/// fn show_cached(store: &dyn RegionStore, key: &RegionKey) -> usize {
///     store.get(key).map(|c| c.features.len()).unwrap_or(0)
/// }
///
/// assert_eq!(show_cached(&NoOpStore, &RegionKey::new("opolskie")), 0);
/// ```
pub trait RegionStore: Send + Sync {
    /// Fresh entry for `key`, or `None` when absent, expired or unreadable.
    fn get(&self, key: &RegionKey) -> Option<RegionFeatureCollection>;

    /// Any readable entry for `key` regardless of age, with its age.
    fn get_any(&self, key: &RegionKey) -> Option<(RegionFeatureCollection, Duration)>;

    /// Persist `collection` under `key`. Returns `false` on failure.
    fn set(&self, key: &RegionKey, collection: &RegionFeatureCollection) -> bool;

    /// Drop the entry for `key`, if any.
    fn remove(&self, key: &RegionKey);
}

/// Store that never keeps anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStore;

impl RegionStore for NoOpStore {
    fn get(&self, _key: &RegionKey) -> Option<RegionFeatureCollection> {
        None
    }

    fn get_any(&self, _key: &RegionKey) -> Option<(RegionFeatureCollection, Duration)> {
        None
    }

    fn set(&self, _key: &RegionKey, _collection: &RegionFeatureCollection) -> bool {
        true
    }

    fn remove(&self, _key: &RegionKey) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_store_accepts_but_never_returns() {
        let store = NoOpStore;
        let key = RegionKey::new("opolskie");
        let collection = RegionFeatureCollection::new(key.clone(), Vec::new());

        assert!(store.set(&key, &collection));
        assert!(store.get(&key).is_none());
        assert!(store.get_any(&key).is_none());
    }

    #[test]
    fn test_noop_store_as_trait_object() {
        let store: Box<dyn RegionStore> = Box::new(NoOpStore);
        store.remove(&RegionKey::new("opolskie"));
        assert!(store.get(&RegionKey::new("opolskie")).is_none());
    }
}
