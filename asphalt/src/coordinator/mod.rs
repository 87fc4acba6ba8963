//! Orchestration of fetch, cache and display.
//!
//! The [`Coordinator`] is the single place where fetch failures become
//! user-facing categories. Loading only ever consults the cache; the
//! network is touched only by an explicit refresh, and at most one refresh
//! runs at a time.

mod outcome;

pub use outcome::{FailureKind, LoadOutcome, RefreshOutcome};

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::cache::RegionStore;
use crate::osm::{AccessTokenSource, EditError, EditGateway, EditReceipt};
use crate::overpass::RegionSource;
use crate::region::RegionKey;
use crate::render::{MapCanvas, RenderEngine};

/// Clears the in-flight flag when dropped.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Wires a region source, a store and a render engine together.
pub struct Coordinator<S: RegionSource, C: MapCanvas> {
    source: S,
    store: Box<dyn RegionStore>,
    engine: Mutex<RenderEngine<C>>,
    loading: AtomicBool,
}

impl<S: RegionSource, C: MapCanvas> Coordinator<S, C> {
    pub fn new(source: S, store: Box<dyn RegionStore>, engine: RenderEngine<C>) -> Self {
        Self {
            source,
            store,
            engine: Mutex::new(engine),
            loading: AtomicBool::new(false),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &dyn RegionStore {
        self.store.as_ref()
    }

    /// Exclusive access to the render engine.
    pub fn render(&self) -> MutexGuard<'_, RenderEngine<C>> {
        self.engine.lock()
    }

    /// Whether a refresh is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Show `key` from the cache. Never fetches.
    pub fn load_region(&self, key: &RegionKey) -> LoadOutcome {
        match self.store.get(key) {
            Some(collection) => {
                let mut engine = self.engine.lock();
                let counts = engine.display(&collection);
                engine.zoom_to_region(key);
                LoadOutcome::Displayed {
                    region: key.clone(),
                    counts,
                }
            }
            None => {
                info!(region = %key, "No cached data");
                LoadOutcome::NotCached {
                    region: key.clone(),
                }
            }
        }
    }

    /// Fetch `key`, cache it and display it.
    ///
    /// Returns [`RefreshOutcome::Rejected`] at once if another refresh is
    /// in flight. On failure, any readable cached copy is shown instead.
    pub async fn refresh_region(&self, key: &RegionKey) -> RefreshOutcome {
        let Some(_guard) = LoadingGuard::acquire(&self.loading) else {
            warn!(region = %key, "Refresh rejected, another refresh is in flight");
            return RefreshOutcome::Rejected;
        };

        info!(region = %key, "Refreshing region");

        match self.source.fetch_region(key).await {
            Ok(collection) => {
                let cached = self.store.set(key, &collection);
                if !cached {
                    warn!(region = %key, "Fetched data could not be cached");
                }

                let mut engine = self.engine.lock();
                let counts = engine.display(&collection);
                engine.zoom_to_region(key);

                if collection.is_empty() {
                    RefreshOutcome::NoData {
                        region: key.clone(),
                        cached,
                    }
                } else {
                    RefreshOutcome::Fetched {
                        region: key.clone(),
                        counts,
                        cached,
                    }
                }
            }
            Err(e) => {
                let kind = FailureKind::classify(&e);
                warn!(region = %key, kind = %kind, error = %e, "Refresh failed");

                match self.store.get_any(key) {
                    Some((collection, age)) => {
                        let mut engine = self.engine.lock();
                        let counts = engine.display(&collection);
                        engine.zoom_to_region(key);
                        info!(region = %key, age_secs = age.as_secs(), "Showing stale cached data");
                        RefreshOutcome::StaleFallback {
                            region: key.clone(),
                            counts,
                            kind,
                            age,
                        }
                    }
                    None => RefreshOutcome::Failed {
                        region: key.clone(),
                        kind,
                        message: kind.message().to_string(),
                    },
                }
            }
        }
    }

    /// Submit a smoothness edit for a displayed road.
    ///
    /// The engine is not locked while the gateway call is pending.
    pub async fn submit_edit<G, A>(
        &self,
        gateway: &G,
        tokens: &A,
        way_id: u64,
        smoothness: &str,
    ) -> Result<EditReceipt, EditError>
    where
        G: EditGateway,
        A: AccessTokenSource + ?Sized,
    {
        let edit = self.engine.lock().prepare_edit(tokens, way_id, smoothness)?;
        let receipt = gateway
            .update_smoothness(&edit.token, edit.way_id, &edit.smoothness)
            .await?;
        self.engine
            .lock()
            .apply_optimistic_edit(edit.way_id, &edit.smoothness, Some(receipt.new_version));
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoOpStore;
    use crate::osm::{MockGateway, StaticToken};
    use crate::overpass::FetchError;
    use crate::render::{RecordingCanvas, RenderConfig};
    use crate::road::{LatLon, RegionFeatureCollection, RoadFeature};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Source returning one scripted result, optionally waiting for a signal.
    struct StubSource {
        result: Result<RegionFeatureCollection, FetchError>,
        gate: Option<Arc<Notify>>,
    }

    impl RegionSource for StubSource {
        async fn fetch_region(
            &self,
            _key: &RegionKey,
        ) -> Result<RegionFeatureCollection, FetchError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.result.clone()
        }
    }

    /// In-memory store with explicit ages.
    #[derive(Default)]
    struct MemoryStore {
        entries: Mutex<HashMap<RegionKey, (RegionFeatureCollection, Duration, bool)>>,
        accept_writes: bool,
    }

    impl MemoryStore {
        fn accepting() -> Self {
            Self {
                accept_writes: true,
                ..Default::default()
            }
        }

        fn with(
            self,
            key: &str,
            collection: RegionFeatureCollection,
            age: Duration,
            fresh: bool,
        ) -> Self {
            self.entries
                .lock()
                .insert(RegionKey::new(key), (collection, age, fresh));
            self
        }
    }

    impl RegionStore for MemoryStore {
        fn get(&self, key: &RegionKey) -> Option<RegionFeatureCollection> {
            self.entries
                .lock()
                .get(key)
                .filter(|(_, _, fresh)| *fresh)
                .map(|(c, _, _)| c.clone())
        }

        fn get_any(&self, key: &RegionKey) -> Option<(RegionFeatureCollection, Duration)> {
            self.entries
                .lock()
                .get(key)
                .map(|(c, age, _)| (c.clone(), *age))
        }

        fn set(&self, key: &RegionKey, collection: &RegionFeatureCollection) -> bool {
            if self.accept_writes {
                self.entries
                    .lock()
                    .insert(key.clone(), (collection.clone(), Duration::ZERO, true));
            }
            self.accept_writes
        }

        fn remove(&self, key: &RegionKey) {
            self.entries.lock().remove(key);
        }
    }

    fn roads(key: &str) -> RegionFeatureCollection {
        let line = vec![LatLon::new(50.0, 17.0), LatLon::new(50.1, 17.1)];
        RegionFeatureCollection::new(
            RegionKey::new(key),
            vec![
                RoadFeature::new(1, line.clone(), "tertiary").with_smoothness("good"),
                RoadFeature::new(2, line, "tertiary"),
            ],
        )
    }

    fn timeout() -> FetchError {
        FetchError::Exhausted {
            attempts: 6,
            endpoints: 3,
            last: Box::new(FetchError::Timeout {
                endpoint: "https://a".to_string(),
                after: Duration::from_secs(95),
            }),
        }
    }

    fn coordinator(
        result: Result<RegionFeatureCollection, FetchError>,
        store: impl RegionStore + 'static,
    ) -> Coordinator<StubSource, RecordingCanvas> {
        Coordinator::new(
            StubSource { result, gate: None },
            Box::new(store),
            RenderEngine::new(RecordingCanvas::new(), RenderConfig::default()),
        )
    }

    #[test]
    fn test_load_hit_displays() {
        let store =
            MemoryStore::default().with("opolskie", roads("opolskie"), Duration::ZERO, true);
        let coordinator = coordinator(Err(timeout()), store);

        let outcome = coordinator.load_region(&RegionKey::new("opolskie"));

        match outcome {
            LoadOutcome::Displayed { counts, .. } => {
                assert_eq!(counts.good, 1);
                assert_eq!(counts.unknown, 1);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(coordinator.render().canvas().len(), 2);
        assert!(coordinator.render().canvas().bounds().is_some());
    }

    #[test]
    fn test_load_miss_leaves_display() {
        let store =
            MemoryStore::default().with("opolskie", roads("opolskie"), Duration::ZERO, true);
        let coordinator = coordinator(Err(timeout()), store);
        coordinator.load_region(&RegionKey::new("opolskie"));

        let outcome = coordinator.load_region(&RegionKey::new("lubuskie"));

        assert!(matches!(outcome, LoadOutcome::NotCached { .. }));
        assert_eq!(coordinator.render().canvas().len(), 2);
    }

    #[test]
    fn test_load_ignores_expired_entry() {
        let store = MemoryStore::default().with(
            "opolskie",
            roads("opolskie"),
            Duration::from_secs(999_999),
            false,
        );
        let coordinator = coordinator(Err(timeout()), store);

        assert!(matches!(
            coordinator.load_region(&RegionKey::new("opolskie")),
            LoadOutcome::NotCached { .. }
        ));
    }

    #[tokio::test]
    async fn test_refresh_success_caches_and_displays() {
        let coordinator = coordinator(Ok(roads("opolskie")), MemoryStore::accepting());
        let key = RegionKey::new("opolskie");

        let outcome = coordinator.refresh_region(&key).await;

        match &outcome {
            RefreshOutcome::Fetched { counts, cached, .. } => {
                assert_eq!(counts.total, 2);
                assert!(*cached);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(coordinator.store().get(&key).is_some());
        assert!(!coordinator.is_loading());
    }

    #[tokio::test]
    async fn test_refresh_cache_write_failure_is_not_fatal() {
        let coordinator = coordinator(Ok(roads("opolskie")), NoOpStore);

        let outcome = coordinator.refresh_region(&RegionKey::new("opolskie")).await;

        assert!(outcome.is_success());
        assert_eq!(coordinator.render().canvas().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_empty_result_is_no_data() {
        let empty = RegionFeatureCollection::new(RegionKey::new("opolskie"), vec![]);
        let store = MemoryStore::accepting();
        let coordinator = coordinator(Ok(empty), store);
        coordinator.render().display(&roads("opolskie"));

        let outcome = coordinator.refresh_region(&RegionKey::new("opolskie")).await;

        assert!(matches!(outcome, RefreshOutcome::NoData { cached: true, .. }));
        assert!(coordinator.render().canvas().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_falls_back_to_stale_cache() {
        let age = Duration::from_secs(5 * 24 * 3600);
        let store = MemoryStore::default().with("opolskie", roads("opolskie"), age, false);
        let coordinator = coordinator(Err(timeout()), store);

        let outcome = coordinator.refresh_region(&RegionKey::new("opolskie")).await;

        match outcome {
            RefreshOutcome::StaleFallback {
                kind, age: got, counts, ..
            } => {
                assert_eq!(kind, FailureKind::Timeout);
                assert_eq!(got, age);
                assert_eq!(counts.total, 2);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(coordinator.render().canvas().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_failure_falls_back_to_fresh_cache() {
        let age = Duration::from_secs(2 * 3600);
        let store = MemoryStore::default().with("opolskie", roads("opolskie"), age, true);
        let coordinator = coordinator(Err(timeout()), store);

        let outcome = coordinator.refresh_region(&RegionKey::new("opolskie")).await;

        assert!(matches!(
            outcome,
            RefreshOutcome::StaleFallback {
                kind: FailureKind::Timeout,
                age: got,
                ..
            } if got == age
        ));
        assert_eq!(coordinator.render().canvas().len(), 2);
        assert!(!coordinator.is_loading());
    }

    #[tokio::test]
    async fn test_refresh_failure_without_cache() {
        let coordinator = coordinator(Err(timeout()), MemoryStore::default());

        let outcome = coordinator.refresh_region(&RegionKey::new("opolskie")).await;

        match outcome {
            RefreshOutcome::Failed { kind, message, .. } => {
                assert_eq!(kind, FailureKind::Timeout);
                assert_eq!(message, FailureKind::Timeout.message());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!coordinator.is_loading());
    }

    #[tokio::test]
    async fn test_refresh_is_not_reentrant() {
        let gate = Arc::new(Notify::new());
        let coordinator = Arc::new(Coordinator::new(
            StubSource {
                result: Ok(roads("opolskie")),
                gate: Some(gate.clone()),
            },
            Box::new(MemoryStore::accepting()) as Box<dyn RegionStore>,
            RenderEngine::new(RecordingCanvas::new(), RenderConfig::default()),
        ));

        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .refresh_region(&RegionKey::new("opolskie"))
                    .await
            })
        };

        while !coordinator.is_loading() {
            tokio::task::yield_now().await;
        }

        let second = coordinator.refresh_region(&RegionKey::new("opolskie")).await;
        assert_eq!(second, RefreshOutcome::Rejected);

        gate.notify_one();
        let first = first.await.unwrap();
        assert!(first.is_success());
        assert!(!coordinator.is_loading());
    }

    #[tokio::test]
    async fn test_submit_edit_through_coordinator() {
        let store =
            MemoryStore::default().with("opolskie", roads("opolskie"), Duration::ZERO, true);
        let coordinator = coordinator(Err(timeout()), store);
        coordinator.load_region(&RegionKey::new("opolskie"));
        let gateway = MockGateway::succeeding(9);

        let receipt = coordinator
            .submit_edit(&gateway, &StaticToken::new("tok"), 2, "excellent")
            .await
            .unwrap();

        assert_eq!(receipt.new_version, 9);
        assert_eq!(coordinator.render().counts().excellent, 1);
        assert_eq!(coordinator.render().counts().unknown, 0);
    }
}
