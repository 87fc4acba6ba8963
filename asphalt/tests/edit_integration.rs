//! Integration tests for smoothness edits through the coordinator.
//!
//! The real `OsmApiClient` runs against an in-process API double so the
//! whole read → changeset → write → close sequence is exercised together
//! with the optimistic display update.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use asphalt::cache::{CacheConfig, ManualClock, RegionCache};
use asphalt::coordinator::Coordinator;
use asphalt::osm::{
    ApiMethod, ApiRequest, ApiResponse, ApiTransport, EditError, OsmApiClient, OsmApiConfig,
    StaticToken,
};
use asphalt::overpass::{FetchError, RegionSource};
use asphalt::region::RegionKey;
use asphalt::render::{RecordingCanvas, RenderConfig, RenderEngine};
use asphalt::road::{LatLon, QualityBucket, RegionFeatureCollection, RoadFeature};
use parking_lot::Mutex;
use tempfile::TempDir;

const API: &str = "https://api.test";

const WAY_77: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="test">
  <way id="77" version="3" changeset="100">
    <nd ref="1"/>
    <nd ref="2"/>
    <tag k="highway" v="tertiary"/>
    <tag k="smoothness" v="bad"/>
  </way>
</osm>"#;

/// API double answering from a queue and recording every request.
///
/// Clones share state, so the test keeps one handle while the client owns
/// another.
#[derive(Clone, Default)]
struct FakeOsmApi {
    responses: Arc<Mutex<VecDeque<ApiResponse>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl FakeOsmApi {
    fn then(self, response: ApiResponse) -> Self {
        self.responses.lock().push_back(response);
        self
    }
}

impl ApiTransport for FakeOsmApi {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, EditError> {
        self.requests.lock().push(request);
        Ok(self.responses.lock().pop_front().unwrap_or(ApiResponse {
            status: 500,
            body: "unexpected request".to_string(),
        }))
    }
}

/// Source that always returns the same collection.
struct FixedSource(RegionFeatureCollection);

impl RegionSource for FixedSource {
    async fn fetch_region(&self, _key: &RegionKey) -> Result<RegionFeatureCollection, FetchError> {
        Ok(self.0.clone())
    }
}

fn region() -> RegionKey {
    RegionKey::new("opolskie")
}

fn collection() -> RegionFeatureCollection {
    let line = |lat: f64| vec![LatLon::new(lat, 17.9), LatLon::new(lat + 0.01, 17.95)];
    RegionFeatureCollection::new(
        region(),
        vec![
            RoadFeature::new(77, line(50.6), "tertiary")
                .with_smoothness("bad")
                .with_version(3),
            RoadFeature::new(78, line(50.7), "unclassified"),
        ],
    )
}

fn coordinator(dir: &TempDir) -> Coordinator<FixedSource, RecordingCanvas> {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let cache = RegionCache::open_with_clock(
        CacheConfig::default().with_cache_dir(dir.path().to_path_buf()),
        clock,
    )
    .unwrap();
    Coordinator::new(
        FixedSource(collection()),
        Box::new(cache),
        RenderEngine::new(RecordingCanvas::new(), RenderConfig::default()),
    )
}

fn client(api: &FakeOsmApi) -> OsmApiClient<FakeOsmApi> {
    OsmApiClient::new(
        api.clone(),
        OsmApiConfig::default()
            .with_api_url(API)
            .with_timeout(Duration::from_secs(5)),
    )
}

#[tokio::test]
async fn test_edit_updates_server_and_display() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(&dir);
    assert!(coordinator.refresh_region(&region()).await.is_success());

    let api = FakeOsmApi::default()
        .then(ApiResponse::ok(WAY_77))
        .then(ApiResponse::ok("9001"))
        .then(ApiResponse::ok("4"))
        .then(ApiResponse::ok(""));
    let tokens = StaticToken::new("secret-token");

    let receipt = coordinator
        .submit_edit(&client(&api), &tokens, 77, "excellent")
        .await
        .unwrap();

    assert_eq!(receipt.old_smoothness.as_deref(), Some("bad"));
    assert_eq!(receipt.new_version, 4);
    assert_eq!(receipt.changeset_id, 9001);

    let requests = api.requests.lock().clone();
    let methods: Vec<ApiMethod> = requests.iter().map(|r| r.method).collect();
    assert_eq!(
        methods,
        vec![ApiMethod::Get, ApiMethod::Put, ApiMethod::Put, ApiMethod::Put]
    );
    assert_eq!(requests[0].url, format!("{}/api/0.6/way/77", API));
    assert!(requests.iter().all(|r| r.token == "secret-token"));
    assert!(requests[1]
        .body
        .as_deref()
        .unwrap()
        .contains("Updated smoothness from bad to excellent"));

    let render = coordinator.render();
    let edited = render.feature(77).unwrap();
    assert_eq!(edited.smoothness.as_deref(), Some("excellent"));
    assert_eq!(edited.version, Some(4));
    assert_eq!(edited.quality_bucket(), QualityBucket::Excellent);
    assert_eq!(render.counts().excellent, 1);
    assert_eq!(render.counts().poor, 0);

    // The cached copy still holds the fetched value.
    let cached = coordinator.store().get(&region()).unwrap();
    assert_eq!(
        cached.feature(77).unwrap().smoothness.as_deref(),
        Some("bad")
    );
}

#[tokio::test]
async fn test_rejected_write_leaves_display_unchanged() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(&dir);
    assert!(coordinator.refresh_region(&region()).await.is_success());

    let api = FakeOsmApi::default()
        .then(ApiResponse::ok(WAY_77))
        .then(ApiResponse::ok("9002"))
        .then(ApiResponse {
            status: 409,
            body: "Version mismatch: Provided 3, server had: 4".to_string(),
        })
        .then(ApiResponse::ok(""));
    let tokens = StaticToken::new("secret-token");

    let err = coordinator
        .submit_edit(&client(&api), &tokens, 77, "good")
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    let requests = api.requests.lock().clone();
    assert_eq!(
        requests.last().unwrap().url,
        format!("{}/api/0.6/changeset/9002/close", API)
    );
    assert_eq!(
        coordinator.render().feature(77).unwrap().smoothness.as_deref(),
        Some("bad")
    );
}

#[tokio::test]
async fn test_edit_without_token_never_calls_api() {
    let dir = TempDir::new().unwrap();
    let coordinator = coordinator(&dir);
    assert!(coordinator.refresh_region(&region()).await.is_success());

    let api = FakeOsmApi::default();

    let err = coordinator
        .submit_edit(&client(&api), &StaticToken::none(), 77, "good")
        .await
        .unwrap_err();

    assert_eq!(err, EditError::Unauthenticated);
    assert!(api.requests.lock().is_empty());
}
