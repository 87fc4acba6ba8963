//! Region data fetcher backed by the Overpass API.
//!
//! Builds a per-region Overpass QL query, runs it against a prioritized list
//! of interpreter endpoints with retry and failover, and normalizes the
//! returned ways into [`RoadFeature`](crate::road::RoadFeature)s.

mod config;
mod error;
mod fetcher;
mod query;
mod response;
mod transport;

pub use config::{
    FetcherConfig, DEFAULT_ATTEMPTS_PER_ENDPOINT, DEFAULT_ENDPOINTS, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_RETRY_DELAY, DEFAULT_SERVER_TIMEOUT_SECS,
};
pub use error::FetchError;
pub use fetcher::{EndpointStatus, RegionFetcher, RegionSource};
pub use query::{build_region_query, ROAD_CLASSES};
pub use response::{to_feature, to_features, OverpassElement, OverpassResponse};
pub use transport::{OverpassTransport, ReqwestTransport, TransportError, TransportResponse};
