//! Asphalt - road surface quality for Polish voivodeships
//!
//! This library fetches tertiary and unclassified roads for one region at a
//! time from the Overpass API, caches them on disk, and reconciles them onto
//! a map surface styled by their OpenStreetMap `smoothness` tag. A single
//! road's smoothness can be corrected through the OpenStreetMap API.
//!
//! # High-Level API
//!
//! The [`coordinator`] module ties the pieces together:
//!
//! ```ignore
//! use asphalt::cache::RegionCache;
//! use asphalt::coordinator::Coordinator;
//! use asphalt::overpass::{FetcherConfig, RegionFetcher, ReqwestTransport};
//! use asphalt::render::{RecordingCanvas, RenderConfig, RenderEngine};
//!
//! let fetcher = RegionFetcher::new(ReqwestTransport::new(&user_agent)?, FetcherConfig::default());
//! let cache = RegionCache::open(config.cache_config())?;
//! let engine = RenderEngine::new(RecordingCanvas::new(), RenderConfig::default());
//! let coordinator = Coordinator::new(fetcher, Box::new(cache), engine);
//!
//! let outcome = coordinator.refresh_region(&"opolskie".into()).await;
//! println!("{}", outcome.message());
//! ```

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod logging;
pub mod osm;
pub mod overpass;
pub mod region;
pub mod render;
pub mod road;

/// Version of the Asphalt library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent to Overpass and the OpenStreetMap API.
pub fn user_agent() -> String {
    format!("AsphaltPremium/{}", VERSION)
}
