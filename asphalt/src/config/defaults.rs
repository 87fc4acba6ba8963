//! Default values and the `ConfigFile::default()` implementation.
//!
//! Component defaults are owned by their modules; this file only maps
//! them onto the settings sections.

use super::file::config_directory;
use super::settings::*;
use crate::cache::{CacheConfig, DEFAULT_MAX_AGE_DAYS, DEFAULT_QUOTA_BYTES};
use crate::osm::DEV_API_URL;
use crate::overpass::{
    DEFAULT_ATTEMPTS_PER_ENDPOINT, DEFAULT_ENDPOINTS, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRY_DELAY,
    DEFAULT_SERVER_TIMEOUT_SECS,
};
use crate::render::{
    DEFAULT_FADE_SPAN, DEFAULT_FADE_START_ZOOM, DEFAULT_MIN_OPACITY, DEFAULT_MIN_VISIBLE_ZOOM,
};

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "asphalt.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            overpass: OverpassSettings {
                endpoints: DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
                attempts_per_endpoint: DEFAULT_ATTEMPTS_PER_ENDPOINT,
                retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
                server_timeout_secs: DEFAULT_SERVER_TIMEOUT_SECS,
            },
            cache: CacheSettings {
                directory: CacheConfig::default().cache_dir,
                max_age_days: DEFAULT_MAX_AGE_DAYS,
                quota: DEFAULT_QUOTA_BYTES,
            },
            map: MapSettings {
                min_visible_zoom: DEFAULT_MIN_VISIBLE_ZOOM,
                fade_start_zoom: DEFAULT_FADE_START_ZOOM,
                fade_span: DEFAULT_FADE_SPAN,
                min_opacity: DEFAULT_MIN_OPACITY,
            },
            osm: OsmSettings {
                api_url: DEV_API_URL.to_string(),
                access_token: None,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
