//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub overpass: OverpassSettings,
    pub cache: CacheSettings,
    pub map: MapSettings,
    pub osm: OsmSettings,
    pub logging: LoggingSettings,
}

/// Overpass fetch settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassSettings {
    /// Interpreter URLs in failover order
    pub endpoints: Vec<String>,
    /// Tries per endpoint before failing over
    pub attempts_per_endpoint: u32,
    /// Pause between retries on the same endpoint
    pub retry_delay_ms: u64,
    /// Hard client-side deadline per attempt
    pub request_timeout_secs: u64,
    /// Server-side `[timeout:N]` written into the query
    pub server_timeout_secs: u64,
}

/// Region cache settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub directory: PathBuf,
    pub max_age_days: u64,
    /// Quota in bytes
    pub quota: usize,
}

/// Map display thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub min_visible_zoom: f64,
    pub fade_start_zoom: f64,
    pub fade_span: f64,
    pub min_opacity: f64,
}

/// OpenStreetMap API settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmSettings {
    pub api_url: String,
    /// Bearer token; falls back to the `ASPHALT_OSM_TOKEN` environment variable
    pub access_token: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
