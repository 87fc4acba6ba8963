//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;
use super::size::format_size;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let endpoints = config.overpass.endpoints.join(", ");
    let access_token = config.osm.access_token.as_deref().unwrap_or("");

    format!(
        r#"[overpass]
; Overpass interpreter URLs, tried in order. On repeated failure the next
; endpoint is used.
endpoints = {}
; Attempts per endpoint before failing over (default: 2)
attempts_per_endpoint = {}
; Pause between attempts on the same endpoint, in milliseconds (default: 3000)
retry_delay_ms = {}
; Client-side deadline per request in seconds (default: 95)
; Must be larger than server_timeout_secs.
request_timeout_secs = {}
; Server-side query timeout in seconds (default: 90)
server_timeout_secs = {}

[cache]
; Directory holding one JSON file per region
directory = {}
; Entries older than this are discarded on read (default: 3)
max_age_days = {}
; Total bytes the cache may occupy (default: 256MB)
; Supports: KB, MB, GB suffixes (e.g., 64MB, 1GB)
quota = {}

[map]
; Below this zoom level roads are hidden (default: 7)
min_visible_zoom = {}
; Zoom level where fading begins (default: 8)
fade_start_zoom = {}
; Zoom levels over which opacity fades to its floor (default: 4)
fade_span = {}
; Lowest opacity while fading, 0.0 - 1.0 (default: 0.3)
min_opacity = {}

[osm]
; OpenStreetMap API base URL
;   https://master.apis.dev.openstreetmap.org - development server (default)
;   https://api.openstreetmap.org             - production
api_url = {}
; OAuth2 bearer token for edits. Leave empty to use ASPHALT_OSM_TOKEN.
access_token = {}

[logging]
; Log file location
file = {}
"#,
        endpoints,
        config.overpass.attempts_per_endpoint,
        config.overpass.retry_delay_ms,
        config.overpass.request_timeout_secs,
        config.overpass.server_timeout_secs,
        path_to_string(&config.cache.directory),
        config.cache.max_age_days,
        format_size(config.cache.quota),
        config.map.min_visible_zoom,
        config.map.fade_start_zoom,
        config.map.fade_span,
        config.map.min_opacity,
        config.osm.api_url,
        access_token,
        path_to_string(&config.logging.file),
    )
}

/// Convert a path to string, replacing home directory with ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
