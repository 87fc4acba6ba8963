//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use super::size::parse_size;

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a number, mapping failures to [`ConfigFileError::InvalidValue`].
fn parse_num<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [overpass] section
    if let Some(section) = ini.section(Some("overpass")) {
        if let Some(v) = section.get("endpoints") {
            let endpoints: Vec<String> = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if endpoints.is_empty() {
                return Err(invalid(
                    "overpass",
                    "endpoints",
                    v,
                    "at least one endpoint URL is required",
                ));
            }
            if let Some(bad) = endpoints
                .iter()
                .find(|e| !e.starts_with("http://") && !e.starts_with("https://"))
            {
                return Err(invalid(
                    "overpass",
                    "endpoints",
                    bad,
                    "must be an http:// or https:// URL",
                ));
            }
            config.overpass.endpoints = endpoints;
        }
        if let Some(v) = section.get("attempts_per_endpoint") {
            let attempts: u32 = parse_num(
                "overpass",
                "attempts_per_endpoint",
                v,
                "must be a positive integer",
            )?;
            if attempts == 0 {
                return Err(invalid(
                    "overpass",
                    "attempts_per_endpoint",
                    v,
                    "must be at least 1",
                ));
            }
            config.overpass.attempts_per_endpoint = attempts;
        }
        if let Some(v) = section.get("retry_delay_ms") {
            config.overpass.retry_delay_ms = parse_num(
                "overpass",
                "retry_delay_ms",
                v,
                "must be a non-negative integer (milliseconds)",
            )?;
        }
        if let Some(v) = section.get("request_timeout_secs") {
            config.overpass.request_timeout_secs = parse_num(
                "overpass",
                "request_timeout_secs",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
        if let Some(v) = section.get("server_timeout_secs") {
            config.overpass.server_timeout_secs = parse_num(
                "overpass",
                "server_timeout_secs",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
        if config.overpass.request_timeout_secs <= config.overpass.server_timeout_secs {
            return Err(invalid(
                "overpass",
                "request_timeout_secs",
                &config.overpass.request_timeout_secs.to_string(),
                &format!(
                    "must exceed server_timeout_secs ({})",
                    config.overpass.server_timeout_secs
                ),
            ));
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("max_age_days") {
            let days: u64 =
                parse_num("cache", "max_age_days", v, "must be a positive integer (days)")?;
            if days == 0 {
                return Err(invalid("cache", "max_age_days", v, "must be at least 1"));
            }
            config.cache.max_age_days = days;
        }
        if let Some(v) = section.get("quota") {
            config.cache.quota = parse_size(v).map_err(|_| {
                invalid("cache", "quota", v, "expected format like '256MB', '1GB', or '512KB'")
            })?;
        }
    }

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        if let Some(v) = section.get("min_visible_zoom") {
            config.map.min_visible_zoom =
                parse_num("map", "min_visible_zoom", v, "must be a number")?;
        }
        if let Some(v) = section.get("fade_start_zoom") {
            config.map.fade_start_zoom =
                parse_num("map", "fade_start_zoom", v, "must be a number")?;
        }
        if let Some(v) = section.get("fade_span") {
            let span: f64 = parse_num("map", "fade_span", v, "must be a number")?;
            if span <= 0.0 {
                return Err(invalid("map", "fade_span", v, "must be greater than 0"));
            }
            config.map.fade_span = span;
        }
        if let Some(v) = section.get("min_opacity") {
            let opacity: f64 = parse_num("map", "min_opacity", v, "must be a number")?;
            if !(0.0..=1.0).contains(&opacity) {
                return Err(invalid("map", "min_opacity", v, "must be between 0 and 1"));
            }
            config.map.min_opacity = opacity;
        }
    }

    // [osm] section
    if let Some(section) = ini.section(Some("osm")) {
        if let Some(v) = section.get("api_url") {
            let v = v.trim();
            if !v.is_empty() {
                config.osm.api_url = v.trim_end_matches('/').to_string();
            }
        }
        if let Some(v) = section.get("access_token") {
            let v = v.trim();
            if !v.is_empty() {
                config.osm.access_token = Some(v.to_string());
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Expand a leading `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    fn assert_invalid(result: Result<ConfigFile, ConfigFileError>, expected_key: &str) {
        match result {
            Err(ConfigFileError::InvalidValue { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected invalid {}, got {:?}", expected_key, other),
        }
    }

    #[test]
    fn test_overpass_section() {
        let config = load(
            r#"
[overpass]
endpoints = https://a.test/api/interpreter, https://b.test/api/interpreter
attempts_per_endpoint = 3
retry_delay_ms = 500
request_timeout_secs = 200
server_timeout_secs = 180
"#,
        )
        .unwrap();

        assert_eq!(
            config.overpass.endpoints,
            vec![
                "https://a.test/api/interpreter".to_string(),
                "https://b.test/api/interpreter".to_string()
            ]
        );
        assert_eq!(config.overpass.attempts_per_endpoint, 3);
        assert_eq!(config.overpass.retry_delay_ms, 500);
        assert_eq!(config.overpass.request_timeout_secs, 200);
        assert_eq!(config.overpass.server_timeout_secs, 180);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = load("[cache]\nmax_age_days = 7\n").unwrap();
        let defaults = ConfigFile::default();

        assert_eq!(config.cache.max_age_days, 7);
        assert_eq!(config.cache.quota, defaults.cache.quota);
        assert_eq!(config.overpass, defaults.overpass);
    }

    #[test]
    fn test_timeout_must_exceed_server_timeout() {
        assert_invalid(
            load("[overpass]\nrequest_timeout_secs = 60\n"),
            "request_timeout_secs",
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_invalid(load("[overpass]\nendpoints = ,\n"), "endpoints");
        assert_invalid(load("[overpass]\nendpoints = ftp://x\n"), "endpoints");
        assert_invalid(load("[overpass]\nattempts_per_endpoint = 0\n"), "attempts_per_endpoint");
        assert_invalid(load("[overpass]\nretry_delay_ms = soon\n"), "retry_delay_ms");
        assert_invalid(load("[cache]\nmax_age_days = 0\n"), "max_age_days");
        assert_invalid(load("[cache]\nquota = lots\n"), "quota");
        assert_invalid(load("[map]\nmin_opacity = 2\n"), "min_opacity");
        assert_invalid(load("[map]\nfade_span = 0\n"), "fade_span");
    }

    #[test]
    fn test_cache_and_map_sections() {
        let config = load(
            r#"
[cache]
directory = /var/cache/asphalt
quota = 64MB

[map]
min_visible_zoom = 6
fade_start_zoom = 7.5
min_opacity = 0.2
"#,
        )
        .unwrap();

        assert_eq!(config.cache.directory, PathBuf::from("/var/cache/asphalt"));
        assert_eq!(config.cache.quota, 64 * 1024 * 1024);
        assert_eq!(config.map.min_visible_zoom, 6.0);
        assert_eq!(config.map.fade_start_zoom, 7.5);
        assert_eq!(config.map.min_opacity, 0.2);
    }

    #[test]
    fn test_osm_and_logging_sections() {
        let config = load(
            r#"
[osm]
api_url = https://api.openstreetmap.org/
access_token =

[logging]
file = /tmp/asphalt-test.log
"#,
        )
        .unwrap();

        assert_eq!(config.osm.api_url, "https://api.openstreetmap.org");
        assert!(config.osm.access_token.is_none());
        assert_eq!(config.logging.file, PathBuf::from("/tmp/asphalt-test.log"));
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/cache"), home.join("cache"));
            assert_eq!(expand_tilde("~"), home);
        }
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
