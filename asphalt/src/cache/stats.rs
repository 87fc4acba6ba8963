//! Cache statistics and human-readable formatting.

use std::time::Duration;

use crate::region::RegionKey;

/// Per-entry statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryStats {
    pub key: RegionKey,
    pub timestamp: i64,
    pub age: Duration,
    pub expired: bool,
    pub bytes: u64,
    /// `None` when the entry could not be decoded
    pub features: Option<usize>,
    pub format_version: String,
}

/// Snapshot of the cache contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Entries sorted oldest first
    pub entries: Vec<EntryStats>,
    pub total_bytes: u64,
    pub quota_bytes: usize,
}

impl CacheStats {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn oldest(&self) -> Option<&EntryStats> {
        self.entries.first()
    }

    pub fn newest(&self) -> Option<&EntryStats> {
        self.entries.last()
    }

    pub fn expired_count(&self) -> usize {
        self.entries.iter().filter(|e| e.expired).count()
    }

    /// Fraction of the quota in use (0.0 to 1.0+).
    pub fn usage(&self) -> f64 {
        if self.quota_bytes == 0 {
            0.0
        } else {
            self.total_bytes as f64 / self.quota_bytes as f64
        }
    }
}

/// Age as `"2d 3h"`, `"4h 12m"` or `"7m"`.
pub fn format_age(age: Duration) -> String {
    let total_minutes = age.as_secs() / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 24 {
        format!("{}d {}h", hours / 24, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Byte count with one decimal, e.g. `"1.5 MB"`.
pub fn format_data_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;

    #[test]
    fn test_format_age_minutes() {
        assert_eq!(format_age(Duration::from_secs(0)), "0m");
        assert_eq!(format_age(Duration::from_secs(7 * MINUTE + 30)), "7m");
    }

    #[test]
    fn test_format_age_hours() {
        assert_eq!(format_age(Duration::from_secs(4 * HOUR + 12 * MINUTE)), "4h 12m");
        assert_eq!(format_age(Duration::from_secs(24 * HOUR)), "24h 0m");
    }

    #[test]
    fn test_format_age_days() {
        assert_eq!(format_age(Duration::from_secs(51 * HOUR)), "2d 3h");
    }

    #[test]
    fn test_format_data_size() {
        assert_eq!(format_data_size(0), "0 B");
        assert_eq!(format_data_size(512), "512 B");
        assert_eq!(format_data_size(1024), "1 KB");
        assert_eq!(format_data_size(1536), "1.5 KB");
        assert_eq!(format_data_size(5 * 1024 * 1024), "5 MB");
    }

    #[test]
    fn test_oldest_newest() {
        let entry = |key: &str, ts: i64| EntryStats {
            key: RegionKey::new(key),
            timestamp: ts,
            age: Duration::ZERO,
            expired: false,
            bytes: 10,
            features: Some(1),
            format_version: "2.0".to_string(),
        };
        let stats = CacheStats {
            entries: vec![entry("a", 1), entry("b", 2)],
            total_bytes: 20,
            quota_bytes: 100,
        };
        assert_eq!(stats.oldest().unwrap().key.as_str(), "a");
        assert_eq!(stats.newest().unwrap().key.as_str(), "b");
        assert!((stats.usage() - 0.2).abs() < f64::EPSILON);
    }
}
