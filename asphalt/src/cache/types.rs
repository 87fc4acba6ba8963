//! Core types for the region cache.

use crate::region::RegionKey;
use crate::road::RegionFeatureCollection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Storage format tag written into every entry.
pub const FORMAT_VERSION: &str = "2.0";

/// Default expiry window in days.
pub const DEFAULT_MAX_AGE_DAYS: u64 = 3;

/// Default storage quota (256 MB).
pub const DEFAULT_QUOTA_BYTES: usize = 256 * 1024 * 1024;

/// One persisted region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub region_key: RegionKey,
    pub data: RegionFeatureCollection,
    /// Write time, epoch milliseconds
    pub timestamp: i64,
    pub format_version: String,
}

impl CacheEntry {
    pub fn new(region_key: RegionKey, data: RegionFeatureCollection, timestamp: i64) -> Self {
        Self {
            region_key,
            data,
            timestamp,
            format_version: FORMAT_VERSION.to_string(),
        }
    }
}

/// Entry metadata without the feature payload.
///
/// Used by eviction and statistics so a scan does not have to materialize
/// every feature.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EntryHeader {
    pub region_key: RegionKey,
    pub timestamp: i64,
    #[serde(default)]
    pub format_version: Option<String>,
}

/// Cache-related errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry exists but cannot be used. Dropped on read.
    #[error("Corrupt cache entry for '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    /// Writing would exceed the storage quota
    #[error("Cache quota exceeded: need {needed} bytes, {available} available of {quota}")]
    QuotaExceeded {
        needed: usize,
        available: usize,
        quota: usize,
    },

    /// Entry could not be encoded
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(String),
}

impl CacheError {
    /// Whether freeing space could let the write succeed.
    ///
    /// Covers the configured quota and a full filesystem.
    pub fn is_out_of_space(&self) -> bool {
        match self {
            CacheError::QuotaExceeded { .. } => true,
            CacheError::Io(e) => e.kind() == std::io::ErrorKind::StorageFull,
            _ => false,
        }
    }
}

/// Region cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding one JSON file per region
    pub cache_dir: PathBuf,
    /// Entries older than this are expired
    pub max_age: Duration,
    /// Total bytes the cache may occupy
    pub quota_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("asphalt")
            .join("regions");

        Self {
            cache_dir,
            max_age: Duration::from_secs(DEFAULT_MAX_AGE_DAYS * 24 * 60 * 60),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

impl CacheConfig {
    /// Set cache directory.
    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = dir;
        self
    }

    /// Set expiry window.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Set expiry window in whole days.
    pub fn with_max_age_days(mut self, days: u64) -> Self {
        self.max_age = Duration::from_secs(days * 24 * 60 * 60);
        self
    }

    /// Set storage quota in bytes.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = bytes;
        self
    }

    pub(crate) fn max_age_millis(&self) -> i64 {
        i64::try_from(self.max_age.as_millis()).unwrap_or(i64::MAX)
    }
}
