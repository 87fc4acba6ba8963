//! File-backed region cache with expiry and quota recovery.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::disk_eviction::{evict_oldest_half, StoredFile};
use super::stats::{format_age, format_data_size, CacheStats, EntryStats};
use super::r#trait::RegionStore;
use super::types::{CacheConfig, CacheEntry, CacheError, EntryHeader, FORMAT_VERSION};
use crate::region::RegionKey;
use crate::road::RegionFeatureCollection;

const ENTRY_EXTENSION: &str = "json";

/// Durable per-region storage of the latest fetched collection.
///
/// Each region lives in `<cache_dir>/<key>.json`. Expiry is checked on
/// read; unreadable entries are deleted where they are found.
pub struct RegionCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    /// Serializes writers so quota accounting sees a stable directory
    write_lock: Mutex<()>,
    /// Entries removed by the sweep in `open`
    swept_on_open: usize,
}

impl RegionCache {
    /// Open the cache, creating the directory and sweeping expired entries.
    pub fn open(config: CacheConfig) -> Result<Self, CacheError> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Open the cache with an injected clock.
    pub fn open_with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self, CacheError> {
        fs::create_dir_all(&config.cache_dir)?;

        let mut cache = Self {
            config,
            clock,
            write_lock: Mutex::new(()),
            swept_on_open: 0,
        };

        cache.swept_on_open = cache.sweep_expired();
        info!(
            cache_dir = %cache.config.cache_dir.display(),
            swept = cache.swept_on_open,
            "Region cache opened"
        );

        Ok(cache)
    }

    /// Number of expired entries removed when the cache was opened.
    pub fn swept_on_open(&self) -> usize {
        self.swept_on_open
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn cache_dir(&self) -> &Path {
        &self.config.cache_dir
    }

    /// Path of the entry file for `key`.
    pub fn entry_path(&self, key: &RegionKey) -> PathBuf {
        self.config
            .cache_dir
            .join(format!("{}.{}", file_stem(key.as_str()), ENTRY_EXTENSION))
    }

    /// Fresh collection for `key`.
    ///
    /// An entry older than the configured max age is deleted and reported
    /// as absent. An entry exactly at the boundary is still valid.
    pub fn get(&self, key: &RegionKey) -> Option<RegionFeatureCollection> {
        let (entry, age_ms) = self.read_valid(key)?;

        if age_ms > self.config.max_age_millis() {
            debug!(region = %key, age_ms = age_ms, "Cache entry expired, removing");
            self.delete_file(key);
            return None;
        }

        info!(
            region = %key,
            features = entry.data.features.len(),
            age = %format_age(millis_to_duration(age_ms)),
            "Cache hit"
        );
        Some(entry.data)
    }

    /// Readable collection for `key` regardless of age.
    pub fn get_any(&self, key: &RegionKey) -> Option<(RegionFeatureCollection, Duration)> {
        self.read_valid(key)
            .map(|(entry, age_ms)| (entry.data, millis_to_duration(age_ms)))
    }

    /// Whether a fresh entry exists. Expired entries are removed as a side effect.
    pub fn has(&self, key: &RegionKey) -> bool {
        self.get(key).is_some()
    }

    /// Persist `collection` with the current timestamp.
    ///
    /// When the write would exceed the quota or the disk is full, the oldest
    /// half of the other entries is evicted and the write retried once.
    /// Never fails loudly.
    pub fn set(&self, key: &RegionKey, collection: &RegionFeatureCollection) -> bool {
        let entry = CacheEntry::new(key.clone(), collection.clone(), self.clock.now_millis());
        let bytes = match encode_entry(&entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(region = %key, error = %e, "Cache write skipped");
                return false;
            }
        };

        let _guard = self.write_lock.lock();

        match self.write_entry(key, &bytes) {
            Ok(()) => {}
            Err(e) if e.is_out_of_space() => {
                warn!(region = %key, error = %e, "Cache full, evicting oldest entries");
                let files = match self.scan() {
                    Ok(files) => files,
                    Err(e) => {
                        warn!(error = %e, "Failed to scan cache for eviction");
                        return false;
                    }
                };
                evict_oldest_half(files, &file_stem(key.as_str()));

                if let Err(e) = self.write_entry(key, &bytes) {
                    warn!(region = %key, error = %e, "Cache write failed after eviction");
                    return false;
                }
            }
            Err(e) => {
                warn!(region = %key, error = %e, "Cache write failed");
                return false;
            }
        }

        info!(
            region = %key,
            features = collection.features.len(),
            size = %format_data_size(bytes.len() as u64),
            "Region cached"
        );
        true
    }

    /// Delete the entry for `key`, if present.
    pub fn remove(&self, key: &RegionKey) -> Result<(), CacheError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => {
                debug!(region = %key, "Cache entry removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every entry. Returns the number removed.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let _guard = self.write_lock.lock();
        let mut removed = 0;
        for file in self.scan()? {
            match fs::remove_file(&file.path) {
                Ok(()) => removed += 1,
                Err(e) => debug!(path = %file.path.display(), error = %e, "Failed to remove entry"),
            }
        }
        info!(removed = removed, "Region cache cleared");
        Ok(removed)
    }

    /// Delete every expired or unreadable entry. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        let files = match self.scan() {
            Ok(files) => files,
            Err(e) => {
                warn!(error = %e, "Failed to scan cache for expired entries");
                return 0;
            }
        };

        let now = self.clock.now_millis();
        let max_age = self.config.max_age_millis();
        let mut removed = 0;

        for file in files {
            let expired = match file.timestamp {
                Some(ts) => now.saturating_sub(ts) > max_age,
                None => true,
            };
            if expired && fs::remove_file(&file.path).is_ok() {
                debug!(region = %file.key, "Swept expired cache entry");
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed = removed, "Swept expired cache entries");
        }
        removed
    }

    /// Snapshot of every entry, oldest first.
    pub fn stats(&self) -> Result<CacheStats, CacheError> {
        let now = self.clock.now_millis();
        let max_age = self.config.max_age_millis();

        let mut entries: Vec<EntryStats> = self
            .scan()?
            .into_iter()
            .map(|file| {
                let full = fs::read(&file.path)
                    .ok()
                    .and_then(|b| serde_json::from_slice::<CacheEntry>(&b).ok());
                let timestamp = file.timestamp.unwrap_or(0);
                let age_ms = now.saturating_sub(timestamp);
                EntryStats {
                    key: RegionKey::new(file.key),
                    timestamp,
                    age: millis_to_duration(age_ms),
                    expired: age_ms > max_age,
                    bytes: file.bytes,
                    features: full.as_ref().map(|e| e.data.features.len()),
                    format_version: full
                        .map(|e| e.format_version)
                        .unwrap_or_else(|| "unknown".to_string()),
                }
            })
            .collect();
        entries.sort_by_key(|e| e.timestamp);

        Ok(CacheStats {
            total_bytes: entries.iter().map(|e| e.bytes).sum(),
            quota_bytes: self.config.quota_bytes,
            entries,
        })
    }

    /// Read and validate the entry for `key`, with its age in milliseconds.
    ///
    /// Corrupt entries are deleted and read as `None`.
    fn read_valid(&self, key: &RegionKey) -> Option<(CacheEntry, i64)> {
        match self.read_entry(key) {
            Ok(Some(entry)) => {
                let age_ms = self.clock.now_millis().saturating_sub(entry.timestamp);
                Some((entry, age_ms))
            }
            Ok(None) => None,
            Err(CacheError::Corrupt { key: k, reason }) => {
                warn!(region = %k, reason = %reason, "Dropping corrupt cache entry");
                self.delete_file(key);
                None
            }
            Err(e) => {
                warn!(region = %key, error = %e, "Failed to read cache entry");
                None
            }
        }
    }

    fn read_entry(&self, key: &RegionKey) -> Result<Option<CacheEntry>, CacheError> {
        let bytes = match fs::read(self.entry_path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let corrupt = |reason: String| CacheError::Corrupt {
            key: key.to_string(),
            reason,
        };

        let entry: CacheEntry =
            serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;

        if entry.format_version != FORMAT_VERSION {
            return Err(corrupt(format!(
                "unsupported format version '{}'",
                entry.format_version
            )));
        }
        if &entry.region_key != key {
            return Err(corrupt(format!(
                "entry belongs to region '{}'",
                entry.region_key
            )));
        }

        Ok(Some(entry))
    }

    /// Write `bytes` for `key`, enforcing the quota.
    fn write_entry(&self, key: &RegionKey, bytes: &[u8]) -> Result<(), CacheError> {
        let stem = file_stem(key.as_str());
        let used: u64 = self
            .scan()?
            .iter()
            .filter(|f| f.key != stem)
            .map(|f| f.bytes)
            .sum();
        let quota = self.config.quota_bytes;
        let available = quota.saturating_sub(usize::try_from(used).unwrap_or(usize::MAX));

        if bytes.len() > available {
            return Err(CacheError::QuotaExceeded {
                needed: bytes.len(),
                available,
                quota,
            });
        }

        let path = self.entry_path(key);
        let tmp = path.with_extension("tmp");
        let written = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn delete_file(&self, key: &RegionKey) {
        if let Err(e) = self.remove(key) {
            warn!(region = %key, error = %e, "Failed to delete cache entry");
        }
    }

    /// List entry files with their headers.
    fn scan(&self) -> Result<Vec<StoredFile>, CacheError> {
        let mut files = Vec::new();
        for dir_entry in fs::read_dir(&self.config.cache_dir)? {
            let dir_entry = dir_entry?;
            let path = dir_entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let bytes = dir_entry.metadata().map(|m| m.len()).unwrap_or(0);
            // A file holding another region's entry is treated as unreadable.
            let timestamp = fs::read(&path)
                .ok()
                .and_then(|b| serde_json::from_slice::<EntryHeader>(&b).ok())
                .filter(|h| h.format_version.as_deref() == Some(FORMAT_VERSION))
                .filter(|h| file_stem(h.region_key.as_str()) == key)
                .map(|h| h.timestamp);

            files.push(StoredFile {
                path,
                key,
                bytes,
                timestamp,
            });
        }
        Ok(files)
    }
}

impl RegionStore for RegionCache {
    fn get(&self, key: &RegionKey) -> Option<RegionFeatureCollection> {
        RegionCache::get(self, key)
    }

    fn get_any(&self, key: &RegionKey) -> Option<(RegionFeatureCollection, Duration)> {
        RegionCache::get_any(self, key)
    }

    fn set(&self, key: &RegionKey, collection: &RegionFeatureCollection) -> bool {
        RegionCache::set(self, key, collection)
    }

    fn remove(&self, key: &RegionKey) {
        self.delete_file(key);
    }
}

fn encode_entry(entry: &CacheEntry) -> Result<Vec<u8>, CacheError> {
    serde_json::to_vec(entry).map_err(|e| CacheError::Serialize(e.to_string()))
}

/// File-name-safe form of a region key.
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn millis_to_duration(ms: i64) -> Duration {
    Duration::from_millis(u64::try_from(ms).unwrap_or(0))
}
