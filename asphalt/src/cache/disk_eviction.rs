//! Oldest-half eviction used when a write would exceed the quota.
//!
//! Entries are ordered by their recorded write timestamp, not file mtime, so
//! a copied or restored cache directory still evicts in logical order.
//! Entries whose header cannot be read sort first.

use std::path::PathBuf;

use tracing::{debug, info};

/// A cache file found on disk.
#[derive(Debug, Clone)]
pub(crate) struct StoredFile {
    pub path: PathBuf,
    /// Region key derived from the file name
    pub key: String,
    pub bytes: u64,
    /// Write timestamp from the entry header, if readable
    pub timestamp: Option<i64>,
}

/// Result of an eviction run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvictionResult {
    /// Region keys whose entries were deleted
    pub evicted: Vec<String>,
    pub bytes_freed: u64,
}

impl EvictionResult {
    pub fn entries_deleted(&self) -> usize {
        self.evicted.len()
    }
}

/// Number of entries to evict from `count`: half, rounded up, at least one.
pub(crate) fn eviction_count(count: usize) -> usize {
    if count == 0 {
        0
    } else {
        count.div_ceil(2)
    }
}

/// Delete the oldest half of `files`, never touching `keep`.
pub(crate) fn evict_oldest_half(mut files: Vec<StoredFile>, keep: &str) -> EvictionResult {
    files.retain(|f| f.key != keep);
    files.sort_by_key(|f| f.timestamp.unwrap_or(i64::MIN));

    let target = eviction_count(files.len());
    let mut result = EvictionResult::default();

    for file in files.into_iter().take(target) {
        match std::fs::remove_file(&file.path) {
            Ok(()) => {
                result.bytes_freed += file.bytes;
                result.evicted.push(file.key);
            }
            Err(e) => {
                debug!(
                    path = %file.path.display(),
                    error = %e,
                    "Failed to delete cache entry during eviction"
                );
            }
        }
    }

    info!(
        entries_deleted = result.entries_deleted(),
        bytes_freed = result.bytes_freed,
        "Evicted oldest cache entries"
    );

    result
}
