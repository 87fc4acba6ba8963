//! Durable per-region cache of fetched road collections.
//!
//! One JSON file per region, expiry by write timestamp, and a storage quota
//! that is recovered by evicting the oldest half of the entries.

mod clock;
mod disk;
mod disk_eviction;
mod stats;
mod r#trait;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use disk::RegionCache;
pub use disk_eviction::EvictionResult;
pub use r#trait::{NoOpStore, RegionStore};
pub use stats::{format_age, format_data_size, CacheStats, EntryStats};
pub use types::{
    CacheConfig, CacheEntry, CacheError, DEFAULT_MAX_AGE_DAYS, DEFAULT_QUOTA_BYTES, FORMAT_VERSION,
};
