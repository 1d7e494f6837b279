//! In-memory TTL cache for serialized operation results.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lyrion_core::constants::DEFAULT_CACHE_TTL_SECS;

/// Cache entry with its insertion time.
#[derive(Clone)]
struct CacheEntry {
    value: String,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() >= ttl
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live of every entry, in seconds
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// In-memory cache of serialized results.
///
/// Entries are only visible while younger than the TTL. Stale entries are
/// dropped lazily by the `get` that finds them; nothing sweeps in the
/// background. There is no size bound, so a long-lived process grows with
/// the number of distinct keys it has seen within one TTL.
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Creates a new cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_ttl(Duration::from_secs(config.ttl_seconds))
    }

    /// Creates a cache with an explicit TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Gets a cached value.
    ///
    /// Returns None if not cached. An expired entry is removed and reported
    /// as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.write();

        match entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                debug!(key, "Dropped expired cache entry");
                None
            }
            None => None,
        }
    }

    /// Stores a value, replacing any previous entry and restarting its TTL.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(
            key.into(),
            CacheEntry {
                value: value.into(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Removes a cached entry.
    pub fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Returns the number of stored entries, expired ones included until a
    /// lookup drops them.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.len(),
            cache_ttl: self.ttl.as_secs(),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Stored entries
    pub total_entries: usize,
    /// TTL in seconds
    pub cache_ttl: u64,
}
