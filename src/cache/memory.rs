//! In-process cache with per-entry expiry.

use ahash::AHashMap;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::cache::ResultCache;
use crate::error::Result;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Thread-safe in-memory [`ResultCache`].
///
/// Expired entries are dropped when read, swept on every write, or removed
/// in bulk by [`MemoryCache::purge_expired`]. Memory use is therefore bounded
/// by the entries written within one TTL window.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<AHashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `key`. Returns whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    /// Whether a live entry exists for `key`.
    pub fn exists(&self, key: &str) -> bool {
        let now = Utc::now();
        self.entries
            .lock()
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    fn insert(&self, key: &str, value: &str, expires_at: Option<DateTime<Utc>>) {
        let now = Utc::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| !entry.is_expired(now));
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Utc::now();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool> {
        // A TTL too large to represent never expires.
        let expires_at = if ttl_secs == 0 {
            None
        } else {
            i64::try_from(ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        };
        self.insert(key, value, expires_at);
        Ok(true)
    }
}
