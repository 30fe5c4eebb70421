//! TTL Cache Module
//!
//! Advisory key -> value cache with per-entry expiry. Expired entries are
//! dropped lazily on the read that discovers them; `cleanup_expired` lets a
//! background task reclaim the rest.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::cache::stats::CacheCounters;
use crate::cache::{CacheEntry, CacheStats};

// == TTL Cache ==
/// Concurrent cache whose entries expire after a caller-chosen TTL.
///
/// Never returns an error: every outcome is found or not found. Callers must
/// treat a miss as "ask the store".
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    counters: CacheCounters,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            counters: CacheCounters::default(),
        }
    }

    // == Get ==
    /// Returns a copy of the live value under `key`.
    ///
    /// An expired entry is reported exactly like an absent one and is
    /// removed during this call.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired_at(Instant::now()) => {
                    self.counters.record_hit();
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    self.counters.record_miss();
                    return None;
                }
            }
        }

        // Re-check under the write lock: a concurrent `set` may have
        // refreshed the entry since the read lock was released.
        let mut entries = self.entries.write();
        if entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(Instant::now()))
        {
            entries.remove(key);
            self.counters.record_expirations(1);
        }
        self.counters.record_miss();
        None
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and its expiry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = CacheEntry::new(value, ttl);
        self.entries.write().insert(key.into(), entry);
    }

    // == Invalidate ==
    /// Removes the entry under `key`; a no-op if there is none.
    pub fn invalidate(&self, key: &str) {
        if self.entries.write().remove(key).is_some() {
            self.counters.record_invalidation();
        }
    }

    // == Cleanup Expired ==
    /// Removes every expired entry. Returns the number removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();

        self.counters.record_expirations(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.len())
    }

    // == Length ==
    /// Number of stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
