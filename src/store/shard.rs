//! Shard Module
//!
//! One independently locked partition of the store's key space.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use parking_lot::RwLock;

// == Shard ==
/// A key -> record map guarded by its own read/write lock.
///
/// Every method holds the lock only for the map access itself: incoming
/// values are cloned before the write lock is taken and displaced values are
/// dropped after it is released. Callers never share state with the stored
/// copy.
#[derive(Debug)]
pub(crate) struct Shard<V> {
    records: RwLock<HashMap<String, V>>,
}

impl<V: Clone> Shard<V> {
    pub(crate) fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts only if `key` is absent. Returns false when it already exists.
    pub(crate) fn insert_new(&self, key: &str, value: &V) -> bool {
        let (key, value) = (key.to_string(), value.clone());
        let inserted = match self.records.write().entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        };
        inserted
    }

    /// Replaces only if `key` is present. Returns false when it is absent.
    pub(crate) fn replace(&self, key: &str, value: &V) -> bool {
        let value = value.clone();
        // The previous record is dropped after the lock is released
        let previous = match self.records.write().get_mut(key) {
            Some(slot) => std::mem::replace(slot, value),
            None => return false,
        };
        drop(previous);
        true
    }

    pub(crate) fn get(&self, key: &str) -> Option<V> {
        self.records.read().get(key).cloned()
    }

    pub(crate) fn remove(&self, key: &str) -> bool {
        let removed = self.records.write().remove(key);
        removed.is_some()
    }

    /// Appends a copy of every record, taken under a single read lock.
    pub(crate) fn snapshot_into(&self, out: &mut Vec<V>) {
        let records = self.records.read();
        out.reserve(records.len());
        out.extend(records.values().cloned());
    }

    pub(crate) fn len(&self) -> usize {
        self.records.read().len()
    }
}
