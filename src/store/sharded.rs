//! Sharded Store Module
//!
//! In-memory record store split across a fixed, power-of-two number of
//! shards. Each key is routed to exactly one shard by a hash of the key, so
//! operations on keys in different shards never contend.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 ShardedStore                  │
//! │  ┌─────────┐ ┌─────────┐       ┌─────────┐    │
//! │  │ Shard 0 │ │ Shard 1 │  ...  │ Shard N │    │
//! │  │ RwLock  │ │ RwLock  │       │ RwLock  │    │
//! │  │ HashMap │ │ HashMap │       │ HashMap │    │
//! │  └─────────┘ └─────────┘       └─────────┘    │
//! └───────────────────────────────────────────────┘
//!        shard = hash(key) & (shard_count - 1)
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::{StoreError, StoreResult};
use crate::store::shard::Shard;
use crate::store::{Context, Record};

/// Shard count used by `ShardedStore::default`.
pub const DEFAULT_SHARD_COUNT: usize = 16;

// == Sharded Store ==
/// Concurrent keyed store with per-shard locking.
///
/// The store itself holds no lock. It never logs and never retries; every
/// failure is returned as a [`StoreError`].
#[derive(Debug)]
pub struct ShardedStore<V> {
    shards: Box<[Shard<V>]>,
    mask: usize,
}

impl<V: Record> ShardedStore<V> {
    // == Constructor ==
    /// Creates a store with `shard_count` shards, rounded up to the next
    /// power of two (minimum 1).
    pub fn new(shard_count: usize) -> Self {
        let count = shard_count.max(1).next_power_of_two();
        let shards = (0..count).map(|_| Shard::new()).collect();

        Self {
            shards,
            mask: count - 1,
        }
    }

    /// Number of shards, always a power of two.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    // == Routing ==
    /// Index of the shard that owns `key`.
    ///
    /// Stable for the lifetime of the process.
    #[inline]
    pub fn shard_index(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) & self.mask
    }

    #[inline]
    fn shard(&self, key: &str) -> &Shard<V> {
        &self.shards[self.shard_index(key)]
    }

    // == Create ==
    /// Inserts a copy of `record`. Fails with `AlreadyExists` if its key is
    /// already present.
    pub fn create(&self, ctx: &Context, record: &V) -> StoreResult<()> {
        ctx.check()?;

        let key = record.key();
        if self.shard(key).insert_new(key, record) {
            Ok(())
        } else {
            Err(StoreError::AlreadyExists)
        }
    }

    // == Get ==
    /// Returns a copy of the record stored under `key`, or `None`.
    pub fn get_by_key(&self, ctx: &Context, key: &str) -> StoreResult<Option<V>> {
        ctx.check()?;

        Ok(self.shard(key).get(key))
    }

    // == List ==
    /// Returns a copy of every record.
    ///
    /// Each shard is snapshotted under its own lock, one after the other, so
    /// the result is not a single point-in-time view of the whole store.
    /// Order is unspecified.
    pub fn list(&self, ctx: &Context) -> StoreResult<Vec<V>> {
        ctx.check()?;

        let mut records = Vec::new();
        for shard in self.shards.iter() {
            shard.snapshot_into(&mut records);
        }
        Ok(records)
    }

    // == Update ==
    /// Replaces the record under `record.key()`. Fails with `NotFound` if
    /// the key is absent.
    pub fn update(&self, ctx: &Context, record: &V) -> StoreResult<()> {
        ctx.check()?;

        let key = record.key();
        if self.shard(key).replace(key, record) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    // == Delete ==
    /// Removes the record under `key`. Fails with `NotFound` if absent.
    pub fn delete(&self, ctx: &Context, key: &str) -> StoreResult<()> {
        ctx.check()?;

        if self.shard(key).remove(key) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    // == Length ==
    /// Approximate number of records; shards are counted one at a time.
    pub fn len(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    /// Returns true if no shard holds a record.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Record> Default for ShardedStore<V> {
    fn default() -> Self {
        Self::new(DEFAULT_SHARD_COUNT)
    }
}
