//! Store Module
//!
//! The system of record: a sharded in-memory map with per-shard locking and
//! a cancellation context checked at the entry of every operation.

mod context;
mod shard;
mod sharded;


pub use context::Context;
pub use sharded::{ShardedStore, DEFAULT_SHARD_COUNT};

// == Record Trait ==
/// A value that can live in a [`ShardedStore`].
///
/// The key is treated as opaque; callers validate it before it reaches the
/// store. `Clone` must produce a copy that shares no mutable state with the
/// original, since every value crossing the store boundary is cloned.
pub trait Record: Clone + Send + Sync {
    /// Identity key used for routing and uniqueness.
    fn key(&self) -> &str;
}
