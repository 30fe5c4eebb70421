//! Cache Module
//!
//! Short-lived read cache kept in front of the store. Entries expire after a
//! TTL and are never authoritative.

mod entry;
mod stats;
mod ttl;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use ttl::TtlCache;
