//! User Store - a concurrent in-memory user service
//!
//! A sharded, lock-partitioned record store with a TTL response cache in
//! front of it, served over a small REST API.

pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use service::UserService;
pub use tasks::spawn_cleanup_task;
