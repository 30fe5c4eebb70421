//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache cleanup: reclaims expired response-cache entries

mod cleanup;

pub use cleanup::spawn_cleanup_task;
