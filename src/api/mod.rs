//! API Module
//!
//! HTTP handlers and routing for the user store REST API.
//!
//! # Endpoints
//! - `POST /api/v1/users` - Create a user
//! - `GET /api/v1/users` - List users
//! - `GET|PUT|DELETE /api/v1/users/:email` - Read, update or delete one user
//! - `GET /stats` - Write counters and cache statistics
//! - `GET /metrics` - Prometheus HTTP metrics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
