//! API Routes
//!
//! Configures the Axum router with all user store endpoints.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_user_handler, delete_user_handler, get_user_handler, health_handler,
    list_users_handler, metrics_handler, not_found_handler, stats_handler, update_user_handler,
    AppState,
};
use super::middleware::{panic_handler, track_metrics};
use crate::metrics::HttpMetrics;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/v1/users` - Create a user
/// - `GET /api/v1/users` - List all users
/// - `GET /api/v1/users/:email` - Fetch one user
/// - `PUT /api/v1/users/:email` - Partially update a user
/// - `DELETE /api/v1/users/:email` - Delete a user
/// - `GET /stats` - Write counters and cache statistics
/// - `GET /metrics` - Prometheus HTTP metrics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Panic recovery: a panicking handler becomes a JSON 500
/// - Metrics: request counts, latency and in-flight requests
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let users = Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/:email",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        );

    let metrics = Arc::clone(&state.metrics);
    let router = Router::new()
        .nest("/api/v1", users)
        .route("/stats", get(stats_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .with_state(state);

    with_middleware(router, metrics)
}

/// Wraps every route of `router` in the shared middleware stack.
///
/// Panic recovery sits inside the metrics layer so recovered panics are
/// counted as 5xx responses.
pub(crate) fn with_middleware(router: Router, metrics: Arc<HttpMetrics>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(CatchPanicLayer::custom(panic_handler(Arc::clone(&metrics))))
        .layer(middleware::from_fn_with_state(metrics, track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
