//! API Handlers
//!
//! HTTP request handlers for each user endpoint. Each handler builds a
//! request context and delegates to the [`UserService`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::error;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::metrics::HttpMetrics;
use crate::models::{
    CreateUserRequest, ErrorResponse, HealthResponse, StatsResponse, UpdateUserRequest,
    UserResponse,
};
use crate::service::UserService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserService>,
    pub metrics: Arc<HttpMetrics>,
}

impl AppState {
    /// Creates a new AppState around an existing service and metrics registry.
    pub fn new(service: UserService, metrics: HttpMetrics) -> Self {
        Self {
            service: Arc::new(service),
            metrics: Arc::new(metrics),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> prometheus::Result<Self> {
        Ok(Self::new(UserService::from_config(config), HttpMetrics::new()?))
    }
}

/// Handler for POST /api/v1/users
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let ctx = state.service.request_context();
    let user = state.service.create_user(&ctx, req)?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET /api/v1/users
pub async fn list_users_handler(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let ctx = state.service.request_context();
    let users = state.service.list_users(&ctx)?;

    Ok(Json(users))
}

/// Handler for GET /api/v1/users/:email
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>> {
    let ctx = state.service.request_context();
    let user = state.service.get_user(&ctx, &email)?;

    Ok(Json(user))
}

/// Handler for PUT /api/v1/users/:email
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    let ctx = state.service.request_context();
    let user = state.service.update_user(&ctx, &email, req)?;

    Ok(Json(user))
}

/// Handler for DELETE /api/v1/users/:email
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<StatusCode> {
    let ctx = state.service.request_context();
    state.service.delete_user(&ctx, &email)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.service.stats())
}

/// Handler for GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.metrics.render().map_err(|err| {
        error!(error = %err, "failed to encode metrics");
        ApiError::Internal
    })?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

/// Fallback for paths no route matches
pub async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("route not found")),
    )
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
