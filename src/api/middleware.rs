//! API Middleware
//!
//! Request metrics and panic recovery for the router.

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::error::ApiError;
use crate::metrics::{HttpMetrics, UNMATCHED_ROUTE};

/// Records in-flight, count and latency metrics for every request except
/// health checks.
pub async fn track_metrics(
    State(metrics): State<Arc<HttpMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    if req.uri().path() == "/health" {
        return next.run(req).await;
    }

    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned());

    let _in_flight = metrics.start_request();
    let start = Instant::now();
    let response = next.run(req).await;

    metrics.record_request(&method, &route, response.status().as_u16(), start.elapsed());
    response
}

/// Builds the panic handler for `CatchPanicLayer`: counts the panic and
/// answers with the usual JSON 500 body.
pub fn panic_handler(
    metrics: Arc<HttpMetrics>,
) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone + Send + Sync + 'static {
    move |panic| {
        let detail = panic
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| panic.downcast_ref::<&str>().copied())
            .unwrap_or("unknown panic");
        error!(panic = detail, "handler panicked");

        metrics.record_panic();
        ApiError::Internal.into_response()
    }
}
