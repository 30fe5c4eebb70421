//! User Store - a concurrent in-memory user service
//!
//! Starts the REST API over a sharded store and a TTL response cache.

use std::net::SocketAddr;

use anyhow::Context as _;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_store::api::create_router;
use user_store::metrics::HttpMetrics;
use user_store::{spawn_cleanup_task, AppState, Config, UserService};

/// Main entry point for the user store server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the store, cache, service and HTTP metrics registry
/// 4. Start background cache cleanup task (unless disabled)
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_store=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting User Store Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: shard_count={}, cache_ttl={}s, request_timeout={}s, port={}, cleanup_interval={}s, password_cost={}",
        config.shard_count,
        config.cache_ttl,
        config.request_timeout,
        config.server_port,
        config.cleanup_interval,
        config.password_cost
    );

    let shutdown = CancellationToken::new();
    let service = UserService::from_config(&config).with_shutdown(shutdown.clone());
    let metrics = HttpMetrics::new().context("failed to register HTTP metrics")?;
    let state = AppState::new(service, metrics);
    info!(
        shards = state.service.store().shard_count(),
        "User store initialized"
    );

    let cleanup_handle = config
        .cleanup_interval()
        .map(|interval| spawn_cleanup_task(state.service.cache().clone(), interval));
    if cleanup_handle.is_some() {
        info!("Background cache cleanup task started");
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown, cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown, cancels outstanding request contexts and aborts the cleanup
/// task.
async fn shutdown_signal(
    shutdown: CancellationToken,
    cleanup_handle: Option<tokio::task::JoinHandle<()>>,
) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    shutdown.cancel();

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
