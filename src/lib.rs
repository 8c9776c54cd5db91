//! vacgen: asynchronous job-queue server for LLM vacancy-text generation.
//!
//! Clients submit a generation job identified by an opaque token, get an
//! immediate acknowledgment, and retrieve the result later by one-shot
//! polling (`POST /api/check`) or by WebSocket push (`GET /ws`). A single
//! background worker owns the expensive generation engine and drains the
//! queue in strict submission order.
//!
//! # Modules
//!
//! - [`queue`], [`registry`], [`results`] - the three shared structures
//! - [`status`] - token status resolution
//! - [`worker`] - the background generation loop
//! - [`notify`] - push-mode subscriber fan-out
//! - [`engine`] - the generation-engine boundary and Ollama client
//! - [`routes`], [`state`], [`config`], [`error`], [`metrics`] - HTTP glue

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod notify;
pub mod queue;
pub mod registry;
pub mod results;
pub mod routes;
pub mod state;
pub mod status;
pub mod types;
pub mod worker;

pub use config::ServiceConfig;
pub use state::AppState;

/// Initialize Prometheus metrics registry.
/// Should be called once before starting the server.
pub fn init_metrics() {
    if let Err(e) = metrics::register_metrics() {
        warn!("Failed to register Prometheus metrics: {}", e);
    }
}

/// Build the axum router over the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Job endpoints
        .route("/api/data", post(routes::submit))
        .route("/api/check", post(routes::check))
        .route("/api/cancel", post(routes::cancel))
        .route("/api/home", get(routes::home))
        // Push-mode subscription
        .route("/ws", get(routes::subscribe))
        // Health endpoints
        .route("/health", get(routes::health))
        .route("/ready", get(routes::ready))
        .route("/live", get(routes::live))
        .route("/metrics", get(routes::metrics))
        .route("/metrics/prometheus", get(routes::metrics_prometheus))
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the vacgen server.
///
/// Spawns the background worker and blocks serving HTTP until shut down.
pub async fn run_server(
    config: ServiceConfig,
    engine: Arc<dyn engine::GenerationEngine>,
) -> anyhow::Result<()> {
    init_metrics();

    info!(
        port = config.port,
        engine = %engine.describe(),
        result_ttl_secs = config.result_ttl.as_secs(),
        "Starting vacgen v{}",
        env!("CARGO_PKG_VERSION")
    );

    let state = Arc::new(AppState::new(config.clone(), engine));

    // Single worker by design: it is the only caller of the engine.
    tokio::spawn(state.worker().run());

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("vacgen listening on http://{}", addr);
    info!("Submit:  POST http://{}/api/data", addr);
    info!("Check:   POST http://{}/api/check", addr);
    info!("Push:    GET  ws://{}/ws", addr);
    info!("Health:  GET  http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
