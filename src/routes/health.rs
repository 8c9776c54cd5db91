//! Health check and metrics endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::metrics::encode_metrics;
use crate::state::AppState;

/// Health check endpoint
///
/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "queue_depth": state.queue.depth().await,
        "subscribers": state.hub.subscriber_count().await,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Metrics endpoint with queue and generation statistics
///
/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.stats.lock().await;

    Json(json!({
        "queue": {
            "config": {
                "max_queue": state.config.max_queue,
                "result_ttl_secs": state.config.result_ttl.as_secs(),
                "idle_interval_ms": state.config.idle_interval.as_millis() as u64
            },
            "current": {
                "depth": state.queue.depth().await,
                "stored_results": state.results.len().await,
                "subscribers": state.hub.subscriber_count().await
            }
        },
        "jobs": {
            "submitted": stats.jobs_submitted,
            "completed": stats.jobs_completed,
            "failed": stats.jobs_failed,
            "cancelled": stats.jobs_cancelled,
            "results_evicted": stats.results_evicted
        },
        "performance": {
            "avg_generation_ms": stats.avg_generation_ms(),
            "success_rate": stats.success_rate()
        }
    }))
}

/// Prometheus text exposition endpoint
///
/// GET /metrics/prometheus
pub async fn metrics_prometheus() -> impl IntoResponse {
    match encode_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to encode metrics: {e}"),
        ),
    }
}

/// Ready check (for Kubernetes)
///
/// GET /ready
pub async fn ready() -> impl IntoResponse {
    StatusCode::OK
}

/// Live check (for Kubernetes)
///
/// GET /live
pub async fn live() -> impl IntoResponse {
    StatusCode::OK
}
