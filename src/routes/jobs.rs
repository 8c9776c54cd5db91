//! Submission, status-check, and cancellation handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{CancelResponse, SubmitRequest, SubmitResponse, TokenRequest};

/// Submit a generation job
///
/// POST /api/data
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        token = %request.token,
        vacancy = %request.params.vacancy_name,
        "Handling POST /api/data"
    );

    let position = state.submit(request.token, request.params).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse { status: "queued", position }),
    ))
}

/// One-shot status check: a completed or failed outcome is removed on
/// delivery, so a repeat poll reports unknown.
///
/// POST /api/check
pub async fn check(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenRequest>,
) -> impl IntoResponse {
    let status = state.check_status(&request.token).await;
    Json(status)
}

/// Cancel a pending job and drop any cached result
///
/// POST /api/cancel
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenRequest>,
) -> impl IntoResponse {
    let (removed_jobs, removed_results) = state.cancel(&request.token).await;
    Json(CancelResponse { removed_jobs, removed_results })
}

/// Engine description
///
/// GET /api/home
pub async fn home(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "description": state.engine.describe(),
    }))
}
