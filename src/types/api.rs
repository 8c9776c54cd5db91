//! Wire types for the HTTP API.

use serde::{Deserialize, Serialize};

use super::job::VacancyParams;

/// Body of `POST /api/data`: a generation submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    /// Client-supplied correlation token.
    pub token: String,

    /// Vacancy parameters (flattened alongside the token).
    #[serde(flatten)]
    pub params: VacancyParams,
}

/// Response to a accepted submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub status: &'static str,
    /// 1-based queue position at the moment of submission.
    pub position: usize,
}

/// Body of `POST /api/check` and `POST /api/cancel`: a bare token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

/// Response to a cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct CancelResponse {
    /// Pending jobs removed from the queue.
    pub removed_jobs: usize,
    /// Cached results removed from the store.
    pub removed_results: usize,
}

/// First message a WebSocket subscriber sends: the token to watch.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    pub token: String,
}
