//! Error types for the vacgen service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::queue::QueueError;

/// API-facing error types
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Submission rejected because the queue reached its configured bound
    #[error("Queue is full (max: {max})")]
    QueueFull { max: usize },

    /// Submission rejected because the token is already in the pipeline
    #[error("Token '{0}' is already queued, processing, or holding a result")]
    DuplicateToken(String),

    /// Request parsing error
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<QueueError> for ApiError {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::QueueFull { max } => ApiError::QueueFull { max },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::QueueFull { .. } => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            ApiError::DuplicateToken(_) => (StatusCode::CONFLICT, self.to_string()),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": format!("{:?}", self).split('(').next()
                    .and_then(|s| s.split_whitespace().next())
                    .unwrap_or("Unknown"),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_error_conversion() {
        let api: ApiError = QueueError::QueueFull { max: 5 }.into();
        assert!(matches!(api, ApiError::QueueFull { max: 5 }));
    }

    #[test]
    fn test_status_mapping() {
        let response = ApiError::DuplicateToken("t".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiError::QueueFull { max: 1 }.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
