//! HTTP route handlers for the vacgen service.
//!
//! This module organizes all route handlers:
//! - `health`: Health check and metrics endpoints
//! - `jobs`: Submission, status-check, and cancellation routes
//! - `ws`: Push-mode WebSocket subscription

pub mod health;
pub mod jobs;
pub mod ws;

// Re-export handlers for convenience
pub use health::{health, live, metrics, metrics_prometheus, ready};
pub use jobs::{cancel, check, home, submit};
pub use ws::subscribe;
