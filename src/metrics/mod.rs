//! Metrics module for the vacgen service
//!
//! Provides Prometheus metrics for monitoring and observability.

pub mod prometheus;

// Re-export commonly used items
pub use prometheus::{
    encode_metrics, register_metrics, set_active_subscribers, set_queue_depth,
    GENERATION_SECONDS, JOBS_CANCELLED_TOTAL, JOBS_COMPLETED_TOTAL, JOBS_FAILED_TOTAL,
    JOBS_REJECTED_TOTAL, JOBS_SUBMITTED_TOTAL, QUEUE_DEPTH, RESULTS_EVICTED_TOTAL,
};
