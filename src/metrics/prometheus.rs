//! Prometheus metrics for the vacgen service
//!
//! Exposes metrics in Prometheus format for monitoring and observability.

use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

lazy_static! {
    /// Global Prometheus registry for vacgen metrics
    pub static ref REGISTRY: Registry = Registry::new();

    // ============== Job Metrics ==============

    /// Total jobs accepted into the queue
    pub static ref JOBS_SUBMITTED_TOTAL: Counter = Counter::with_opts(
        Opts::new("jobs_submitted_total", "Total jobs accepted into the queue")
            .namespace("vacgen")
    ).expect("metric can be created");

    /// Total jobs completed successfully
    pub static ref JOBS_COMPLETED_TOTAL: Counter = Counter::with_opts(
        Opts::new("jobs_completed_total", "Total jobs completed successfully")
            .namespace("vacgen")
    ).expect("metric can be created");

    /// Total jobs whose generation failed
    pub static ref JOBS_FAILED_TOTAL: Counter = Counter::with_opts(
        Opts::new("jobs_failed_total", "Total jobs whose generation failed")
            .namespace("vacgen")
    ).expect("metric can be created");

    /// Total jobs rejected at submission (queue full or duplicate token)
    pub static ref JOBS_REJECTED_TOTAL: Counter = Counter::with_opts(
        Opts::new("jobs_rejected_total", "Total jobs rejected at submission")
            .namespace("vacgen")
    ).expect("metric can be created");

    /// Total pending jobs removed by cancellation
    pub static ref JOBS_CANCELLED_TOTAL: Counter = Counter::with_opts(
        Opts::new("jobs_cancelled_total", "Total pending jobs removed by cancellation")
            .namespace("vacgen")
    ).expect("metric can be created");

    // ============== Result Metrics ==============

    /// Total results evicted by the TTL sweep before collection
    pub static ref RESULTS_EVICTED_TOTAL: Counter = Counter::with_opts(
        Opts::new("results_evicted_total", "Total results evicted by the TTL sweep")
            .namespace("vacgen")
    ).expect("metric can be created");

    /// Generation call duration histogram
    pub static ref GENERATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "generation_seconds",
            "Generation call duration in seconds"
        )
        .namespace("vacgen")
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0])
    ).expect("metric can be created");

    // ============== Queue Metrics ==============

    /// Current number of pending jobs
    pub static ref QUEUE_DEPTH: Gauge = Gauge::with_opts(
        Opts::new("queue_depth", "Current number of pending jobs")
            .namespace("vacgen")
    ).expect("metric can be created");

    /// Current number of push-mode subscribers
    pub static ref ACTIVE_SUBSCRIBERS: Gauge = Gauge::with_opts(
        Opts::new("active_subscribers", "Current number of push-mode subscribers")
            .namespace("vacgen")
    ).expect("metric can be created");
}

/// Register all metrics with the global registry.
/// Should be called once before starting the server.
pub fn register_metrics() -> Result<(), prometheus::Error> {
    REGISTRY.register(Box::new(JOBS_SUBMITTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(JOBS_COMPLETED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(JOBS_FAILED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(JOBS_REJECTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(JOBS_CANCELLED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RESULTS_EVICTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(GENERATION_SECONDS.clone()))?;
    REGISTRY.register(Box::new(QUEUE_DEPTH.clone()))?;
    REGISTRY.register(Box::new(ACTIVE_SUBSCRIBERS.clone()))?;
    Ok(())
}

/// Encode the registry in Prometheus text exposition format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    encoder.encode_to_string(&metric_families)
}

/// Update the queue depth gauge.
pub fn set_queue_depth(depth: usize) {
    QUEUE_DEPTH.set(depth as f64);
}

/// Update the active subscriber gauge.
pub fn set_active_subscribers(count: usize) {
    ACTIVE_SUBSCRIBERS.set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_encode() {
        // Registration is idempotent only across processes; within the
        // test binary a second call reports AlreadyReg, which is fine.
        let _ = register_metrics();

        JOBS_SUBMITTED_TOTAL.inc();
        set_queue_depth(3);

        let encoded = encode_metrics().unwrap();
        assert!(encoded.contains("vacgen_jobs_submitted_total"));
        assert!(encoded.contains("vacgen_queue_depth"));
    }
}
