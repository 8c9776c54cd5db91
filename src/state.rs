//! Application state for the vacgen service.
//!
//! All shared structures are explicitly owned here and injected into the
//! worker and the request handlers. Each is guarded by its own lock and
//! the locks are never held together, so a status query racing the worker
//! may briefly observe `Unknown` mid-transition; clients retry.

use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::engine::GenerationEngine;
use crate::error::ApiError;
use crate::metrics;
use crate::notify::NotificationHub;
use crate::queue::JobQueue;
use crate::registry::ProcessingRegistry;
use crate::results::ResultStore;
use crate::status::PositionResolver;
use crate::worker::Worker;
use crate::types::{Job, JobStatus, VacancyParams};

/// Application state shared across all handlers and the worker
pub struct AppState {
    /// Pending jobs in submission order
    pub queue: Arc<JobQueue>,

    /// Tokens currently being generated
    pub registry: Arc<ProcessingRegistry>,

    /// Finished outcomes awaiting collection or eviction
    pub results: Arc<ResultStore>,

    /// Push-mode subscriber bindings
    pub hub: Arc<NotificationHub>,

    /// Status resolution across the three structures above
    pub resolver: PositionResolver,

    /// The generation engine, owned by the worker
    pub engine: Arc<dyn GenerationEngine>,

    /// Wakes the worker on submission
    pub wakeup: Arc<Notify>,

    /// Runtime statistics
    pub stats: Arc<Mutex<ServiceStats>>,

    /// Configuration
    pub config: ServiceConfig,
}

impl AppState {
    /// Create new application state around the given engine.
    pub fn new(config: ServiceConfig, engine: Arc<dyn GenerationEngine>) -> Self {
        let queue = Arc::new(JobQueue::new(config.max_queue));
        let registry = Arc::new(ProcessingRegistry::new());
        let results = Arc::new(ResultStore::new(config.result_ttl));
        let resolver = PositionResolver::new(results.clone(), registry.clone(), queue.clone());
        let hub = Arc::new(NotificationHub::new(
            resolver.clone(),
            queue.clone(),
            results.clone(),
        ));

        Self {
            queue,
            registry,
            results,
            hub,
            resolver,
            engine,
            wakeup: Arc::new(Notify::new()),
            stats: Arc::new(Mutex::new(ServiceStats::default())),
            config,
        }
    }

    /// Build the background worker over this state.
    pub fn worker(&self) -> Arc<Worker> {
        Arc::new(Worker {
            queue: self.queue.clone(),
            registry: self.registry.clone(),
            results: self.results.clone(),
            hub: self.hub.clone(),
            engine: self.engine.clone(),
            wakeup: self.wakeup.clone(),
            idle_interval: self.config.idle_interval,
            stats: self.stats.clone(),
        })
    }

    /// Submit a job, returning its 1-based queue position.
    ///
    /// Rejects a token that is already queued, processing, or holding an
    /// uncollected result; reusing a live token would make every later
    /// lookup ambiguous. The three membership checks take their locks one
    /// at a time, in line with the rest of the core.
    pub async fn submit(&self, token: String, params: VacancyParams) -> Result<usize, ApiError> {
        let duplicate = self.queue.contains(&token).await
            || self.registry.contains(&token).await
            || self.results.contains(&token).await;
        if duplicate {
            metrics::JOBS_REJECTED_TOTAL.inc();
            return Err(ApiError::DuplicateToken(token));
        }

        let position = match self.queue.enqueue(Job::new(token.clone(), params)).await {
            Ok(position) => position,
            Err(e) => {
                metrics::JOBS_REJECTED_TOTAL.inc();
                return Err(e.into());
            }
        };

        self.stats.lock().await.jobs_submitted += 1;
        metrics::JOBS_SUBMITTED_TOTAL.inc();
        metrics::set_queue_depth(self.queue.depth().await);
        self.wakeup.notify_one();

        debug!(token = %token, position, "Job submitted");
        Ok(position)
    }

    /// One-shot status check: a terminal outcome is removed on delivery.
    pub async fn check_status(&self, token: &str) -> JobStatus {
        self.resolver.collect(token).await
    }

    /// Cancel a token: best-effort removal of the pending job and any
    /// cached result. Idempotent and safe for unknown tokens; never
    /// touches an in-flight job.
    pub async fn cancel(&self, token: &str) -> (usize, usize) {
        let removed_jobs = self.queue.remove_by_token(token).await;
        let removed_results = self.results.remove(token).await as usize;

        if removed_jobs > 0 {
            self.stats.lock().await.jobs_cancelled += removed_jobs as u64;
            metrics::JOBS_CANCELLED_TOTAL.inc_by(removed_jobs as f64);
            metrics::set_queue_depth(self.queue.depth().await);
        }

        info!(token = %token, removed_jobs, removed_results, "Cancellation handled");
        (removed_jobs, removed_results)
    }
}

/// Runtime statistics
#[derive(Debug, Default)]
pub struct ServiceStats {
    /// Jobs accepted into the queue
    pub jobs_submitted: u64,

    /// Jobs completed successfully
    pub jobs_completed: u64,

    /// Jobs whose generation failed
    pub jobs_failed: u64,

    /// Pending jobs removed by cancellation
    pub jobs_cancelled: u64,

    /// Results evicted by the TTL sweep before collection
    pub results_evicted: u64,

    /// Total generation time in milliseconds
    pub generation_time_ms: u64,
}

impl ServiceStats {
    /// Average generation time per finished job, in milliseconds.
    pub fn avg_generation_ms(&self) -> f64 {
        let finished = self.jobs_completed + self.jobs_failed;
        if finished == 0 {
            0.0
        } else {
            self.generation_time_ms as f64 / finished as f64
        }
    }

    /// Share of finished jobs that completed successfully.
    pub fn success_rate(&self) -> f64 {
        let finished = self.jobs_completed + self.jobs_failed;
        if finished == 0 {
            1.0
        } else {
            self.jobs_completed as f64 / finished as f64
        }
    }
}
