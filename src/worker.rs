//! Background generation worker.
//!
//! A single long-lived loop owns the generation engine and serializes all
//! access to it. Each cycle: sweep expired results, pop one job, mark it
//! processing, notify subscribers, invoke the engine, store the outcome,
//! clear the processing mark, notify again. The worker is the only writer
//! to the result store and the processing registry; entry points only
//! remove from the queue and the store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, Notify};
use tracing::{debug, info, warn};

use crate::engine::{EngineError, GenerationEngine};
use crate::metrics;
use crate::notify::NotificationHub;
use crate::queue::JobQueue;
use crate::registry::ProcessingRegistry;
use crate::results::{Outcome, ResultStore};
use crate::state::ServiceStats;
use crate::types::Job;

/// The single background worker.
pub struct Worker {
    pub queue: Arc<JobQueue>,
    pub registry: Arc<ProcessingRegistry>,
    pub results: Arc<ResultStore>,
    pub hub: Arc<NotificationHub>,
    pub engine: Arc<dyn GenerationEngine>,
    /// Signaled by the submission entry point so the worker wakes
    /// immediately instead of waiting out the idle interval.
    pub wakeup: Arc<Notify>,
    /// Maximum time the worker sleeps when the queue is empty. Bounds the
    /// latency of TTL sweeps as well as of job pickup.
    pub idle_interval: Duration,
    pub stats: Arc<Mutex<ServiceStats>>,
}

impl Worker {
    /// Run the worker loop forever.
    pub async fn run(self: Arc<Self>) {
        info!(
            engine = %self.engine.describe(),
            idle_ms = self.idle_interval.as_millis() as u64,
            "Generation worker started"
        );

        loop {
            if !self.run_once().await {
                let _ = tokio::time::timeout(self.idle_interval, self.wakeup.notified()).await;
            }
        }
    }

    /// Execute one worker cycle.
    ///
    /// Returns true if a job was processed, false if the queue was empty.
    pub async fn run_once(&self) -> bool {
        self.sweep().await;

        let Some(job) = self.queue.dequeue_front().await else {
            return false;
        };

        self.process(job).await;
        true
    }

    async fn sweep(&self) -> usize {
        let evicted = self.results.sweep_expired().await;
        if evicted > 0 {
            info!(evicted, "Evicted expired results");
            metrics::RESULTS_EVICTED_TOTAL.inc_by(evicted as f64);
            self.stats.lock().await.results_evicted += evicted as u64;
        }
        evicted
    }

    async fn process(&self, job: Job) {
        let token = job.token.clone();
        debug!(token = %token, "Job dequeued");

        self.registry.mark(token.clone()).await;
        metrics::set_queue_depth(self.queue.depth().await);
        // Starting a job shifts every other queued job's position.
        self.hub.broadcast().await;

        let started = Instant::now();
        let outcome = self.generate(&job).await;
        let elapsed = started.elapsed();

        match &outcome {
            Outcome::Completed(answer) => {
                info!(
                    token = %token,
                    chars = answer.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Generation complete"
                );
                metrics::JOBS_COMPLETED_TOTAL.inc();
            }
            Outcome::Failed(reason) => {
                warn!(token = %token, reason = %reason, "Generation failed");
                metrics::JOBS_FAILED_TOTAL.inc();
            }
        }
        metrics::GENERATION_SECONDS.observe(elapsed.as_secs_f64());

        {
            let mut stats = self.stats.lock().await;
            match &outcome {
                Outcome::Completed(_) => stats.jobs_completed += 1,
                Outcome::Failed(_) => stats.jobs_failed += 1,
            }
            stats.generation_time_ms += elapsed.as_millis() as u64;
        }

        // Store before unmarking: a token must never be absent from both
        // the registry and the store while its outcome exists.
        self.results.put(token.clone(), outcome).await;
        self.registry.unmark(&token).await;

        self.hub.broadcast().await;
    }

    /// Invoke the synchronous engine on a blocking thread.
    async fn generate(&self, job: &Job) -> Outcome {
        let engine = self.engine.clone();
        let params = job.params.clone();

        let result = tokio::task::spawn_blocking(move || engine.generate(&params))
            .await
            .unwrap_or_else(|e| Err(EngineError::Generation(format!("worker panic: {e}"))));

        match result {
            Ok(answer) => Outcome::Completed(answer),
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::PositionResolver;
    use crate::types::{JobStatus, VacancyParams};
    use tokio::sync::mpsc;
    use uuid::Uuid;

    /// Engine stub driven by a closure over the vacancy title.
    struct StubEngine<F>(F);

    impl<F> GenerationEngine for StubEngine<F>
    where
        F: Fn(&VacancyParams) -> Result<String, EngineError> + Send + Sync,
    {
        fn generate(&self, params: &VacancyParams) -> Result<String, EngineError> {
            (self.0)(params)
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    fn params(title: &str) -> VacancyParams {
        VacancyParams {
            vacancy_name: title.to_string(),
            company_name: String::new(),
            company_place: String::new(),
            schedule: String::new(),
            experience: String::new(),
            key_skills: vec![],
        }
    }

    struct Harness {
        worker: Arc<Worker>,
        resolver: PositionResolver,
    }

    fn harness<F>(ttl: Duration, engine: F) -> Harness
    where
        F: Fn(&VacancyParams) -> Result<String, EngineError> + Send + Sync + 'static,
    {
        let queue = Arc::new(JobQueue::new(None));
        let registry = Arc::new(ProcessingRegistry::new());
        let results = Arc::new(ResultStore::new(ttl));
        let resolver =
            PositionResolver::new(results.clone(), registry.clone(), queue.clone());
        let hub = Arc::new(NotificationHub::new(
            resolver.clone(),
            queue.clone(),
            results.clone(),
        ));

        let worker = Arc::new(Worker {
            queue,
            registry,
            results,
            hub,
            engine: Arc::new(StubEngine(engine)),
            wakeup: Arc::new(Notify::new()),
            idle_interval: Duration::from_millis(10),
            stats: Arc::new(Mutex::new(ServiceStats::default())),
        });

        Harness { worker, resolver }
    }

    #[tokio::test]
    async fn test_idle_cycle_processes_nothing() {
        let h = harness(Duration::from_secs(60), |p| Ok(p.vacancy_name.clone()));
        assert!(!h.worker.run_once().await);
    }

    #[tokio::test]
    async fn test_successful_generation_round_trip() {
        let h = harness(Duration::from_secs(60), |p| Ok(format!("vacancy: {}", p.vacancy_name)));
        h.worker.queue.enqueue(Job::new("t1", params("Rust developer"))).await.unwrap();

        assert!(h.worker.run_once().await);

        assert_eq!(
            h.resolver.collect("t1").await,
            JobStatus::Completed { answer: "vacancy: Rust developer".to_string() }
        );
        // Delivered exactly once.
        assert_eq!(h.resolver.collect("t1").await, JobStatus::Unknown);
        assert!(!h.worker.registry.contains("t1").await);
        assert_eq!(h.worker.stats.lock().await.jobs_completed, 1);
    }

    #[tokio::test]
    async fn test_failed_generation_is_observable() {
        let h = harness(Duration::from_secs(60), |_| {
            Err(EngineError::Generation("model exploded".to_string()))
        });
        h.worker.queue.enqueue(Job::new("x", params("QA"))).await.unwrap();

        assert!(h.worker.run_once().await);

        // The failure is a terminal state distinct from Unknown, and the
        // processing mark is gone.
        assert!(!h.worker.registry.contains("x").await);
        match h.resolver.collect("x").await {
            JobStatus::Failed { reason } => assert!(reason.contains("model exploded")),
            other => panic!("expected failed status, got {other:?}"),
        }
        assert_eq!(h.resolver.collect("x").await, JobStatus::Unknown);
        assert_eq!(h.worker.stats.lock().await.jobs_failed, 1);
    }

    #[tokio::test]
    async fn test_positions_shift_as_worker_advances() {
        // Gate the engine so the mid-processing state is observable.
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let release_rx = std::sync::Mutex::new(release_rx);

        let h = harness(Duration::from_secs(60), move |p| {
            release_rx.lock().unwrap().recv().ok();
            Ok(p.vacancy_name.clone())
        });

        for token in ["a", "b", "c"] {
            h.worker.queue.enqueue(Job::new(token, params(token))).await.unwrap();
        }
        assert_eq!(h.resolver.resolve("a").await, JobStatus::Queued { position: 1 });
        assert_eq!(h.resolver.resolve("b").await, JobStatus::Queued { position: 2 });

        let worker = h.worker.clone();
        let cycle = tokio::spawn(async move { worker.run_once().await });

        // Wait until the worker has marked "a" as processing.
        while !h.worker.registry.contains("a").await {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(h.resolver.resolve("a").await, JobStatus::Processing);
        assert_eq!(h.resolver.resolve("b").await, JobStatus::Queued { position: 1 });
        assert_eq!(h.resolver.resolve("c").await, JobStatus::Queued { position: 2 });

        release_tx.send(()).unwrap();
        assert!(cycle.await.unwrap());
        assert_eq!(
            h.resolver.resolve("a").await,
            JobStatus::Completed { answer: "a".to_string() }
        );
    }

    #[tokio::test]
    async fn test_subscribers_notified_at_cycle_boundaries() {
        let h = harness(Duration::from_secs(60), |p| Ok(p.vacancy_name.clone()));
        h.worker.queue.enqueue(Job::new("a", params("a"))).await.unwrap();
        h.worker.queue.enqueue(Job::new("b", params("b"))).await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        h.worker.hub.subscribe(Uuid::new_v4(), "b", tx).await;
        assert_eq!(rx.recv().await.unwrap(), JobStatus::Queued { position: 2 });

        assert!(h.worker.run_once().await);

        // One push when "a" entered processing, one when it finished.
        assert_eq!(rx.recv().await.unwrap(), JobStatus::Queued { position: 1 });
        assert_eq!(rx.recv().await.unwrap(), JobStatus::Queued { position: 1 });
    }

    #[tokio::test]
    async fn test_sweep_runs_each_cycle() {
        let h = harness(Duration::from_millis(1), |p| Ok(p.vacancy_name.clone()));
        h.worker.results.put("old", Outcome::Completed("stale".to_string())).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Idle cycle still sweeps.
        assert!(!h.worker.run_once().await);
        assert!(h.worker.results.is_empty().await);
        assert_eq!(h.worker.stats.lock().await.results_evicted, 1);
    }

    #[tokio::test]
    async fn test_uncollected_result_expires() {
        let h = harness(Duration::from_millis(5), |p| Ok(p.vacancy_name.clone()));
        h.worker.queue.enqueue(Job::new("a", params("a"))).await.unwrap();
        assert!(h.worker.run_once().await);
        assert!(matches!(
            h.resolver.resolve("a").await,
            JobStatus::Completed { .. }
        ));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(h.resolver.resolve("a").await, JobStatus::Unknown);
    }
}
