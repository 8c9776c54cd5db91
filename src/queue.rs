//! FIFO queue of pending generation jobs.
//!
//! Submission order is the only ordering guarantee: no priorities, no
//! fairness beyond arrival order. The queue is guarded by its own lock and
//! is never locked together with the other shared structures.

use std::collections::VecDeque;

use tokio::sync::Mutex;

use crate::types::Job;

/// Error types for queue admission
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is full (max: {max})")]
    QueueFull { max: usize },
}

/// Ordered pending-job queue with optional admission control.
///
/// With `max_depth == None` the queue grows without bound, matching the
/// original behavior; a configured bound rejects submissions instead.
pub struct JobQueue {
    jobs: Mutex<VecDeque<Job>>,
    max_depth: Option<usize>,
}

impl JobQueue {
    /// Create a new queue. `max_depth` of `None` disables admission control.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self { jobs: Mutex::new(VecDeque::new()), max_depth }
    }

    /// Append a job to the back of the queue.
    ///
    /// Returns the job's 1-based position among pending jobs, or
    /// `QueueError::QueueFull` when a configured bound is reached.
    pub async fn enqueue(&self, job: Job) -> Result<usize, QueueError> {
        let mut jobs = self.jobs.lock().await;

        if let Some(max) = self.max_depth {
            if jobs.len() >= max {
                return Err(QueueError::QueueFull { max });
            }
        }

        jobs.push_back(job);
        Ok(jobs.len())
    }

    /// Remove and return the earliest pending job, if any.
    pub async fn dequeue_front(&self) -> Option<Job> {
        self.jobs.lock().await.pop_front()
    }

    /// Remove every pending job with the given token.
    ///
    /// Returns the number of jobs removed. Used on cancellation; an
    /// in-flight job is not in the queue and is unaffected.
    pub async fn remove_by_token(&self, token: &str) -> usize {
        let mut jobs = self.jobs.lock().await;
        let before = jobs.len();
        jobs.retain(|job| job.token != token);
        before - jobs.len()
    }

    /// 1-based rank of the first pending job with the given token.
    ///
    /// The rank does not count a job currently being processed (that job
    /// is no longer in the queue).
    pub async fn position_of(&self, token: &str) -> Option<usize> {
        let jobs = self.jobs.lock().await;
        jobs.iter().position(|job| job.token == token).map(|idx| idx + 1)
    }

    /// Whether a pending job with the given token exists.
    pub async fn contains(&self, token: &str) -> bool {
        self.jobs.lock().await.iter().any(|job| job.token == token)
    }

    /// Current number of pending jobs.
    pub async fn depth(&self) -> usize {
        self.jobs.lock().await.len()
    }
}
