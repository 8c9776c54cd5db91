//! Status resolution across the result store, processing registry, and queue.
//!
//! The check order is load-bearing: a token is never simultaneously in the
//! result store and in the queue or registry, so the only order-sensitive
//! case is `Unknown`, which must be checked last. Each structure is read
//! under its own lock; a query racing the worker between two of its
//! transitions may briefly observe `Unknown`, which clients handle by
//! retrying.

use std::sync::Arc;

use crate::queue::JobQueue;
use crate::registry::ProcessingRegistry;
use crate::results::{Outcome, ResultStore};
use crate::types::JobStatus;

impl From<Outcome> for JobStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Completed(answer) => JobStatus::Completed { answer },
            Outcome::Failed(reason) => JobStatus::Failed { reason },
        }
    }
}

/// Resolves a token to its current status.
#[derive(Clone)]
pub struct PositionResolver {
    results: Arc<ResultStore>,
    registry: Arc<ProcessingRegistry>,
    queue: Arc<JobQueue>,
}

impl PositionResolver {
    pub fn new(
        results: Arc<ResultStore>,
        registry: Arc<ProcessingRegistry>,
        queue: Arc<JobQueue>,
    ) -> Self {
        Self { results, registry, queue }
    }

    /// Resolve without consuming anything. Used by push notifications,
    /// which keep a result in the store until TTL or disconnect.
    pub async fn resolve(&self, token: &str) -> JobStatus {
        if let Some(outcome) = self.results.peek(token).await {
            return outcome.into();
        }
        if self.registry.contains(token).await {
            return JobStatus::Processing;
        }
        if let Some(position) = self.queue.position_of(token).await {
            return JobStatus::Queued { position };
        }
        JobStatus::Unknown
    }

    /// Resolve and consume a terminal outcome (one-shot poll mode).
    ///
    /// A completed or failed outcome is removed on delivery; a repeat poll
    /// for the same token reports `Unknown`.
    pub async fn collect(&self, token: &str) -> JobStatus {
        if let Some(outcome) = self.results.take(token).await {
            return outcome.into();
        }
        if self.registry.contains(token).await {
            return JobStatus::Processing;
        }
        if let Some(position) = self.queue.position_of(token).await {
            return JobStatus::Queued { position };
        }
        JobStatus::Unknown
    }
}
