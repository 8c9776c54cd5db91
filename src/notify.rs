//! Push-mode notification hub.
//!
//! Maps a subscriber session to the token it watches. Delivery is
//! fire-and-forget over an unbounded channel: if the session is gone the
//! update is dropped, and the transport layer's disconnect handling cleans
//! up the binding.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::debug;
use uuid::Uuid;

use crate::queue::JobQueue;
use crate::results::ResultStore;
use crate::status::PositionResolver;
use crate::types::{JobStatus, Token};

/// A subscriber binding: the watched token and the delivery channel.
struct Subscriber {
    token: Token,
    tx: mpsc::UnboundedSender<JobStatus>,
}

/// Session-keyed subscriber map with status fan-out.
pub struct NotificationHub {
    bindings: Mutex<HashMap<Uuid, Subscriber>>,
    resolver: PositionResolver,
    queue: Arc<JobQueue>,
    results: Arc<ResultStore>,
}

impl NotificationHub {
    pub fn new(
        resolver: PositionResolver,
        queue: Arc<JobQueue>,
        results: Arc<ResultStore>,
    ) -> Self {
        Self { bindings: Mutex::new(HashMap::new()), resolver, queue, results }
    }

    /// Bind a session to a token and immediately push its current status.
    ///
    /// A session watches one token at a time; a second subscribe from the
    /// same session overwrites the earlier binding.
    pub async fn subscribe(
        &self,
        session: Uuid,
        token: impl Into<Token>,
        tx: mpsc::UnboundedSender<JobStatus>,
    ) {
        let token = token.into();
        debug!(%session, token = %token, "Subscriber bound");

        let status = self.resolver.resolve(&token).await;
        let _ = tx.send(status);

        let mut bindings = self.bindings.lock().await;
        bindings.insert(session, Subscriber { token, tx });
    }

    /// Push each subscriber its freshly resolved status.
    ///
    /// Called by the worker at cycle boundaries (a job starting or
    /// finishing shifts every other queued job's position) and by explicit
    /// position-info triggers.
    pub async fn broadcast(&self) {
        let bindings = self.bindings.lock().await;
        for subscriber in bindings.values() {
            let status = self.resolver.resolve(&subscriber.token).await;
            let _ = subscriber.tx.send(status);
        }
    }

    /// Remove a session's binding and cancel its token.
    ///
    /// Cancellation removes the pending job and any cached result, but
    /// never an in-flight one: a job already generating runs to completion
    /// with no subscriber to receive it, and its result is later evicted
    /// by the TTL sweep.
    pub async fn disconnect(&self, session: Uuid) -> Option<Token> {
        let removed = self.bindings.lock().await.remove(&session)?;
        let token = removed.token;

        let removed_jobs = self.queue.remove_by_token(&token).await;
        let removed_results = self.results.remove(&token).await;
        debug!(
            %session,
            token = %token,
            removed_jobs,
            removed_results,
            "Subscriber disconnected"
        );

        Some(token)
    }

    /// Number of currently bound sessions.
    pub async fn subscriber_count(&self) -> usize {
        self.bindings.lock().await.len()
    }
}
