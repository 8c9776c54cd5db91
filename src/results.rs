//! Time-bounded store of finished generation outcomes.
//!
//! Each entry is stamped on insertion and evicted once its age exceeds the
//! configured TTL. Eviction is observable (logged and counted by the
//! worker) but is not an error. An entry can also leave the store by
//! explicit collection (one-shot poll) or cancellation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::types::Token;

/// Terminal outcome of a generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Generated vacancy text.
    Completed(String),
    /// Generation failed with the given reason.
    Failed(String),
}

/// A stored outcome with its completion timestamp.
#[derive(Debug, Clone)]
struct ResultEntry {
    outcome: Outcome,
    completed_at: Instant,
}

impl ResultEntry {
    fn new(outcome: Outcome) -> Self {
        Self { outcome, completed_at: Instant::now() }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.completed_at.elapsed() > ttl
    }
}

/// Token-keyed outcome store with TTL expiration.
pub struct ResultStore {
    entries: Mutex<HashMap<Token, ResultEntry>>,
    ttl: Duration,
}

impl ResultStore {
    /// Create a new store whose entries live at most `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self { entries: Mutex::new(HashMap::new()), ttl }
    }

    /// Store an outcome for a token, stamping the current time.
    ///
    /// A later submission reusing the token overwrites the entry (last
    /// write wins); the submission path rejects duplicates before it can
    /// happen in normal operation.
    pub async fn put(&self, token: impl Into<Token>, outcome: Outcome) {
        self.entries.lock().await.insert(token.into(), ResultEntry::new(outcome));
    }

    /// Read an outcome without removing it (push mode keeps entries until
    /// TTL or disconnect). Expired entries are treated as absent.
    pub async fn peek(&self, token: &str) -> Option<Outcome> {
        let entries = self.entries.lock().await;
        entries
            .get(token)
            .filter(|entry| !entry.is_expired(self.ttl))
            .map(|entry| entry.outcome.clone())
    }

    /// Remove and return an outcome (one-shot poll: a result is delivered
    /// at most once, to exactly one caller).
    pub async fn take(&self, token: &str) -> Option<Outcome> {
        let mut entries = self.entries.lock().await;
        match entries.remove(token) {
            Some(entry) if !entry.is_expired(self.ttl) => Some(entry.outcome),
            _ => None,
        }
    }

    /// Remove an entry without reading it. Returns true if one existed.
    pub async fn remove(&self, token: &str) -> bool {
        self.entries.lock().await.remove(token).is_some()
    }

    /// Whether an unexpired outcome exists for the token.
    pub async fn contains(&self, token: &str) -> bool {
        let entries = self.entries.lock().await;
        entries.get(token).is_some_and(|entry| !entry.is_expired(self.ttl))
    }

    /// Evict every entry older than the TTL, returning the number evicted.
    ///
    /// Called once per worker cycle.
    pub async fn sweep_expired(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(self.ttl));
        before - entries.len()
    }

    /// Current number of stored entries, including not-yet-swept expired ones.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_take_once() {
        let store = ResultStore::new(Duration::from_secs(60));
        store.put("a", Outcome::Completed("text".to_string())).await;

        assert_eq!(store.take("a").await, Some(Outcome::Completed("text".to_string())));
        // Delivered exactly once.
        assert_eq!(store.take("a").await, None);
    }

    #[tokio::test]
    async fn test_peek_does_not_remove() {
        let store = ResultStore::new(Duration::from_secs(60));
        store.put("a", Outcome::Completed("text".to_string())).await;

        assert!(store.peek("a").await.is_some());
        assert!(store.peek("a").await.is_some());
        assert!(store.contains("a").await);
    }

    #[tokio::test]
    async fn test_failed_outcome_is_stored() {
        let store = ResultStore::new(Duration::from_secs(60));
        store.put("x", Outcome::Failed("engine error".to_string())).await;

        assert_eq!(store.take("x").await, Some(Outcome::Failed("engine error".to_string())));
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let store = ResultStore::new(Duration::from_millis(1));
        store.put("a", Outcome::Completed("text".to_string())).await;

        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(!store.contains("a").await);
        assert!(store.peek("a").await.is_none());
        assert!(store.take("a").await.is_none());
    }

    #[tokio::test]
    async fn test_sweep_expired() {
        let store = ResultStore::new(Duration::from_millis(1));
        store.put("a", Outcome::Completed("1".to_string())).await;
        store.put("b", Outcome::Completed("2".to_string())).await;

        tokio::time::sleep(Duration::from_millis(10)).await;
        store.put("c", Outcome::Completed("3".to_string())).await;

        assert_eq!(store.sweep_expired().await, 2);
        assert_eq!(store.len().await, 1);
        assert!(store.contains("c").await);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = ResultStore::new(Duration::from_secs(60));
        store.put("a", Outcome::Completed("text".to_string())).await;

        assert!(store.remove("a").await);
        assert!(!store.remove("a").await);
    }
}
