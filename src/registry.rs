//! Registry of tokens currently being generated.
//!
//! Pure membership test, no ordering. Only the worker marks and unmarks;
//! request handlers only read, so the single-writer discipline of the
//! worker loop holds.

use std::collections::HashSet;

use tokio::sync::Mutex;

use crate::types::Token;

/// Set of in-flight tokens behind its own lock.
#[derive(Default)]
pub struct ProcessingRegistry {
    tokens: Mutex<HashSet<Token>>,
}

impl ProcessingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a token as processing.
    pub async fn mark(&self, token: impl Into<Token>) {
        self.tokens.lock().await.insert(token.into());
    }

    /// Clear a token's processing mark.
    pub async fn unmark(&self, token: &str) {
        self.tokens.lock().await.remove(token);
    }

    /// Whether the token is currently being generated.
    pub async fn contains(&self, token: &str) -> bool {
        self.tokens.lock().await.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mark_unmark() {
        let registry = ProcessingRegistry::new();
        assert!(!registry.contains("a").await);

        registry.mark("a").await;
        assert!(registry.contains("a").await);

        registry.unmark("a").await;
        assert!(!registry.contains("a").await);
    }

    #[tokio::test]
    async fn test_unmark_unknown_is_noop() {
        let registry = ProcessingRegistry::new();
        registry.unmark("never-seen").await;
        assert!(!registry.contains("never-seen").await);
    }
}
