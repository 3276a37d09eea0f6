//! Process-wide question cache.
//!
//! One successful fetch serves every later play session in the same
//! process. The cache is an explicitly constructed service handed to
//! whatever builds a session, never ambient global state; cloning the
//! handle shares the same backing store.

use opentdb::Question;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared store of previously fetched questions.
///
/// Contents never expire on their own; a trivia pool has no freshness
/// requirement within a process. Call [`clear`](Self::clear) to force
/// the next acquisition back onto the network.
#[derive(Debug, Clone, Default)]
pub struct QuestionCache {
    inner: Arc<Mutex<Vec<Question>>>,
}

impl QuestionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cache holds any questions.
    pub async fn is_populated(&self) -> bool {
        !self.inner.lock().await.is_empty()
    }

    /// A copy of the cached questions, in their original order.
    ///
    /// Always a copy: callers consume their sequence destructively and
    /// must not drain the shared backing store.
    pub async fn snapshot(&self) -> Vec<Question> {
        self.inner.lock().await.clone()
    }

    /// Atomically discard prior contents and store `questions`.
    pub async fn replace(&self, questions: Vec<Question>) {
        *self.inner.lock().await = questions;
    }

    /// Empty the cache. A no-op when already empty.
    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }
}
