//! Session-scoped question queue.

use crate::cache::QuestionCache;
use crate::source::QuestionSource;
use opentdb::{FetchError, Question};
use std::collections::VecDeque;
use tracing::debug;

/// Ordered pool of questions owned by one play session.
///
/// Seeded once per session from the cache or a fresh fetch, then drained
/// one question per encounter. Running dry is a normal terminal state,
/// not an error: it means "no more content this session".
#[derive(Debug, Default)]
pub struct QuestionQueue {
    questions: VecDeque<Question>,
}

impl QuestionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the queue for a new session.
    ///
    /// A populated cache is served as-is, with zero network traffic.
    /// Otherwise the source is asked for a fresh batch, and a success
    /// seeds both this queue and the cache with the identical sequence
    /// so later sessions in the process reuse it.
    ///
    /// On a fetch failure the queue stays empty and the error is
    /// returned; the session should carry on with no questions and
    /// report "content unavailable" upward rather than crash.
    pub async fn initialize<S: QuestionSource + ?Sized>(
        &mut self,
        cache: &QuestionCache,
        source: &S,
    ) -> Result<usize, FetchError> {
        if cache.is_populated().await {
            let questions = cache.snapshot().await;
            debug!(count = questions.len(), "seeded question queue from cache");
            self.questions = questions.into();
            return Ok(self.questions.len());
        }

        let questions = source.fetch().await?;
        cache.replace(questions.clone()).await;
        debug!(count = questions.len(), "seeded question queue from fresh fetch");
        self.questions = questions.into();
        Ok(self.questions.len())
    }

    /// Remove and return the next question, or `None` when exhausted.
    pub fn take_next(&mut self) -> Option<Question> {
        self.questions.pop_front()
    }

    /// How many questions are left.
    pub fn remaining(&self) -> usize {
        self.questions.len()
    }

    /// Whether the queue is out of questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Discard all remaining questions. Never touches the cache.
    pub fn clear(&mut self) {
        self.questions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{question, ScriptedSource};

    fn batch() -> Vec<Question> {
        vec![
            question("first", true),
            question("second", false),
            question("third", true),
        ]
    }

    #[tokio::test]
    async fn test_initialize_from_source_preserves_order() {
        let cache = QuestionCache::new();
        let source = ScriptedSource::with_batch(batch());
        let mut queue = QuestionQueue::new();

        let seeded = queue.initialize(&cache, &source).await.unwrap();
        assert_eq!(seeded, 3);
        assert_eq!(queue.remaining(), 3);

        assert_eq!(queue.take_next().unwrap().text, "first");
        assert_eq!(queue.take_next().unwrap().text, "second");
        assert_eq!(queue.take_next().unwrap().text, "third");
        assert!(queue.take_next().is_none());
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_populates_cache() {
        let cache = QuestionCache::new();
        let source = ScriptedSource::with_batch(batch());
        let mut queue = QuestionQueue::new();

        queue.initialize(&cache, &source).await.unwrap();
        assert_eq!(cache.snapshot().await, batch());
    }

    #[tokio::test]
    async fn test_second_session_reuses_cache() {
        let cache = QuestionCache::new();
        let source = ScriptedSource::with_batch(batch());

        let mut first = QuestionQueue::new();
        first.initialize(&cache, &source).await.unwrap();
        assert_eq!(source.fetch_count(), 1);

        let mut second = QuestionQueue::new();
        second.initialize(&cache, &source).await.unwrap();
        assert_eq!(source.fetch_count(), 1, "cache hit must not refetch");

        let mut texts = Vec::new();
        while let Some(q) = second.take_next() {
            texts.push(q.text);
        }
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_queue_empty() {
        let cache = QuestionCache::new();
        let source = ScriptedSource::unavailable();
        let mut queue = QuestionQueue::new();

        let err = queue.initialize(&cache, &source).await.unwrap_err();
        assert!(matches!(err, FetchError::Unavailable { .. }));
        assert!(queue.is_empty());
        assert!(!cache.is_populated().await, "failed fetch must not populate cache");
    }

    #[tokio::test]
    async fn test_clear_is_idempotent_and_cache_untouched() {
        let cache = QuestionCache::new();
        let source = ScriptedSource::with_batch(batch());
        let mut queue = QuestionQueue::new();

        queue.initialize(&cache, &source).await.unwrap();
        queue.clear();
        queue.clear();

        assert!(queue.is_empty());
        assert!(cache.is_populated().await);
    }
}
