//! The seam between the encounter engine and the network.

use async_trait::async_trait;
use opentdb::{FetchError, Question, TriviaClient};

/// Anything that can produce a batch of trivia questions.
///
/// The queue acquires questions through this trait so tests (and any
/// offline host) can substitute a scripted source for the real API
/// client.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch one batch of questions, in presentation order.
    async fn fetch(&self) -> Result<Vec<Question>, FetchError>;
}

#[async_trait]
impl QuestionSource for TriviaClient {
    async fn fetch(&self) -> Result<Vec<Question>, FetchError> {
        TriviaClient::fetch(self).await
    }
}
