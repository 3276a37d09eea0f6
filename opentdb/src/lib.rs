//! Minimal Open Trivia Database API client.
//!
//! This crate provides a focused client for the opentdb.com trivia API with:
//! - Batched true/false question retrieval
//! - Bounded retries with a fixed delay between attempts
//! - Normalization of the API payload into a small domain type

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const API_BASE: &str = "https://opentdb.com/api.php";
const DEFAULT_BATCH_SIZE: u32 = 50;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Errors that can occur when fetching trivia questions.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, timeout, or non-success HTTP status. Retryable.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed response body, or a body with no questions in it.
    /// Never retried: the server answered, it just answered garbage.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Every attempt failed at the transport level.
    #[error("Trivia service unavailable after {attempts} attempts: {last_error}")]
    Unavailable { attempts: u32, last_error: String },
}

impl FetchError {
    /// Whether a single attempt ending in this error should be retried.
    fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}

/// A single true/false trivia question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text, exactly as the API returned it (which may
    /// include HTML entities; no decoding is performed here).
    pub text: String,
    /// Whether "True" is the correct answer.
    pub correct_answer: bool,
}

/// Question difficulty filter accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// The query-string value the API expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Open Trivia DB API client.
#[derive(Debug, Clone)]
pub struct TriviaClient {
    client: reqwest::Client,
    endpoint: String,
    batch_size: u32,
    difficulty: Difficulty,
    max_retries: u32,
    retry_delay: Duration,
}

impl TriviaClient {
    /// Create a client with the default endpoint and retry policy.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: API_BASE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            difficulty: Difficulty::Easy,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Override the endpoint URL (mainly for tests against a local server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set how many questions to request per fetch.
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the difficulty filter.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set how many times to retry after the first failed attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay between attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Fetch one batch of true/false questions.
    ///
    /// Transport-level failures are retried up to the configured limit with
    /// a fixed delay between attempts; the delay is an async sleep, so a
    /// host can run other work (or drop the future to cancel) while it
    /// waits. Payload problems are surfaced immediately without retry.
    pub async fn fetch(&self) -> Result<Vec<Question>, FetchError> {
        let questions = with_retries(self.max_retries, self.retry_delay, || self.attempt()).await?;
        info!(count = questions.len(), "loaded trivia questions");
        Ok(questions)
    }

    /// One HTTP round trip, no retry.
    async fn attempt(&self) -> Result<Vec<Question>, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("amount", self.batch_size.to_string().as_str()),
                ("difficulty", self.difficulty.as_str()),
                ("type", "boolean"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Transport(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        parse_payload(&body)
    }
}

impl Default for TriviaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `op` until it succeeds, retrying transport failures up to
/// `max_retries` times with `delay` between attempts.
async fn with_retries<T, F, Fut>(
    max_retries: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, FetchError>>,
{
    let attempts = max_retries + 1;
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                warn!(attempt, error = %e, "trivia fetch attempt failed");
                last_error = e.to_string();
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
            Err(e) => return Err(e),
        }
    }

    Err(FetchError::Unavailable {
        attempts,
        last_error,
    })
}

/// Parse an API response body into domain questions.
///
/// The body is `{ "results": [{ "question", "correct_answer" }, ...] }`;
/// `correct_answer` is the string `"true"` or `"false"` in whatever casing
/// the server felt like, compared case-insensitively. An empty or missing
/// `results` array is rejected: the caller asked for a batch and got none.
fn parse_payload(body: &str) -> Result<Vec<Question>, FetchError> {
    let response: ApiResponse =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidPayload(e.to_string()))?;

    if response.results.is_empty() {
        return Err(FetchError::InvalidPayload(
            "no questions in response".to_string(),
        ));
    }

    Ok(response
        .results
        .into_iter()
        .map(|r| Question {
            text: r.question,
            correct_answer: r.correct_answer.eq_ignore_ascii_case("true"),
        })
        .collect())
}

// ============================================================================
// Internal API types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    results: Vec<ApiQuestion>,
}

#[derive(Debug, Deserialize)]
struct ApiQuestion {
    question: String,
    correct_answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    #[test]
    fn test_client_defaults() {
        let client = TriviaClient::new();
        assert_eq!(client.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(client.difficulty, Difficulty::Easy);
        assert_eq!(client.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(client.retry_delay, DEFAULT_RETRY_DELAY);
        assert_eq!(client.endpoint, API_BASE);
    }

    #[test]
    fn test_client_builder() {
        let client = TriviaClient::new()
            .with_endpoint("http://localhost:8080/api.php")
            .with_batch_size(10)
            .with_difficulty(Difficulty::Hard)
            .with_max_retries(5)
            .with_retry_delay(Duration::from_millis(100));

        assert_eq!(client.endpoint, "http://localhost:8080/api.php");
        assert_eq!(client.batch_size, 10);
        assert_eq!(client.difficulty, Difficulty::Hard);
        assert_eq!(client.max_retries, 5);
        assert_eq!(client.retry_delay, Duration::from_millis(100));
    }

    #[test]
    fn test_parse_payload_basic() {
        let body = r#"{
            "response_code": 0,
            "results": [
                {"question": "Is the sky blue?", "correct_answer": "True"},
                {"question": "Cats are reptiles.", "correct_answer": "False"}
            ]
        }"#;

        let questions = parse_payload(body).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "Is the sky blue?");
        assert!(questions[0].correct_answer);
        assert_eq!(questions[1].text, "Cats are reptiles.");
        assert!(!questions[1].correct_answer);
    }

    #[test]
    fn test_parse_payload_case_insensitive_answer() {
        for raw in ["True", "TRUE", "true", "tRuE"] {
            let body =
                format!(r#"{{"results": [{{"question": "Q", "correct_answer": "{raw}"}}]}}"#);
            let questions = parse_payload(&body).unwrap();
            assert!(questions[0].correct_answer, "expected {raw:?} to mean true");
        }

        let body = r#"{"results": [{"question": "Q", "correct_answer": "FALSE"}]}"#;
        assert!(!parse_payload(body).unwrap()[0].correct_answer);
    }

    #[test]
    fn test_parse_payload_preserves_order() {
        let body = r#"{"results": [
            {"question": "first", "correct_answer": "true"},
            {"question": "second", "correct_answer": "false"},
            {"question": "third", "correct_answer": "true"}
        ]}"#;

        let questions = parse_payload(body).unwrap();
        let texts: Vec<&str> = questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn test_parse_payload_empty_results() {
        let err = parse_payload(r#"{"response_code": 1, "results": []}"#).unwrap_err();
        assert!(matches!(err, FetchError::InvalidPayload(_)));
    }

    #[test]
    fn test_parse_payload_missing_results() {
        let err = parse_payload(r#"{"response_code": 1}"#).unwrap_err();
        assert!(matches!(err, FetchError::InvalidPayload(_)));
    }

    #[test]
    fn test_parse_payload_malformed_json() {
        let err = parse_payload("not json at all").unwrap_err();
        assert!(matches!(err, FetchError::InvalidPayload(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_on_third_attempt() {
        let calls = Cell::new(0u32);
        let started = Instant::now();
        let delay = Duration::from_secs(3);

        let result = with_retries(2, delay, || {
            let n = calls.get() + 1;
            calls.set(n);
            async move {
                if n < 3 {
                    Err(FetchError::Transport(format!("attempt {n} refused")))
                } else {
                    Ok(vec![Question {
                        text: "Q".to_string(),
                        correct_answer: true,
                    }])
                }
            }
        })
        .await;

        assert_eq!(result.unwrap().len(), 1);
        assert_eq!(calls.get(), 3);
        // Two transport failures means exactly two inter-attempt delays.
        let elapsed = started.elapsed();
        assert!(elapsed >= delay * 2, "expected two delays, got {elapsed:?}");
        assert!(elapsed < delay * 3, "expected only two delays, got {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion() {
        let calls = Cell::new(0u32);

        let result: Result<Vec<Question>, _> = with_retries(2, Duration::from_secs(3), || {
            calls.set(calls.get() + 1);
            async { Err(FetchError::Transport("connection refused".to_string())) }
        })
        .await;

        assert_eq!(calls.get(), 3);
        match result.unwrap_err() {
            FetchError::Unavailable {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("connection refused"));
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_payload_not_retried() {
        let calls = Cell::new(0u32);
        let started = Instant::now();

        let result: Result<Vec<Question>, _> = with_retries(2, Duration::from_secs(3), || {
            calls.set(calls.get() + 1);
            async { Err(FetchError::InvalidPayload("empty results".to_string())) }
        })
        .await;

        assert_eq!(calls.get(), 1);
        assert!(started.elapsed() < Duration::from_secs(3), "no delay expected");
        assert!(matches!(result.unwrap_err(), FetchError::InvalidPayload(_)));
    }
}
