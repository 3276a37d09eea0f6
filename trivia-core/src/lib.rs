//! True/false trivia encounter engine.
//!
//! This crate provides:
//! - A process-wide question cache fed by the Open Trivia DB client
//! - A session-scoped FIFO question queue
//! - An encounter state machine that scores answers and drives the
//!   game-over/restart flow through injected collaborators
//!
//! # Quick Start
//!
//! ```ignore
//! use opentdb::TriviaClient;
//! use trivia_core::{EncounterController, QuestionCache, QuestionQueue};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TriviaClient::new();
//!     let cache = QuestionCache::new();
//!
//!     let mut queue = QuestionQueue::new();
//!     queue.initialize(&cache, &client).await?;
//!
//!     let mut controller = EncounterController::new(queue, game_state, presenter);
//!     controller.begin_encounter(&mut player, &mut opponent)?;
//!     controller.submit_answer(true, &mut player, &mut opponent)?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod encounter;
pub mod queue;
pub mod source;
pub mod testing;

// Re-export the domain types from the API client crate
pub use opentdb::{FetchError, Question};

// Primary public API
pub use cache::QuestionCache;
pub use encounter::{
    Actor, AnswerOutcome, BeginOutcome, EncounterController, EncounterError, EncounterState,
    GameState, Presenter, ANSWER_LABELS,
};
pub use queue::QuestionQueue;
pub use source::QuestionSource;
