//! Testing utilities for the trivia encounter engine.
//!
//! This module provides tools for integration testing:
//! - `ScriptedSource` for deterministic question acquisition without
//!   network calls
//! - Recording doubles for the actor, game-state, and presenter
//!   collaborators
//! - `QuizHarness` for scripted encounter scenarios

use crate::cache::QuestionCache;
use crate::encounter::{
    Actor, AnswerOutcome, BeginOutcome, EncounterController, EncounterError, EncounterState,
    GameState, Presenter,
};
use crate::queue::QuestionQueue;
use crate::source::QuestionSource;
use async_trait::async_trait;
use opentdb::{FetchError, Question};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build a question without the struct-literal noise.
pub fn question(text: impl Into<String>, correct_answer: bool) -> Question {
    Question {
        text: text.into(),
        correct_answer,
    }
}

// ============================================================================
// Scripted question source
// ============================================================================

enum Script {
    /// Every fetch succeeds with a copy of this batch.
    Batch(Vec<Question>),
    /// Every fetch fails as if retries were exhausted.
    Unavailable,
}

/// A [`QuestionSource`] that returns a scripted outcome and counts calls.
///
/// Use this for deterministic tests without network access; the call
/// count is how tests prove the cache short-circuited a fetch.
pub struct ScriptedSource {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedSource {
    /// A source whose every fetch succeeds with `batch`.
    pub fn with_batch(batch: Vec<Question>) -> Self {
        Self {
            script: Script::Batch(batch),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source whose every fetch reports exhausted retries.
    pub fn unavailable() -> Self {
        Self {
            script: Script::Unavailable,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `fetch` has been called.
    pub fn fetch_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn fetch(&self) -> Result<Vec<Question>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Batch(batch) => Ok(batch.clone()),
            Script::Unavailable => Err(FetchError::Unavailable {
                attempts: 3,
                last_error: "scripted outage".to_string(),
            }),
        }
    }
}

// ============================================================================
// Recording collaborators
// ============================================================================

/// One observable signal sent to an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorEvent {
    Stopped,
    Resumed,
    SuccessCue,
    DefeatCue,
}

/// An [`Actor`] that records every signal in order.
#[derive(Debug, Default)]
pub struct RecordingActor {
    events: Vec<ActorEvent>,
}

impl RecordingActor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signals received so far, oldest first.
    pub fn events(&self) -> &[ActorEvent] {
        &self.events
    }
}

impl Actor for RecordingActor {
    fn stop_movement(&mut self) {
        self.events.push(ActorEvent::Stopped);
    }

    fn resume_movement(&mut self) {
        self.events.push(ActorEvent::Resumed);
    }

    fn trigger_success_cue(&mut self) {
        self.events.push(ActorEvent::SuccessCue);
    }

    fn trigger_defeat_cue(&mut self) {
        self.events.push(ActorEvent::DefeatCue);
    }
}

/// A [`GameState`] double tracking score and session-flow calls.
#[derive(Debug, Default)]
pub struct RecordingGameState {
    score: u32,
    pauses: u32,
    resumes: u32,
    restarts: u32,
}

impl RecordingGameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause_count(&self) -> u32 {
        self.pauses
    }

    pub fn resume_count(&self) -> u32 {
        self.resumes
    }

    pub fn restart_count(&self) -> u32 {
        self.restarts
    }
}

impl GameState for RecordingGameState {
    fn add_score(&mut self, n: u32) {
        self.score += n;
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn reset_score(&mut self) {
        self.score = 0;
    }

    fn pause_session(&mut self) {
        self.pauses += 1;
    }

    fn resume_session(&mut self) {
        self.resumes += 1;
    }

    fn restart_session(&mut self) {
        // A real collaborator resets score and world state together.
        self.score = 0;
        self.restarts += 1;
    }
}

/// One observable notification sent to the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    ShowQuestion {
        text: String,
        answer_labels: [String; 2],
    },
    ShowScore(u32),
    ShowGameOver(u32),
    HidQuestionPanel,
}

/// A [`Presenter`] that records every notification in order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notifications received so far, oldest first.
    pub fn events(&self) -> &[PresenterEvent] {
        &self.events
    }
}

impl Presenter for RecordingPresenter {
    fn show_question(&mut self, text: &str, answer_labels: [&str; 2]) {
        self.events.push(PresenterEvent::ShowQuestion {
            text: text.to_string(),
            answer_labels: answer_labels.map(str::to_string),
        });
    }

    fn show_score(&mut self, value: u32) {
        self.events.push(PresenterEvent::ShowScore(value));
    }

    fn show_game_over(&mut self, final_score: u32) {
        self.events.push(PresenterEvent::ShowGameOver(final_score));
    }

    fn hide_question_panel(&mut self) {
        self.events.push(PresenterEvent::HidQuestionPanel);
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Harness for running scripted quiz scenarios.
pub struct QuizHarness {
    /// The controller under test.
    pub controller: EncounterController<RecordingGameState, RecordingPresenter>,
    /// The acting (answering) actor.
    pub player: RecordingActor,
    /// The opposing actor.
    pub opponent: RecordingActor,
    /// The shared cache the queue was seeded through.
    pub cache: QuestionCache,
    /// The scripted source behind the queue.
    pub source: ScriptedSource,
}

impl QuizHarness {
    /// Build a harness whose queue was seeded with `questions` through a
    /// fresh cache and scripted source.
    pub async fn with_questions(questions: Vec<Question>) -> Self {
        let cache = QuestionCache::new();
        let source = ScriptedSource::with_batch(questions);
        let mut queue = QuestionQueue::new();
        queue
            .initialize(&cache, &source)
            .await
            .expect("scripted seed cannot fail");

        Self {
            controller: EncounterController::new(
                queue,
                RecordingGameState::new(),
                RecordingPresenter::new(),
            ),
            player: RecordingActor::new(),
            opponent: RecordingActor::new(),
            cache,
            source,
        }
    }

    /// Begin an encounter with the harness actors.
    pub fn begin(&mut self) -> Result<BeginOutcome, EncounterError> {
        self.controller
            .begin_encounter(&mut self.player, &mut self.opponent)
    }

    /// Answer the pending question with the harness actors.
    pub fn answer(&mut self, selected: bool) -> Result<AnswerOutcome, EncounterError> {
        self.controller
            .submit_answer(selected, &mut self.player, &mut self.opponent)
    }

    /// Restart the session through the harness source and cache.
    pub async fn restart(&mut self) -> Result<usize, EncounterError> {
        self.controller.restart(&self.source, &self.cache).await
    }

    /// Current score as the game-state collaborator sees it.
    pub fn score(&self) -> u32 {
        self.controller.game().score()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the controller is in the expected state.
#[track_caller]
pub fn assert_state(harness: &QuizHarness, expected: EncounterState) {
    let actual = harness.controller.state();
    assert_eq!(actual, expected, "Expected state {expected}, got {actual}");
}

/// Assert the score collaborator holds the expected value.
#[track_caller]
pub fn assert_score(harness: &QuizHarness, expected: u32) {
    let actual = harness.score();
    assert_eq!(actual, expected, "Expected score {expected}, got {actual}");
}
