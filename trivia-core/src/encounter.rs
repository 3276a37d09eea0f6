//! The encounter state machine.
//!
//! One encounter is one question-and-answer exchange between a player and
//! an opponent: freeze both actors, present the next question, then score
//! the answer. A correct answer removes the opponent and returns to idle;
//! a wrong answer ends the session until an explicit restart.

use crate::cache::QuestionCache;
use crate::queue::QuestionQueue;
use crate::source::QuestionSource;
use opentdb::{FetchError, Question};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Answer labels shown for every true/false question.
pub const ANSWER_LABELS: [&str; 2] = ["True", "False"];

/// Where the session is in its encounter lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterState {
    /// No question is in flight; ready to begin an encounter.
    Idle,
    /// A question is displayed and waiting on an answer.
    AwaitingAnswer,
    /// A wrong answer ended the session; only `restart` leaves this state.
    GameOver,
}

impl fmt::Display for EncounterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncounterState::Idle => "Idle",
            EncounterState::AwaitingAnswer => "AwaitingAnswer",
            EncounterState::GameOver => "GameOver",
        };
        write!(f, "{name}")
    }
}

/// Errors from encounter operations.
#[derive(Debug, Error)]
pub enum EncounterError {
    /// A state-machine operation was called from the wrong state. This is
    /// a programming error in the caller and fails loudly rather than
    /// being silently ignored.
    #[error("Cannot {operation} from {state} state")]
    InvalidTransition {
        operation: &'static str,
        state: EncounterState,
    },

    /// Re-seeding the queue during restart failed. Recoverable: the
    /// session is restarted, just with an empty queue.
    #[error("Question acquisition failed: {0}")]
    Acquisition(#[from] FetchError),
}

/// Result of beginning an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    /// A question was presented; `remaining` counts what is left after it.
    Presented { remaining: usize },
    /// The queue is empty. Not an error: the caller should end the
    /// session positively ("no more content").
    OutOfQuestions,
}

/// Result of answering a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Right answer: score incremented, opponent defeated, back to idle.
    Correct { score: u32 },
    /// Wrong answer: session over. `final_score` is the score as it stood
    /// before the reset.
    GameOver { final_score: u32 },
}

/// An actor participating in an encounter (player or opponent).
///
/// Implementations live outside the core; these are fire-and-forget
/// signals into whatever representation the host gives its actors.
pub trait Actor {
    /// Freeze the actor while a question is pending.
    fn stop_movement(&mut self);
    /// Unfreeze the actor.
    fn resume_movement(&mut self);
    /// Cue for the acting actor when it wins an encounter.
    fn trigger_success_cue(&mut self) {}
    /// Cue for the losing actor as it is removed from play.
    fn trigger_defeat_cue(&mut self) {}
}

/// The external game-state collaborator that owns score and session flow.
pub trait GameState {
    fn add_score(&mut self, n: u32);
    fn score(&self) -> u32;
    fn reset_score(&mut self);
    fn pause_session(&mut self);
    fn resume_session(&mut self);
    fn restart_session(&mut self);
}

/// The presentation collaborator. Every call is a fire-and-forget
/// notification; the core never awaits a UI response. The UI answers by
/// calling back into [`EncounterController::submit_answer`].
pub trait Presenter {
    fn show_question(&mut self, text: &str, answer_labels: [&str; 2]);
    fn show_score(&mut self, value: u32);
    fn show_game_over(&mut self, final_score: u32);
    fn hide_question_panel(&mut self);
}

/// Drives encounters for one play session.
///
/// Owns the session's question queue plus the game-state and presenter
/// collaborators; the two actors of each encounter are passed per call,
/// since they belong to the host's world. The same actor pair must be
/// passed to the `submit_answer` that resolves a `begin_encounter`.
pub struct EncounterController<G: GameState, P: Presenter> {
    queue: QuestionQueue,
    game: G,
    presenter: P,
    state: EncounterState,
    current: Option<Question>,
}

impl<G: GameState, P: Presenter> EncounterController<G, P> {
    /// Create a controller over an already-initialized queue.
    pub fn new(queue: QuestionQueue, game: G, presenter: P) -> Self {
        Self {
            queue,
            game,
            presenter,
            state: EncounterState::Idle,
            current: None,
        }
    }

    /// Begin an encounter: freeze both actors and present the next
    /// question.
    ///
    /// Only valid from `Idle`. An empty queue is a no-op that reports
    /// [`BeginOutcome::OutOfQuestions`] and leaves the state unchanged.
    pub fn begin_encounter(
        &mut self,
        player: &mut dyn Actor,
        opponent: &mut dyn Actor,
    ) -> Result<BeginOutcome, EncounterError> {
        if self.state != EncounterState::Idle {
            return Err(self.invalid("begin an encounter"));
        }

        let Some(question) = self.queue.take_next() else {
            debug!("no questions left; encounter not started");
            return Ok(BeginOutcome::OutOfQuestions);
        };

        player.stop_movement();
        opponent.stop_movement();

        self.presenter.show_question(&question.text, ANSWER_LABELS);
        debug!(remaining = self.queue.remaining(), "question presented");

        self.current = Some(question);
        self.state = EncounterState::AwaitingAnswer;
        Ok(BeginOutcome::Presented {
            remaining: self.queue.remaining(),
        })
    }

    /// Resolve the pending question against the selected answer.
    ///
    /// Only valid from `AwaitingAnswer`. Both actors' movement is resumed
    /// before returning in either branch; keeping the world still after a
    /// wrong answer is the job of the session-level pause signal, not of
    /// actor state.
    pub fn submit_answer(
        &mut self,
        selected: bool,
        player: &mut dyn Actor,
        opponent: &mut dyn Actor,
    ) -> Result<AnswerOutcome, EncounterError> {
        if self.state != EncounterState::AwaitingAnswer {
            return Err(self.invalid("submit an answer"));
        }
        let Some(question) = self.current.take() else {
            return Err(self.invalid("submit an answer"));
        };

        let outcome = if selected == question.correct_answer {
            self.game.add_score(1);
            let score = self.game.score();

            opponent.trigger_defeat_cue();
            player.trigger_success_cue();
            self.presenter.hide_question_panel();
            self.presenter.show_score(score);

            self.state = EncounterState::Idle;
            debug!(score, "correct answer");
            AnswerOutcome::Correct { score }
        } else {
            // Capture the score for display before it is reset.
            let final_score = self.game.score();

            self.presenter.hide_question_panel();
            self.presenter.show_game_over(final_score);
            self.game.reset_score();
            self.game.pause_session();

            self.state = EncounterState::GameOver;
            info!(final_score, "wrong answer, game over");
            AnswerOutcome::GameOver { final_score }
        };

        player.resume_movement();
        opponent.resume_movement();

        Ok(outcome)
    }

    /// Restart after a game over.
    ///
    /// Clears any leftover question state, asks the game-state
    /// collaborator to restart, then re-seeds the queue through the
    /// normal acquisition path (cache first, network second). If
    /// acquisition fails the session is still restarted, just with an
    /// empty queue, and the failure is surfaced.
    pub async fn restart<S: QuestionSource + ?Sized>(
        &mut self,
        source: &S,
        cache: &QuestionCache,
    ) -> Result<usize, EncounterError> {
        if self.state != EncounterState::GameOver {
            return Err(self.invalid("restart"));
        }

        self.queue.clear();
        self.current = None;
        self.game.restart_session();
        self.state = EncounterState::Idle;
        info!("session restarted");

        let seeded = self.queue.initialize(cache, source).await?;
        Ok(seeded)
    }

    /// Current state of the encounter machine.
    pub fn state(&self) -> EncounterState {
        self.state
    }

    /// The question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// The session's question queue.
    pub fn queue(&self) -> &QuestionQueue {
        &self.queue
    }

    /// The game-state collaborator.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Mutable access to the game-state collaborator.
    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// The presenter collaborator.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn invalid(&self, operation: &'static str) -> EncounterError {
        EncounterError::InvalidTransition {
            operation,
            state: self.state,
        }
    }
}
