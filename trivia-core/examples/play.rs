//! Play a trivia session in the terminal against live questions.
//!
//! Run with: `cargo run -p trivia-core --example play`

use std::io::{self, BufRead, Write};

use opentdb::TriviaClient;
use trivia_core::{
    Actor, AnswerOutcome, BeginOutcome, EncounterController, GameState, Presenter, QuestionCache,
    QuestionQueue,
};

struct Fighter {
    name: &'static str,
}

impl Actor for Fighter {
    fn stop_movement(&mut self) {}

    fn resume_movement(&mut self) {}

    fn trigger_success_cue(&mut self) {
        println!("{} strikes!", self.name);
    }

    fn trigger_defeat_cue(&mut self) {
        println!("{} vanishes in a puff of smoke.", self.name);
    }
}

#[derive(Default)]
struct Scoreboard {
    score: u32,
    paused: bool,
}

impl GameState for Scoreboard {
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
        self.paused = true;
    }

    fn resume_session(&mut self) {
        self.paused = false;
    }

    fn restart_session(&mut self) {
        self.score = 0;
        self.paused = false;
    }
}

struct Console;

impl Presenter for Console {
    fn show_question(&mut self, text: &str, answer_labels: [&str; 2]) {
        println!("\n{text}  [{} / {}]", answer_labels[0], answer_labels[1]);
    }

    fn show_score(&mut self, value: u32) {
        println!("Score: {value}");
    }

    fn show_game_over(&mut self, final_score: u32) {
        println!("Game Over! Total: {final_score}");
    }

    fn hide_question_panel(&mut self) {}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = TriviaClient::new().with_batch_size(10);
    let cache = QuestionCache::new();

    let mut queue = QuestionQueue::new();
    match queue.initialize(&cache, &client).await {
        Ok(count) => println!("Loaded {count} questions."),
        Err(e) => {
            eprintln!("No questions available: {e}");
            return Ok(());
        }
    }

    let mut controller = EncounterController::new(queue, Scoreboard::default(), Console);
    let mut player = Fighter { name: "You" };
    let mut goblin = Fighter { name: "The goblin" };

    let stdin = io::stdin();
    loop {
        match controller.begin_encounter(&mut player, &mut goblin)? {
            BeginOutcome::OutOfQuestions => {
                println!("\nYou cleared every question. Final score: {}", controller.game().score());
                break;
            }
            BeginOutcome::Presented { .. } => {}
        }

        print!("(t)rue or (f)alse? ");
        io::stdout().flush()?;
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        let selected = !line.trim().eq_ignore_ascii_case("f");

        match controller.submit_answer(selected, &mut player, &mut goblin)? {
            AnswerOutcome::Correct { .. } => {}
            AnswerOutcome::GameOver { .. } => break,
        }
    }

    Ok(())
}
