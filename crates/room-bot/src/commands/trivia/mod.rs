//! Trivia command - runs a timed multiple-choice game in a room.
//!
//! A game moves `Idle -> Fetching -> Running(0..n) -> Idle`. Each round is
//! closed by a timer task; every timer carries the generation of the game it
//! was armed for, so timers that outlive a stopped game fall through.

mod settings;
mod state;

pub use settings::{GameSettings, TriviaDefaults};
pub use state::{conclusion, GameState, Phase, PlayerScore, PresentedRound, OPTION_LABELS};

use crate::commands::Command;
use crate::error::{CommandError, CommandResult};
use crate::notifier::{IncomingMessage, Notifier};
use async_trait::async_trait;
use state::{round_announcement, round_result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, info};
use trivia_client::{Question, QuestionProvider, LICENSE_NOTICE};

const ALREADY_RUNNING: &str = "Trivia game is already in progress!";
const NOTHING_TO_STOP: &str = "There is no started trivia game to stop.";

pub struct TriviaCommand {
    game: Arc<TriviaGame>,
}

impl TriviaCommand {
    pub fn new(questions: Arc<dyn QuestionProvider>, defaults: TriviaDefaults) -> Self {
        Self {
            game: Arc::new(TriviaGame {
                questions,
                defaults,
                state: Mutex::new(GameState::default()),
            }),
        }
    }

    /// Current phase of this room's game.
    pub fn phase(&self) -> Phase {
        self.game.lock().phase
    }

    /// Snapshot of the tracked players.
    pub fn players(&self) -> Vec<PlayerScore> {
        self.game.lock().players.clone()
    }
}

#[async_trait]
impl Command for TriviaCommand {
    fn name(&self) -> &str {
        "trivia"
    }

    async fn execute(&self, args: &[String], notifier: &Notifier) -> CommandResult<String> {
        let settings = GameSettings::parse(args, &self.game.defaults);

        if settings.stop {
            return Ok(if self.game.stop(notifier) {
                String::new()
            } else {
                NOTHING_TO_STOP.into()
            });
        }

        Ok(match TriviaGame::start(&self.game, settings, notifier) {
            true => String::new(),
            false => ALREADY_RUNNING.into(),
        })
    }
}

struct TriviaGame {
    questions: Arc<dyn QuestionProvider>,
    defaults: TriviaDefaults,
    state: Mutex<GameState>,
}

impl TriviaGame {
    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Begin fetching questions for a new game. False if one is under way.
    fn start(game: &Arc<Self>, settings: GameSettings, notifier: &Notifier) -> bool {
        let generation = {
            let mut state = game.lock();
            if !state.is_idle() {
                return false;
            }
            state.phase = Phase::Fetching;
            state.generation += 1;
            state.round_duration = settings.round_duration;
            state.generation
        };

        let query = settings.query();
        notifier.log(format!(
            "Fetching data from '{}'",
            game.questions.describe(&query)
        ));

        let game = Arc::clone(game);
        let notifier = notifier.clone();
        tokio::spawn(async move {
            let fetched = game
                .questions
                .fetch_questions(&query)
                .await
                .map_err(CommandError::from)
                .and_then(|questions| {
                    if questions.is_empty() {
                        Err(CommandError::ProviderRejected("no questions returned".into()))
                    } else {
                        Ok(questions)
                    }
                });

            match fetched {
                Ok(questions) => TriviaGame::begin(&game, generation, questions, &notifier),
                Err(e) => game.abort_fetch(generation, e, &notifier),
            }
        });

        true
    }

    /// Move from `Fetching` to the first round.
    fn begin(game: &Arc<Self>, generation: u64, questions: Vec<Question>, notifier: &Notifier) {
        let mut state = game.lock();
        if state.generation != generation || state.phase != Phase::Fetching {
            debug!("Discarding questions for a stopped game");
            return;
        }

        state.questions = questions;
        state.players.clear();
        state.phase = Phase::Running { round: 0 };

        let weak = Arc::downgrade(game);
        let listener_notifier = notifier.clone();
        state.listener = Some(notifier.subscribe(Arc::new(move |msg: &IncomingMessage| {
            TriviaGame::on_message(&weak, msg, &listener_notifier);
        })));

        notifier.dispatch(format!(
            "Starting Trivia Game. {}.\n{} rounds, {} seconds per round.",
            LICENSE_NOTICE,
            state.questions.len(),
            state.round_duration.as_secs()
        ));
        info!(rounds = state.questions.len(), "Trivia game started");

        TriviaGame::open_round(game, &mut state, notifier);
    }

    fn abort_fetch(&self, generation: u64, error: CommandError, notifier: &Notifier) {
        let mut state = self.lock();
        if state.generation != generation || state.phase != Phase::Fetching {
            return;
        }
        state.phase = Phase::Idle;

        notifier.log_error(format!("Trivia fetch failed: {}", error));
        notifier.dispatch(error.user_message());
    }

    /// Announce the current round and arm its timer.
    fn open_round(game: &Arc<Self>, state: &mut GameState, notifier: &Notifier) {
        let Phase::Running { round } = state.phase else {
            return;
        };
        let Some(question) = state.questions.get(round) else {
            return;
        };

        let presented = PresentedRound::new(question, &mut rand::thread_rng());
        notifier.dispatch(round_announcement(
            round,
            state.questions.len(),
            question,
            &presented,
        ));
        state.current = Some(presented);

        let generation = state.generation;
        let delay = state.round_duration + game.defaults.grace_period;
        let game = Arc::clone(game);
        let notifier = notifier.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            TriviaGame::close_round(&game, generation, round, &notifier);
        });
    }

    /// Timer callback: score the round, then open the next or end the game.
    fn close_round(game: &Arc<Self>, generation: u64, round: usize, notifier: &Notifier) {
        let mut state = game.lock();
        if !state.is_current_round(generation, round) {
            debug!(round, "Ignoring timer for a finished round");
            return;
        }

        let scored = state.score_round(round);
        if let Some(presented) = &state.current {
            notifier.dispatch(round_result(round, presented, &scored));
        }

        if round + 1 >= state.questions.len() {
            Self::finish(&mut state, notifier);
        } else {
            state.phase = Phase::Running { round: round + 1 };
            TriviaGame::open_round(game, &mut state, notifier);
        }
    }

    /// Stop whatever is under way. False if the room was idle.
    fn stop(&self, notifier: &Notifier) -> bool {
        let mut state = self.lock();
        match state.phase {
            Phase::Idle => false,
            Phase::Fetching => {
                // The fetch result is dropped when it arrives.
                state.generation += 1;
                state.phase = Phase::Idle;
                notifier.dispatch(conclusion(None));
                true
            }
            Phase::Running { .. } => {
                Self::finish(&mut state, notifier);
                true
            }
        }
    }

    /// End the running game and announce the winners.
    fn finish(state: &mut GameState, notifier: &Notifier) {
        if let Some(id) = state.listener.take() {
            notifier.unsubscribe(id);
        }
        state.phase = Phase::Idle;
        state.generation += 1;
        state.current = None;

        info!(players = state.players.len(), "Trivia game concluded");
        notifier.dispatch(conclusion(state.winners()));
    }

    fn on_message(game: &Weak<Self>, msg: &IncomingMessage, notifier: &Notifier) {
        let Some(game) = game.upgrade() else {
            return;
        };
        let mut state = game.lock();
        if state
            .record_answer(&msg.sender_id, &msg.sender_name, &msg.body)
            .is_none()
        {
            notifier.log_error("Trivia game tried to read message while game wasn't running!");
        }
    }
}
