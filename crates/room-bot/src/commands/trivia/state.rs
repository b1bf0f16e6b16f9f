//! Trivia game state, answer matching and scoring.

use crate::notifier::ListenerId;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use trivia_client::Question;

/// Option labels, in display order. Questions never show more options.
pub const OPTION_LABELS: [char; 4] = ['a', 'b', 'c', 'd'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Waiting on the question provider.
    Fetching,
    /// Round `round` (0-based) is open for answers.
    Running { round: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScore {
    pub id: String,
    pub name: String,
    pub score: u32,
    /// 0-based indices of the rounds this player scored in.
    pub rounds_won: Vec<usize>,
    /// Whether the player's latest answer this round is correct.
    pub correct_this_round: bool,
}

/// A question as shown to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedRound {
    pub options: Vec<String>,
    pub correct_label: char,
    pub correct_answer: String,
}

impl PresentedRound {
    /// Shuffle the answers and label them.
    ///
    /// At most three incorrect answers are kept, so the correct answer always
    /// gets a label.
    pub fn new<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Self {
        let mut answers: Vec<(bool, &str)> = question
            .incorrect_answers
            .iter()
            .take(OPTION_LABELS.len() - 1)
            .map(|a| (false, a.as_str()))
            .collect();
        answers.push((true, question.correct_answer.as_str()));
        answers.shuffle(rng);

        let correct_index = answers.iter().position(|(correct, _)| *correct).unwrap_or(0);

        Self {
            options: answers.into_iter().map(|(_, a)| a.to_string()).collect(),
            correct_label: OPTION_LABELS[correct_index],
            correct_answer: question.correct_answer.clone(),
        }
    }

    /// Whether a chat line picks the correct option.
    ///
    /// Accepted, ignoring case and surrounding whitespace: the label (`b`,
    /// `b.`), the answer text, or the label followed by the answer text
    /// (`b. Paris`, `b Paris`, `b.Paris`).
    pub fn is_correct(&self, message: &str) -> bool {
        let message = message.trim().to_lowercase();
        let answer = self.correct_answer.trim().to_lowercase();
        let label = self.correct_label.to_string();

        if message == answer {
            return true;
        }

        let Some(rest) = message.strip_prefix(label.as_str()) else {
            return false;
        };
        let rest = rest.strip_prefix('.').unwrap_or(rest);
        if rest.is_empty() {
            return true;
        }
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        rest == answer
    }
}

/// Room-scoped trivia state. Guarded by a mutex in the command.
///
/// Only the game itself moves the state along:
///
/// ```compile_fail
/// let mut state = room_bot::commands::trivia::GameState::default();
/// state.generation += 1;
/// ```
#[derive(Debug)]
pub struct GameState {
    pub(crate) phase: Phase,
    /// Bumped whenever a game starts or ends; timers from older games compare
    /// against it and do nothing.
    pub(crate) generation: u64,
    pub(crate) round_duration: Duration,
    pub(crate) questions: Vec<Question>,
    pub(crate) current: Option<PresentedRound>,
    pub(crate) players: Vec<PlayerScore>,
    pub(crate) listener: Option<ListenerId>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            round_duration: Duration::ZERO,
            questions: Vec::new(),
            current: None,
            players: Vec::new(),
            listener: None,
        }
    }
}

impl GameState {
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Whether a timer armed for `round` of game `generation` still applies.
    pub fn is_current_round(&self, generation: u64, round: usize) -> bool {
        self.generation == generation && self.phase == Phase::Running { round }
    }

    /// Record a player's latest answer for the open round.
    ///
    /// A correct answer creates the player on first sight; an incorrect one
    /// only clears the flag of a player already tracked. Returns `None` when no
    /// round is open.
    pub fn record_answer(&mut self, sender_id: &str, sender_name: &str, body: &str) -> Option<bool> {
        let Phase::Running { .. } = self.phase else {
            return None;
        };
        let correct = self.current.as_ref()?.is_correct(body);

        match self.players.iter_mut().find(|p| p.id == sender_id) {
            Some(player) => {
                player.correct_this_round = correct;
                if correct {
                    player.name = sender_name.to_string();
                }
            }
            None if correct => self.players.push(PlayerScore {
                id: sender_id.to_string(),
                name: sender_name.to_string(),
                score: 0,
                rounds_won: Vec::new(),
                correct_this_round: true,
            }),
            None => {}
        }

        Some(correct)
    }

    /// Award the round to flagged players and reset every flag.
    ///
    /// Returns the names of the players who scored.
    pub fn score_round(&mut self, round: usize) -> Vec<String> {
        let mut scored = Vec::new();
        for player in &mut self.players {
            if player.correct_this_round {
                player.score += 1;
                player.rounds_won.push(round);
                scored.push(player.name.clone());
            }
            player.correct_this_round = false;
        }
        scored
    }

    /// All players tied for the highest score, with that score.
    pub fn winners(&self) -> Option<(Vec<String>, u32)> {
        let best = self.players.iter().map(|p| p.score).max()?;
        let names = self
            .players
            .iter()
            .filter(|p| p.score == best)
            .map(|p| p.name.clone())
            .collect();
        Some((names, best))
    }
}

/// Text announcing a round's question.
pub fn round_announcement(
    round: usize,
    total: usize,
    question: &Question,
    presented: &PresentedRound,
) -> String {
    let mut text = format!(
        "{}/{} | {} : {} difficulty\n{}",
        round + 1,
        total,
        question.category,
        question.difficulty,
        question.question
    );
    for (label, option) in OPTION_LABELS.iter().zip(&presented.options) {
        text.push_str(&format!("\n  {}. {}", label, option));
    }
    text
}

/// Text closing a round.
pub fn round_result(round: usize, presented: &PresentedRound, scored: &[String]) -> String {
    let mut text = format!(
        "Round {} ended. The correct answer was \"{}\". {}.",
        round + 1,
        presented.correct_label,
        presented.correct_answer
    );
    if !scored.is_empty() {
        text.push_str(&format!(" A point goes to {}.", scored.join(", ")));
    }
    text
}

/// Text closing a game.
pub fn conclusion(winners: Option<(Vec<String>, u32)>) -> String {
    match winners {
        Some((names, score)) => format!(
            "Trivia Game concluded. Winner(s): {} with {} points.",
            names.join(", "),
            score
        ),
        None => "Trivia Game concluded.".into(),
    }
}
