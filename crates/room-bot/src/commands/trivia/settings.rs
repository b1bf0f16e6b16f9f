//! Trivia command arguments.

use std::time::Duration;
use trivia_client::{Difficulty, QuestionQuery, QuestionType, MAX_AMOUNT};

/// Trivia defaults applied when a game is started without overrides.
#[derive(Debug, Clone)]
pub struct TriviaDefaults {
    pub round_duration: Duration,
    pub rounds: u32,
    /// Extra time on each round timer to absorb message delivery lag.
    pub grace_period: Duration,
}

impl Default for TriviaDefaults {
    fn default() -> Self {
        Self {
            round_duration: Duration::from_secs(30),
            rounds: 3,
            grace_period: Duration::from_millis(500),
        }
    }
}

/// Settings for one invocation of the trivia command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub stop: bool,
    pub round_duration: Duration,
    pub rounds: u32,
    pub question_type: Option<QuestionType>,
    pub difficulty: Option<Difficulty>,
}

impl GameSettings {
    /// Parse arguments on top of the defaults.
    ///
    /// Keywords are case-insensitive. A keyword with a missing or invalid
    /// value leaves the default in place. With `stop` present nothing else
    /// matters.
    pub fn parse(args: &[String], defaults: &TriviaDefaults) -> Self {
        let args: Vec<String> = args.iter().map(|a| a.to_lowercase()).collect();
        let mut settings = Self {
            stop: false,
            round_duration: defaults.round_duration,
            rounds: defaults.rounds.clamp(1, MAX_AMOUNT),
            question_type: None,
            difficulty: None,
        };

        if args.iter().any(|a| a == "stop") {
            settings.stop = true;
            return settings;
        }

        if let Some(secs) = value_after(&args, "timer").and_then(positive_number) {
            settings.round_duration = Duration::from_secs(u64::from(secs));
        }

        if let Some(rounds) = value_after(&args, "rounds").and_then(positive_number) {
            settings.rounds = rounds.min(MAX_AMOUNT);
        }

        if let Some(kind) = value_after(&args, "type") {
            match kind {
                "at" => settings.question_type = None,
                "tf" => settings.question_type = Some(QuestionType::Boolean),
                "mc" => settings.question_type = Some(QuestionType::Multiple),
                _ => {}
            }
        }

        if let Some(level) = value_after(&args, "difficulty") {
            match level {
                "any" => settings.difficulty = None,
                "easy" => settings.difficulty = Some(Difficulty::Easy),
                "medium" => settings.difficulty = Some(Difficulty::Medium),
                "hard" => settings.difficulty = Some(Difficulty::Hard),
                _ => {}
            }
        }

        settings
    }

    pub fn query(&self) -> QuestionQuery {
        QuestionQuery {
            amount: self.rounds,
            difficulty: self.difficulty,
            question_type: self.question_type,
        }
    }
}

/// The token following the first occurrence of `keyword`.
fn value_after<'a>(args: &'a [String], keyword: &str) -> Option<&'a str> {
    let i = args.iter().position(|a| a == keyword)?;
    args.get(i + 1).map(String::as_str)
}

fn positive_number(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|&n| n > 0)
}
