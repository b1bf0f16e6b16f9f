//! Open Trivia DB types.

use crate::error::TriviaError;
use serde::Deserialize;
use std::fmt;
use urlencoding::decode;

/// Maximum number of questions the API hands out per request.
pub const MAX_AMOUNT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    Multiple,
    Boolean,
}

impl QuestionType {
    pub fn as_param(&self) -> &'static str {
        match self {
            QuestionType::Multiple => "multiple",
            QuestionType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_param(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Filters for a question request. `None` means any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    pub amount: u32,
    pub difficulty: Option<Difficulty>,
    pub question_type: Option<QuestionType>,
}

impl QuestionQuery {
    pub fn new(amount: u32) -> Self {
        Self {
            amount: amount.clamp(1, MAX_AMOUNT),
            difficulty: None,
            question_type: None,
        }
    }

    /// Query string parameters, in request order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("amount", self.amount.to_string())];
        if let Some(difficulty) = self.difficulty {
            params.push(("difficulty", difficulty.as_param().into()));
        }
        if let Some(kind) = self.question_type {
            params.push(("type", kind.as_param().into()));
        }
        params.push(("encode", "url3986".into()));
        params
    }
}

/// API response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub response_code: i64,
    #[serde(default)]
    pub results: Vec<Question>,
}

/// A single trivia question.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl Question {
    /// Decode the RFC 3986 percent-encoded text fields.
    pub fn decoded(self) -> Result<Self, TriviaError> {
        Ok(Self {
            category: decode_field(&self.category)?,
            kind: decode_field(&self.kind)?,
            difficulty: decode_field(&self.difficulty)?,
            question: decode_field(&self.question)?,
            correct_answer: decode_field(&self.correct_answer)?,
            incorrect_answers: self
                .incorrect_answers
                .iter()
                .map(|a| decode_field(a))
                .collect::<Result<_, _>>()?,
        })
    }
}

fn decode_field(value: &str) -> Result<String, TriviaError> {
    decode(value)
        .map(|s| s.into_owned())
        .map_err(|e| TriviaError::Encoding(format!("{}: {}", value, e)))
}
