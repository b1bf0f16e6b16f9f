//! Trivia client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriviaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Request rejected with response code {code} ({reason})")]
    Rejected { code: i64, reason: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid field encoding: {0}")]
    Encoding(String),
}

impl TriviaError {
    /// Whether the provider could not be reached at all, as opposed to
    /// answering with something unusable.
    pub fn is_unavailable(&self) -> bool {
        match self {
            TriviaError::Http(_) => true,
            TriviaError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Human-readable meaning of an Open Trivia DB response code.
pub fn describe_response_code(code: i64) -> &'static str {
    match code {
        0 => "success",
        1 => "not enough questions for the query",
        2 => "invalid parameter",
        3 => "session token not found",
        4 => "session token exhausted",
        5 => "rate limited",
        _ => "unknown response code",
    }
}
