//! Application and command error types.

use thiserror::Error;
use trivia_client::TriviaError;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Signal error: {0}")]
    Signal(#[from] signal_client::SignalError),

    #[error("Trivia error: {0}")]
    Trivia(#[from] TriviaError),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised while handling a single command invocation.
///
/// None of these escape a room: the dispatcher logs them and answers with
/// [`CommandError::user_message`].
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid invocation: {0}")]
    InvalidInvocation(String),

    #[error("Question provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Question provider rejected the request: {0}")]
    ProviderRejected(String),

    #[error("Malformed argument: {0}")]
    MalformedArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommandError {
    /// What the room is told. Never includes internal detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            CommandError::InvalidInvocation(_) => "I can't understand that command.",
            CommandError::ProviderUnavailable(_) => {
                "Cannot start trivia game: Trivia API not available."
            }
            CommandError::ProviderRejected(_) => "Cannot start trivia game: Trivia API error.",
            CommandError::MalformedArgument(_) => "I don't understand those arguments.",
            CommandError::Internal(_) => "There was an error processing your command.",
        }
    }
}

impl From<TriviaError> for CommandError {
    fn from(e: TriviaError) -> Self {
        if e.is_unavailable() {
            CommandError::ProviderUnavailable(e.to_string())
        } else {
            CommandError::ProviderRejected(e.to_string())
        }
    }
}

/// Result type alias for command execution.
pub type CommandResult<T> = Result<T, CommandError>;
