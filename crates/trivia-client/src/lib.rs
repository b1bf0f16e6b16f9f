//! Open Trivia Database client.
//!
//! Data provided by Open Trivia Database (https://opentdb.com) by PIXELTAIL
//! GAMES LLC, under CC BY-SA 4.0.

mod client;
mod error;
mod types;

pub use client::OpenTdbClient;
pub use error::{describe_response_code, TriviaError};
pub use types::*;

use async_trait::async_trait;

/// Attribution that must accompany any question shown to users.
pub const LICENSE_NOTICE: &str = "Data provided by Open Trivia Database (https://opentdb.com) by PIXELTAIL GAMES LLC, under CC BY-SA 4.0 (https://creativecommons.org/licenses/by-sa/4.0)";

/// Source of trivia questions.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetch questions for one game. One call per game.
    async fn fetch_questions(&self, query: &QuestionQuery) -> Result<Vec<Question>, TriviaError>;

    /// Short description of the request a query produces, for logs.
    fn describe(&self, query: &QuestionQuery) -> String {
        format!("{:?}", query)
    }
}
