//! Common test utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use room_bot::commands::trivia::TriviaDefaults;
use room_bot::dispatcher::{CommandContext, InvocationCounter};
use room_bot::transport::Transport;
use signal_client::{RoomMessage, SignalError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use trivia_client::{Question, QuestionProvider, QuestionQuery, TriviaError};

pub const PREFIX: &str = "!bot";

/// Serves a fixed question set after an optional delay.
pub struct StubQuestions {
    pub questions: Vec<Question>,
    pub delay: Duration,
}

impl StubQuestions {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            delay: Duration::ZERO,
        }
    }

    pub fn slow(questions: Vec<Question>, delay: Duration) -> Self {
        Self { questions, delay }
    }
}

#[async_trait]
impl QuestionProvider for StubQuestions {
    async fn fetch_questions(&self, query: &QuestionQuery) -> Result<Vec<Question>, TriviaError> {
        tokio::time::sleep(self.delay).await;
        Ok(self
            .questions
            .iter()
            .take(query.amount as usize)
            .cloned()
            .collect())
    }
}

pub fn question(text: &str, answer: &str, wrong: &[&str]) -> Question {
    Question {
        category: "Science: Computers".into(),
        kind: if wrong.len() == 1 { "boolean" } else { "multiple" }.into(),
        difficulty: "medium".into(),
        question: text.into(),
        correct_answer: answer.into(),
        incorrect_answers: wrong.iter().map(|w| w.to_string()).collect(),
    }
}

pub fn context(questions: impl QuestionProvider + 'static) -> CommandContext {
    CommandContext {
        prefix: PREFIX.into(),
        bot_name: "roombot".into(),
        process_invocations: Arc::new(InvocationCounter::new()),
        questions: Arc::new(questions),
        trivia: TriviaDefaults::default(),
    }
}

/// Transport that records what was sent to each room.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
    receipt_delay: Duration,
}

impl RecordingTransport {
    /// Read receipts take `delay` to complete.
    pub fn with_receipt_delay(delay: Duration) -> Self {
        Self {
            receipt_delay: delay,
            ..Self::default()
        }
    }

    pub fn sent_to(&self, room_id: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(room, _)| room == room_id)
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_message(&self, room_id: &str, body: &str) -> Result<(), SignalError> {
        self.sent
            .lock()
            .unwrap()
            .push((room_id.to_string(), body.to_string()));
        Ok(())
    }

    async fn display_name(&self, user_id: &str) -> String {
        user_id.to_string()
    }

    async fn mark_read(&self, _message: &RoomMessage) -> Result<(), SignalError> {
        tokio::time::sleep(self.receipt_delay).await;
        Ok(())
    }
}

pub fn message(room_id: &str, sender: &str, body: &str) -> RoomMessage {
    RoomMessage {
        room_id: room_id.into(),
        sender_id: format!("id-{}", sender.to_lowercase()),
        sender_name: Some(sender.into()),
        body: body.into(),
        timestamp: 1_700_000_000_000,
        is_group: true,
        is_own: false,
    }
}

/// Let spawned tasks catch up without moving the clock.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
