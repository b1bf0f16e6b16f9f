//! Status command - reports how busy the bot is.

use crate::commands::Command;
use crate::dispatcher::InvocationCounter;
use crate::error::CommandResult;
use crate::notifier::Notifier;
use async_trait::async_trait;
use std::sync::Arc;

pub struct StatusCommand {
    bot_name: String,
    process_invocations: Arc<InvocationCounter>,
}

impl StatusCommand {
    /// `process_invocations` is the counter shared by every room.
    pub fn new(bot_name: impl Into<String>, process_invocations: Arc<InvocationCounter>) -> Self {
        Self {
            bot_name: bot_name.into(),
            process_invocations,
        }
    }
}

#[async_trait]
impl Command for StatusCommand {
    fn name(&self) -> &str {
        "test"
    }

    async fn execute(&self, _args: &[String], _notifier: &Notifier) -> CommandResult<String> {
        // This invocation is itself in flight.
        let others = self.process_invocations.current().saturating_sub(1);
        Ok(format!(
            "{} is running with {} other room processes.",
            self.bot_name, others
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_status_excludes_itself() {
        let counter = Arc::new(InvocationCounter::new());
        let command = StatusCommand::new("roombot", Arc::clone(&counter));
        let (notifier, _rx) = Notifier::channel();

        let _other_room = counter.enter();
        let _this_call = counter.enter();

        let response = command.execute(&[], &notifier).await.unwrap();
        assert_eq!(response, "roombot is running with 1 other room processes.");
    }

    #[tokio::test]
    async fn test_status_outside_dispatch() {
        let command = StatusCommand::new("roombot", Arc::new(InvocationCounter::new()));
        let (notifier, _rx) = Notifier::channel();

        let response = command.execute(&[], &notifier).await.unwrap();
        assert_eq!(response, "roombot is running with 0 other room processes.");
    }
}
