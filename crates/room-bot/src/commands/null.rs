//! Null command - answers unknown or empty commands.

use crate::commands::Command;
use crate::error::CommandResult;
use crate::notifier::Notifier;
use async_trait::async_trait;

pub struct NullCommand {
    prefix: String,
}

impl NullCommand {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl Command for NullCommand {
    fn name(&self) -> &str {
        ""
    }

    async fn execute(&self, _args: &[String], _notifier: &Notifier) -> CommandResult<String> {
        Ok(format!("Cmd? (\"{} help\" to list commands.)", self.prefix))
    }
}
