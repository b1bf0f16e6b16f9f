//! About command - describes the bot.

use crate::commands::Command;
use crate::error::CommandResult;
use crate::notifier::Notifier;
use async_trait::async_trait;

pub struct AboutCommand {
    bot_name: String,
    prefix: String,
}

impl AboutCommand {
    pub fn new(bot_name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl Command for AboutCommand {
    fn name(&self) -> &str {
        "about"
    }

    async fn execute(&self, _args: &[String], _notifier: &Notifier) -> CommandResult<String> {
        Ok(format!(
            "{} is a personal bot that can do a few random things. Use \"{} help\" to see what commands are available.",
            self.bot_name, self.prefix
        ))
    }
}
