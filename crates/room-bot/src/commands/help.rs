//! Help command - lists commands and their usage.

use crate::commands::Command;
use crate::error::CommandResult;
use crate::notifier::Notifier;
use async_trait::async_trait;

/// Listed commands in display order, with usage (after the prefix) and summary.
const LISTED_COMMANDS: &[(&str, &str, &str)] = &[
    (
        "help",
        "help [{command}]",
        "Lists help for commands, like it is doing right now.",
    ),
    (
        "roll",
        "roll [{count}d{sides}...]",
        "Rolls dice to give random values. Rolls one six-sided die by default.",
    ),
    (
        "trivia",
        "trivia [stop] [timer {seconds}] [rounds {count}] [type at|tf|mc] [difficulty any|easy|medium|hard]",
        "Runs a game of trivia, or stops an in-progress game if \"stop\" is passed.",
    ),
    (
        "remind",
        "remind list | add {id} on {datetime} {message} | add {id} after {H:M:S} {message} | remove {id}...",
        "Lists, sets or removes reminders for this room.",
    ),
    (
        "test",
        "test",
        "Tests the status of the bot. Lists the number of unreturned command processes.",
    ),
    ("about", "about", "Tells you what this bot is."),
];

pub struct HelpCommand {
    prefix: String,
}

impl HelpCommand {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Names of every listed command.
    pub fn command_names() -> Vec<&'static str> {
        LISTED_COMMANDS.iter().map(|(name, _, _)| *name).collect()
    }

    /// Usage entry for one command.
    pub fn usage(&self, command: &str) -> Option<String> {
        LISTED_COMMANDS
            .iter()
            .find(|(name, _, _)| *name == command)
            .map(|(_, usage, summary)| format!("{} {}\n - {}", self.prefix, usage, summary))
    }

    fn overview(&self) -> String {
        format!(
            "Use \"{} help {{command}}\" to see help about a particular command. Commands include:\n{}",
            self.prefix,
            Self::command_names().join(", ")
        )
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    async fn execute(&self, args: &[String], _notifier: &Notifier) -> CommandResult<String> {
        let requested = LISTED_COMMANDS
            .iter()
            .map(|(name, _, _)| *name)
            .find(|name| args.iter().any(|arg| arg.eq_ignore_ascii_case(name)));

        Ok(requested
            .and_then(|name| self.usage(name))
            .unwrap_or_else(|| self.overview()))
    }
}
