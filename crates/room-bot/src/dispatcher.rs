//! Per-room command dispatch.

use crate::commands::trivia::TriviaDefaults;
use crate::commands::*;
use crate::error::{CommandError, CommandResult};
use crate::notifier::Notifier;
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trivia_client::QuestionProvider;
use tracing::{debug, warn};

/// Count of command invocations currently in flight.
///
/// Purely informational. Increments are paired with decrements through
/// [`InvocationGuard`], so a failing command cannot leak a count.
#[derive(Debug, Default)]
pub struct InvocationCounter(AtomicUsize);

impl InvocationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Count one invocation until the returned guard is dropped.
    pub fn enter(self: &Arc<Self>) -> InvocationGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        InvocationGuard(Arc::clone(self))
    }
}

/// Decrements its counter on drop.
#[must_use = "the invocation is only counted while the guard is alive"]
pub struct InvocationGuard(Arc<InvocationCounter>);

impl Drop for InvocationGuard {
    fn drop(&mut self) {
        self.0 .0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Process-wide state every room's dispatcher is built from.
#[derive(Clone)]
pub struct CommandContext {
    pub prefix: String,
    pub bot_name: String,
    /// Shared by all rooms; reported by the status command.
    pub process_invocations: Arc<InvocationCounter>,
    pub questions: Arc<dyn QuestionProvider>,
    pub trivia: TriviaDefaults,
}

/// Resolves and runs commands for one room.
pub struct Dispatcher {
    prefix: String,
    notifier: Notifier,
    commands: HashMap<String, Arc<dyn Command>>,
    fallback: Arc<dyn Command>,
    room_invocations: Arc<InvocationCounter>,
    process_invocations: Arc<InvocationCounter>,
}

impl Dispatcher {
    /// Build a dispatcher with fresh command instances for one room.
    pub fn new(ctx: &CommandContext, notifier: Notifier) -> Self {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(StatusCommand::new(
                ctx.bot_name.clone(),
                Arc::clone(&ctx.process_invocations),
            )),
            Arc::new(AboutCommand::new(ctx.bot_name.clone(), ctx.prefix.clone())),
            Arc::new(HelpCommand::new(ctx.prefix.clone())),
            Arc::new(RollCommand::new()),
            Arc::new(TriviaCommand::new(
                Arc::clone(&ctx.questions),
                ctx.trivia.clone(),
            )),
            Arc::new(RemindCommand::new()),
        ];

        let commands = commands
            .into_iter()
            .map(|c| (c.name().to_lowercase(), c))
            .collect();

        Self {
            prefix: ctx.prefix.clone(),
            notifier,
            commands,
            fallback: Arc::new(NullCommand::new(ctx.prefix.clone())),
            room_invocations: Arc::new(InvocationCounter::new()),
            process_invocations: Arc::clone(&ctx.process_invocations),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Whether a line is addressed to the bot.
    pub fn is_command(&self, line: &str) -> bool {
        line.starts_with(&self.prefix)
    }

    /// Invocations of this room's commands currently in flight.
    pub fn in_flight(&self) -> usize {
        self.room_invocations.current()
    }

    /// Split a command line into a lower-cased command name and arguments.
    pub fn parse(&self, line: &str) -> CommandResult<(String, Vec<String>)> {
        let rest = line.trim().strip_prefix(self.prefix.as_str()).ok_or_else(|| {
            CommandError::InvalidInvocation(format!(
                "{:?} does not start with {:?}",
                line, self.prefix
            ))
        })?;

        let mut tokens = rest.split_whitespace();
        let name = tokens.next().unwrap_or_default().to_lowercase();
        let args = tokens.map(String::from).collect();
        Ok((name, args))
    }

    /// Run a command line and produce the response for the room.
    ///
    /// Only fails for lines that are not commands. Errors and panics inside
    /// a command are logged through the notifier and answered with a generic
    /// notice.
    pub async fn process(&self, line: &str) -> CommandResult<String> {
        let (name, args) = self.parse(line)?;
        let command = self.commands.get(&name).unwrap_or(&self.fallback);

        debug!(command = %name, args = args.len(), "Dispatching command");

        let _room = self.room_invocations.enter();
        let _process = self.process_invocations.enter();

        let outcome = AssertUnwindSafe(command.execute(&args, &self.notifier))
            .catch_unwind()
            .await;

        let error = match outcome {
            Ok(Ok(response)) => return Ok(response),
            Ok(Err(e)) => e,
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                CommandError::Internal(format!("command {:?} panicked: {}", name, detail))
            }
        };

        warn!(command = %name, "Command failed: {}", error);
        self.notifier
            .log_error(format!("Command {:?} failed: {}", name, error));
        Ok(error.user_message().into())
    }
}
