//! Bot commands.

mod about;
mod help;
mod null;
mod remind;
mod roll;
mod status;
pub mod trivia;

pub use about::AboutCommand;
pub use help::HelpCommand;
pub use null::NullCommand;
pub use remind::RemindCommand;
pub use roll::RollCommand;
pub use status::StatusCommand;
pub use trivia::TriviaCommand;

use crate::error::CommandResult;
use crate::notifier::Notifier;
use async_trait::async_trait;

/// A command that can be invoked in a room.
///
/// Each room gets its own instances, so implementations may keep room-scoped
/// state. A command answers with a response string (empty for none) and may
/// keep talking to the room later through the notifier.
#[async_trait]
pub trait Command: Send + Sync {
    /// Command name as typed after the prefix (e.g. "roll").
    fn name(&self) -> &str;

    /// Execute the command.
    async fn execute(&self, args: &[String], notifier: &Notifier) -> CommandResult<String>;
}
