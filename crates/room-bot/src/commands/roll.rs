//! Roll command - rolls dice.

use crate::commands::Command;
use crate::error::{CommandError, CommandResult};
use crate::notifier::Notifier;
use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

const CANNOT_ROLL: &str = "I don't know how to roll that.";

/// Upper bound on dice per invocation, across all arguments.
pub const MAX_DICE: u32 = 100;

/// A `<count>d<sides>` roll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceSpec {
    pub count: u32,
    pub sides: u32,
}

impl DiceSpec {
    /// Parse `<count>d<sides>`, e.g. `2d6`.
    pub fn parse(arg: &str) -> CommandResult<Self> {
        let lowered = arg.to_ascii_lowercase();
        let parts: Vec<&str> = lowered.split('d').collect();
        let [count, sides] = parts.as_slice() else {
            return Err(CommandError::MalformedArgument(format!(
                "expected <count>d<sides>, got {:?}",
                arg
            )));
        };

        let count: u32 = count
            .parse()
            .map_err(|_| CommandError::MalformedArgument(format!("bad dice count in {:?}", arg)))?;
        let sides: u32 = sides
            .parse()
            .map_err(|_| CommandError::MalformedArgument(format!("bad side count in {:?}", arg)))?;

        if count == 0 {
            return Err(CommandError::MalformedArgument("zero dice".into()));
        }
        if sides < 2 {
            return Err(CommandError::MalformedArgument(format!(
                "a die needs at least two sides, got {}",
                sides
            )));
        }

        Ok(Self { count, sides })
    }
}

/// Parse every argument, defaulting to one six-sided die.
pub fn parse_dice(args: &[String]) -> CommandResult<Vec<DiceSpec>> {
    if args.is_empty() {
        return Ok(vec![DiceSpec { count: 1, sides: 6 }]);
    }

    let specs = args
        .iter()
        .map(|arg| DiceSpec::parse(arg))
        .collect::<CommandResult<Vec<_>>>()?;

    let total: u64 = specs.iter().map(|s| u64::from(s.count)).sum();
    if total > u64::from(MAX_DICE) {
        return Err(CommandError::MalformedArgument(format!(
            "{} dice requested, limit is {}",
            total, MAX_DICE
        )));
    }

    Ok(specs)
}

/// Roll every die, each uniform over `[1, sides]`.
pub fn roll_all(specs: &[DiceSpec]) -> Vec<u32> {
    let mut rng = rand::thread_rng();
    specs
        .iter()
        .flat_map(|spec| std::iter::repeat(spec.sides).take(spec.count as usize))
        .map(|sides| rng.gen_range(1..=sides))
        .collect()
}

/// Format results the way the room sees them.
pub fn format_results(results: &[u32]) -> String {
    match results {
        [single] => format!("Your result: {}", single),
        _ => {
            let total: u64 = results.iter().map(|&r| u64::from(r)).sum();
            let listed = results
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("Your results: {} (total of {})", listed, total)
        }
    }
}

pub struct RollCommand;

impl RollCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RollCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for RollCommand {
    fn name(&self) -> &str {
        "roll"
    }

    async fn execute(&self, args: &[String], _notifier: &Notifier) -> CommandResult<String> {
        match parse_dice(args) {
            Ok(specs) => Ok(format_results(&roll_all(&specs))),
            Err(e) => {
                debug!("Roll rejected: {}", e);
                Ok(CANNOT_ROLL.into())
            }
        }
    }
}
