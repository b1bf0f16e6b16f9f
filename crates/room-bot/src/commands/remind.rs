//! Remind command - schedules messages to the room.

use crate::commands::Command;
use crate::error::CommandResult;
use crate::notifier::Notifier;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::debug;

const NOT_UNDERSTOOD: &str = "I don't understand this reminder command.";
const NONE_SET: &str = "No reminders currently set.";

/// How a reminder's trigger time was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Absolute UTC time.
    On(DateTime<Utc>),
    /// Delay from now.
    After(Duration),
}

impl Trigger {
    /// Parse the `on <datetime>` / `after <H:M:S>` pair.
    pub fn parse(mode: &str, value: &str) -> Option<Self> {
        match mode.to_lowercase().as_str() {
            "on" => parse_datetime(value).map(Trigger::On),
            "after" => parse_delay(value).map(Trigger::After),
            _ => None,
        }
    }
}

/// RFC 3339, or `YYYY-MM-DDTHH:MM[:SS]` / `YYYY-MM-DD` taken as UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Some(Utc.from_utc_datetime(&naive))
}

/// `S`, `M:S` or `H:M:S`, each a non-negative integer.
pub fn parse_delay(value: &str) -> Option<Duration> {
    let parts = value
        .split(':')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let secs = parts
        .iter()
        .rev()
        .zip([1u64, 60, 3600])
        .try_fold(0u64, |acc, (&n, unit)| acc.checked_add(n.checked_mul(unit)?))?;
    Some(Duration::from_secs(secs))
}

struct Reminder {
    key: u64,
    id: String,
    at: DateTime<Utc>,
    message: String,
    timer: AbortHandle,
}

#[derive(Default)]
struct Reminders {
    next_key: u64,
    pending: Vec<Reminder>,
}

impl Drop for Reminders {
    fn drop(&mut self) {
        for reminder in &self.pending {
            reminder.timer.abort();
        }
    }
}

pub struct RemindCommand {
    reminders: Arc<Mutex<Reminders>>,
}

impl RemindCommand {
    pub fn new() -> Self {
        Self {
            reminders: Arc::new(Mutex::new(Reminders::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Reminders> {
        self.reminders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of reminders waiting to fire.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    fn list(&self) -> String {
        let reminders = self.lock();
        if reminders.pending.is_empty() {
            return NONE_SET.into();
        }

        let mut text = String::from("Pending reminders for this room: ");
        for r in &reminders.pending {
            text.push_str(&format!(
                "\n{}:\n    Triggering at {}\n    {}",
                r.id,
                r.at.format("%Y-%m-%d %H:%M:%S UTC"),
                r.message
            ));
        }
        text
    }

    fn add(&self, id: &str, trigger: Trigger, message: String, notifier: &Notifier) -> String {
        let now = Utc::now();
        let (at, delay) = match trigger {
            Trigger::On(at) => (at, (at - now).to_std().unwrap_or(Duration::ZERO)),
            Trigger::After(delay) => {
                let at = chrono::Duration::from_std(delay)
                    .ok()
                    .and_then(|d| now.checked_add_signed(d));
                match at {
                    Some(at) => (at, delay),
                    None => return NOT_UNDERSTOOD.into(),
                }
            }
        };

        let mut reminders = self.lock();
        let key = reminders.next_key;
        reminders.next_key += 1;

        let weak = Arc::downgrade(&self.reminders);
        let notifier = notifier.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(&weak, key, &notifier);
        })
        .abort_handle();

        debug!(id = %id, %at, "Reminder scheduled");
        reminders.pending.push(Reminder {
            key,
            id: id.to_string(),
            at,
            message,
            timer,
        });

        format!("Reminder with ID {} set.", id)
    }

    fn remove(&self, ids: &[String]) -> String {
        let mut reminders = self.lock();
        reminders.pending.retain(|r| {
            let keep = !ids.contains(&r.id);
            if !keep {
                r.timer.abort();
            }
            keep
        });
        "Reminder(s) removed.".into()
    }
}

impl Default for RemindCommand {
    fn default() -> Self {
        Self::new()
    }
}

fn fire(reminders: &Weak<Mutex<Reminders>>, key: u64, notifier: &Notifier) {
    let Some(reminders) = reminders.upgrade() else {
        return;
    };
    let mut reminders = reminders.lock().unwrap_or_else(PoisonError::into_inner);
    let Some(pos) = reminders.pending.iter().position(|r| r.key == key) else {
        return;
    };
    let reminder = reminders.pending.remove(pos);
    notifier.dispatch(format!("REMINDER: {}", reminder.message));
}

#[async_trait]
impl Command for RemindCommand {
    fn name(&self) -> &str {
        "remind"
    }

    async fn execute(&self, args: &[String], notifier: &Notifier) -> CommandResult<String> {
        let action = args.first().map(|a| a.to_lowercase()).unwrap_or_default();

        let response = match (action.as_str(), &args[args.len().min(1)..]) {
            ("list", _) => self.list(),
            ("add", [id, mode, value, message @ ..]) if !message.is_empty() => {
                match Trigger::parse(mode, value) {
                    Some(trigger) => self.add(id, trigger, message.join(" "), notifier),
                    None => NOT_UNDERSTOOD.into(),
                }
            }
            ("remove", ids) if !ids.is_empty() => self.remove(ids),
            _ => NOT_UNDERSTOOD.into(),
        };

        Ok(response)
    }
}
