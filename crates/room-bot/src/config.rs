//! Application configuration loaded from environment variables.

use crate::commands::trivia::TriviaDefaults;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Signal configuration
    pub signal: SignalConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,

    /// Trivia configuration
    #[serde(default)]
    pub trivia: TriviaConfig,

    /// Display-name cache configuration
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalConfig {
    /// Signal CLI REST API endpoint
    #[serde(default = "default_signal_service")]
    pub service_url: String,

    /// Registered account the bot runs as
    pub phone_number: String,

    /// Poll interval for messages
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Name the bot introduces itself with
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Prefix that marks a line as a command
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriviaConfig {
    /// Question provider base URL
    #[serde(default = "default_trivia_url")]
    pub base_url: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_round_duration", with = "humantime_serde")]
    pub round_duration: Duration,

    /// Rounds per game unless overridden in the command
    #[serde(default = "default_rounds", deserialize_with = "number_from_string")]
    pub rounds: u32,

    /// Added to every round timer
    #[serde(default = "default_grace_period", with = "humantime_serde")]
    pub grace_period: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default = "default_max_entries", deserialize_with = "number_from_string")]
    pub max_entries: usize,

    /// How long a learned display name is trusted
    #[serde(default = "default_profile_ttl", with = "humantime_serde")]
    pub ttl: Duration,
}

// Default implementations
impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            command_prefix: default_command_prefix(),
            log_level: default_log_level(),
        }
    }
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            base_url: default_trivia_url(),
            timeout: default_timeout(),
            round_duration: default_round_duration(),
            rounds: default_rounds(),
            grace_period: default_grace_period(),
        }
    }
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl: default_profile_ttl(),
        }
    }
}

impl TriviaConfig {
    pub fn defaults(&self) -> TriviaDefaults {
        TriviaDefaults {
            round_duration: self.round_duration,
            rounds: self.rounds,
            grace_period: self.grace_period,
        }
    }
}

// Default value functions
fn default_signal_service() -> String {
    "http://signal-api:8080".into()
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(200)
}

fn default_bot_name() -> String {
    "roombot".into()
}

fn default_command_prefix() -> String {
    "!bot".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_trivia_url() -> String {
    "https://opentdb.com".into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_round_duration() -> Duration {
    Duration::from_secs(30)
}

fn default_rounds() -> u32 {
    3
}

fn default_grace_period() -> Duration {
    Duration::from_millis(500)
}

fn default_max_entries() -> usize {
    50
}

fn default_profile_ttl() -> Duration {
    Duration::from_secs(5 * 60)
}

/// Environment values arrive as strings because parsing is disabled.
fn number_from_string<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(serde::de::Error::custom)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_source(config::Environment::default().separator("__"))
    }

    fn from_source(env: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            // Parsing would turn +15551234567 into a number and drop the '+'.
            .add_source(env.try_parsing(false))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
