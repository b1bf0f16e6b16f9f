//! Room bot - per-room commands, trivia games and reminders over Signal.

pub mod commands;
pub mod config;
pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod notifier;
pub mod session;
pub mod transport;
