//! Room Bot - Main entry point.

use anyhow::Context;
use profile_cache::ProfileCache;
use room_bot::config::Config;
use room_bot::dispatcher::{CommandContext, InvocationCounter};
use room_bot::error::AppResult;
use room_bot::session::Bot;
use room_bot::transport::SignalTransport;
use signal_client::{MessageReceiver, SignalClient};
use std::sync::Arc;
use tokio::signal;
use tokio_stream::StreamExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trivia_client::OpenTdbClient;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level);

    info!("Starting {}...", config.bot.name);

    // Initialize clients
    let questions = Arc::new(OpenTdbClient::new(
        &config.trivia.base_url,
        config.trivia.timeout,
    )?);

    let signal = SignalClient::new(&config.signal.service_url, &config.signal.phone_number)?;

    let profiles = ProfileCache::new(config.profiles.max_entries, config.profiles.ttl);

    // Health checks
    if !signal.health_check().await {
        error!("Signal API not reachable at {}", config.signal.service_url);
        return Err(anyhow::anyhow!("Signal API not reachable").into());
    }
    info!("Signal API healthy");

    let transport = Arc::new(SignalTransport::new(signal.clone(), profiles));
    let ctx = CommandContext {
        prefix: config.bot.command_prefix.clone(),
        bot_name: config.bot.name.clone(),
        process_invocations: Arc::new(InvocationCounter::new()),
        questions,
        trivia: config.trivia.defaults(),
    };
    let mut bot = Bot::new(ctx, transport.clone());

    info!("Trivia provider: {}", config.trivia.base_url);
    info!(
        "Listening for messages as {} (prefix {:?})...",
        signal.phone_number(),
        config.bot.command_prefix
    );

    // Start message receiver
    let receiver = MessageReceiver::new(signal, config.signal.poll_interval);
    let mut stream = Box::pin(receiver.stream());

    // Main message loop
    loop {
        tokio::select! {
            Some(message) = stream.next() => {
                transport.remember(&message).await;
                bot.handle(&message).await;
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Shutting down ({} rooms seen)...", bot.room_count());
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
