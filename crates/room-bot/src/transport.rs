//! Chat platform boundary.

use async_trait::async_trait;
use profile_cache::ProfileCache;
use signal_client::{RoomMessage, SignalClient, SignalError};

/// What the bot needs from the chat platform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post a text message to a room.
    async fn send_message(&self, room_id: &str, body: &str) -> Result<(), SignalError>;

    /// Best known display name for a user; falls back to the id.
    async fn display_name(&self, user_id: &str) -> String;

    /// Acknowledge a message the bot acted on.
    async fn mark_read(&self, message: &RoomMessage) -> Result<(), SignalError>;
}

/// Signal-backed transport.
pub struct SignalTransport {
    client: SignalClient,
    profiles: ProfileCache,
}

impl SignalTransport {
    pub fn new(client: SignalClient, profiles: ProfileCache) -> Self {
        Self { client, profiles }
    }

    /// Learn the sender's profile name from an incoming message.
    pub async fn remember(&self, message: &RoomMessage) {
        if let Some(name) = &message.sender_name {
            self.profiles.remember(&message.sender_id, name).await;
        }
    }
}

#[async_trait]
impl Transport for SignalTransport {
    async fn send_message(&self, room_id: &str, body: &str) -> Result<(), SignalError> {
        self.client.send(room_id, body).await
    }

    async fn display_name(&self, user_id: &str) -> String {
        self.profiles.display_name(user_id).await
    }

    async fn mark_read(&self, message: &RoomMessage) -> Result<(), SignalError> {
        self.client.send_read_receipt(message).await
    }
}
