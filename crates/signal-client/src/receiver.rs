//! Message receiver with polling.

use crate::client::SignalClient;
use crate::types::*;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

/// Delay before polling again after a failed receive.
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Message receiver that polls for new room messages.
pub struct MessageReceiver {
    client: SignalClient,
    poll_interval: Duration,
}

impl MessageReceiver {
    pub fn new(client: SignalClient, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }

    /// Start receiving messages as an async stream.
    ///
    /// Envelopes without text are skipped. The bot's own messages are still
    /// yielded, flagged with `is_own`.
    pub fn stream(self) -> impl Stream<Item = RoomMessage> {
        async_stream::stream! {
            loop {
                match self.client.receive().await {
                    Ok(messages) => {
                        for msg in messages {
                            if let Some(room_msg) =
                                RoomMessage::from_incoming(&msg, self.client.phone_number())
                            {
                                debug!(
                                    room = %room_msg.room_id,
                                    "Received: {} from {}",
                                    room_msg.body.chars().take(50).collect::<String>(),
                                    room_msg.sender_id
                                );
                                yield room_msg;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Receive error: {}", e);
                        sleep(ERROR_BACKOFF).await;
                        continue;
                    }
                }

                sleep(self.poll_interval).await;
            }
        }
    }
}
