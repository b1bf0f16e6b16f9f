//! Room sessions and the bot that routes messages to them.

use crate::delivery::DeliveryQueue;
use crate::dispatcher::{CommandContext, Dispatcher};
use crate::notifier::{IncomingMessage, Notifier, RoomEvent};
use crate::transport::Transport;
use signal_client::RoomMessage;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Everything the bot keeps for one room.
pub struct RoomSession {
    room_id: String,
    dispatcher: Dispatcher,
    queue: DeliveryQueue,
    pump: JoinHandle<()>,
}

impl RoomSession {
    pub fn new(room_id: impl Into<String>, ctx: &CommandContext, transport: Arc<dyn Transport>) -> Self {
        let room_id = room_id.into();
        let (notifier, events) = Notifier::channel();
        let queue = DeliveryQueue::new(room_id.as_str(), transport);
        let pump = tokio::spawn(pump_events(room_id.clone(), events, queue.clone()));

        info!(room = %room_id, "Opened room session");

        Self {
            dispatcher: Dispatcher::new(ctx, notifier),
            room_id,
            queue,
            pump,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn notifier(&self) -> &Notifier {
        self.dispatcher.notifier()
    }

    pub fn queue(&self) -> &DeliveryQueue {
        &self.queue
    }
}

impl Drop for RoomSession {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

/// Route notifier events for one room to its queue and the log.
async fn pump_events(room_id: String, mut events: UnboundedReceiver<RoomEvent>, queue: DeliveryQueue) {
    while let Some(event) = events.recv().await {
        match event {
            RoomEvent::Outgoing(text) => queue.enqueue(text),
            RoomEvent::Log(text) => info!(room = %room_id, "{}", text),
            RoomEvent::LogError(text) => error!(room = %room_id, "{}", text),
        }
    }
    debug!(room = %room_id, "Room event channel closed");
}

/// Routes inbound messages to lazily created room sessions.
pub struct Bot {
    ctx: CommandContext,
    transport: Arc<dyn Transport>,
    sessions: HashMap<String, RoomSession>,
}

impl Bot {
    pub fn new(ctx: CommandContext, transport: Arc<dyn Transport>) -> Self {
        Self {
            ctx,
            transport,
            sessions: HashMap::new(),
        }
    }

    pub fn session(&self, room_id: &str) -> Option<&RoomSession> {
        self.sessions.get(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.sessions.len()
    }

    /// Handle one inbound message.
    ///
    /// Command lines go to the room's dispatcher; anything else is offered to
    /// the room's listeners. Replies are queued, not awaited.
    pub async fn handle(&mut self, message: &RoomMessage) {
        if message.is_own || message.body.trim().is_empty() {
            return;
        }

        let transport = Arc::clone(&self.transport);
        let session = self
            .sessions
            .entry(message.room_id.clone())
            .or_insert_with(|| RoomSession::new(message.room_id.clone(), &self.ctx, transport));

        let dispatcher = session.dispatcher();
        if dispatcher.is_command(&message.body) {
            // The receive loop is shared by every room, so never wait on a receipt.
            let transport = Arc::clone(&self.transport);
            let receipt = message.clone();
            tokio::spawn(async move {
                if let Err(e) = transport.mark_read(&receipt).await {
                    warn!(room = %receipt.room_id, "Failed to send read receipt: {}", e);
                }
            });

            match dispatcher.process(&message.body).await {
                Ok(response) if response.is_empty() => {}
                Ok(response) => dispatcher.notifier().dispatch(response),
                Err(e) => {
                    warn!(room = %message.room_id, "Rejected command line: {}", e);
                    dispatcher.notifier().dispatch(e.user_message());
                }
            }
            return;
        }

        let sender_name = match &message.sender_name {
            Some(name) => name.clone(),
            None => self.transport.display_name(&message.sender_id).await,
        };
        dispatcher.notifier().publish(&IncomingMessage::new(
            message.sender_id.as_str(),
            sender_name,
            message.body.as_str(),
        ));
    }
}
