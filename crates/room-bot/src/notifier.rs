//! Per-room event channel between commands and the platform layer.
//!
//! Commands push outgoing messages and log lines through typed methods; the
//! room session drains them. Non-command chat lines travel the other way, to
//! whichever listeners a command has subscribed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;

/// Event emitted by a command for the room session to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// Text to send to the room.
    Outgoing(String),
    Log(String),
    LogError(String),
}

/// A chat line that was not a command, with its sender resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub sender_id: String,
    pub sender_name: String,
    pub body: String,
}

impl IncomingMessage {
    pub fn new(
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            body: body.into(),
        }
    }
}

/// Handle returned by [`Notifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback invoked for every incoming message.
pub type IncomingListener = Arc<dyn Fn(&IncomingMessage) + Send + Sync>;

/// Cloneable per-room notifier.
#[derive(Clone)]
pub struct Notifier {
    events: mpsc::UnboundedSender<RoomEvent>,
    listeners: Arc<RwLock<Vec<(ListenerId, IncomingListener)>>>,
    next_listener: Arc<AtomicU64>,
}

impl Notifier {
    /// Create a notifier and the receiving end of its event channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RoomEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let notifier = Self {
            events: tx,
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_listener: Arc::new(AtomicU64::new(1)),
        };
        (notifier, rx)
    }

    /// Queue a message for the room.
    pub fn dispatch(&self, text: impl Into<String>) {
        self.emit(RoomEvent::Outgoing(text.into()));
    }

    pub fn log(&self, text: impl Into<String>) {
        self.emit(RoomEvent::Log(text.into()));
    }

    pub fn log_error(&self, text: impl Into<String>) {
        self.emit(RoomEvent::LogError(text.into()));
    }

    fn emit(&self, event: RoomEvent) {
        // The receiver only goes away with the room session; late timer
        // output for a dropped room is discarded.
        let _ = self.events.send(event);
    }

    /// Register a listener for incoming non-command messages.
    pub fn subscribe(&self, listener: IncomingListener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver an incoming message to every current listener.
    pub fn publish(&self, message: &IncomingMessage) {
        // Snapshot first: a listener may unsubscribe itself while running.
        let listeners: Vec<IncomingListener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(message);
        }
    }
}
