//! Per-room outgoing message queue.
//!
//! Messages for one room are sent strictly one after another in the order
//! they were enqueued. A queue drains itself on a spawned task that exits
//! once the queue is empty; the next enqueue starts a new one.

use crate::transport::Transport;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error};

#[derive(Default)]
struct QueueState {
    pending: VecDeque<String>,
    draining: bool,
}

/// FIFO of outgoing messages for one room.
#[derive(Clone)]
pub struct DeliveryQueue {
    room_id: Arc<str>,
    transport: Arc<dyn Transport>,
    state: Arc<Mutex<QueueState>>,
}

impl DeliveryQueue {
    pub fn new(room_id: impl Into<Arc<str>>, transport: Arc<dyn Transport>) -> Self {
        Self {
            room_id: room_id.into(),
            transport,
            state: Arc::new(Mutex::new(QueueState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a message and make sure a drain task is running.
    pub fn enqueue(&self, message: impl Into<String>) {
        let mut state = self.lock();
        state.pending.push_back(message.into());
        if state.draining {
            return;
        }
        state.draining = true;
        drop(state);

        let queue = self.clone();
        tokio::spawn(async move { queue.drain().await });
    }

    /// Messages waiting to be sent, not counting one in flight.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// True when nothing is queued and no send is in flight.
    pub fn is_idle(&self) -> bool {
        let state = self.lock();
        state.pending.is_empty() && !state.draining
    }

    async fn drain(&self) {
        loop {
            let next = {
                let mut state = self.lock();
                let next = state.pending.pop_front();
                if next.is_none() {
                    state.draining = false;
                }
                next
            };
            let Some(message) = next else {
                break;
            };

            match self.transport.send_message(&self.room_id, &message).await {
                Ok(()) => debug!(room = %self.room_id, "Delivered message"),
                Err(e) => error!(room = %self.room_id, "Dropping message after failed send: {}", e),
            }
        }
    }
}
