//! Bounded hand-off queue for inbound broker messages.
//!
//! The MQTT receiver thread pushes, the control thread drains.  Storage is
//! fixed-capacity: a full queue drops its oldest message, and topics or
//! payloads that do not fit their buffers are rejected at the door.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::warn;

/// Messages held between two polls of the control loop.
pub const INBOUND_CAPACITY: usize = 16;
pub const MAX_TOPIC_BYTES: usize = 64;
pub const MAX_PAYLOAD_BYTES: usize = 512;

pub struct InboundMessage {
    pub topic: heapless::String<MAX_TOPIC_BYTES>,
    pub payload: heapless::Vec<u8, MAX_PAYLOAD_BYTES>,
}

/// Result of [`InboundQueue::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Queued,
    /// Queued after evicting the oldest message.
    DroppedOldest,
    PayloadTooLarge,
    TopicTooLong,
}

pub struct InboundQueue {
    inner: Mutex<heapless::Deque<InboundMessage, INBOUND_CAPACITY>>,
}

impl Default for InboundQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InboundQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(heapless::Deque::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, heapless::Deque<InboundMessage, INBOUND_CAPACITY>> {
        // A panic on the receiver thread must not take the control loop down.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, topic: &str, payload: &[u8]) -> PushOutcome {
        let Ok(payload) = heapless::Vec::from_slice(payload) else {
            warn!("inbound: dropping {} byte payload on {}", payload.len(), topic);
            return PushOutcome::PayloadTooLarge;
        };
        let Ok(topic) = heapless::String::try_from(topic) else {
            warn!("inbound: topic too long, dropped");
            return PushOutcome::TopicTooLong;
        };

        let mut queue = self.lock();
        match queue.push_back(InboundMessage { topic, payload }) {
            Ok(()) => PushOutcome::Queued,
            Err(msg) => {
                queue.pop_front();
                // Room was just made.
                let _ = queue.push_back(msg);
                warn!("inbound: queue full, oldest message dropped");
                PushOutcome::DroppedOldest
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Hand queued messages to `handler` oldest first, at most one queue's
    /// worth per call.  The lock is released before each handler call.
    pub fn drain(&self, handler: &mut dyn FnMut(&str, &[u8])) -> usize {
        let mut handled = 0;
        while handled < INBOUND_CAPACITY {
            let Some(msg) = self.lock().pop_front() else {
                break;
            };
            handler(&msg.topic, &msg.payload);
            handled += 1;
        }
        handled
    }
}
