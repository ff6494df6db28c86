use backend_resilience_core::events::BackendEvent;
use std::time::Instant;

/// Events emitted by the request queue.
#[derive(Debug, Clone)]
pub enum QueueEvent {
    /// The queue went from open to paused.
    Paused { name: String, timestamp: Instant },
    /// The queue was resumed with `pending` operations waiting.
    Resumed {
        name: String,
        timestamp: Instant,
        pending: usize,
    },
    /// A fresh operation was deferred because the queue is paused.
    Deferred {
        name: String,
        timestamp: Instant,
        pending: usize,
    },
    /// A failed operation was put back at `position`.
    Requeued {
        name: String,
        timestamp: Instant,
        position: usize,
        pending: usize,
    },
    /// A pending operation is being replayed.
    Replayed {
        name: String,
        timestamp: Instant,
        remaining: usize,
    },
}

impl BackendEvent for QueueEvent {
    fn event_type(&self) -> &'static str {
        match self {
            QueueEvent::Paused { .. } => "paused",
            QueueEvent::Resumed { .. } => "resumed",
            QueueEvent::Deferred { .. } => "deferred",
            QueueEvent::Requeued { .. } => "requeued",
            QueueEvent::Replayed { .. } => "replayed",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            QueueEvent::Paused { timestamp, .. }
            | QueueEvent::Resumed { timestamp, .. }
            | QueueEvent::Deferred { timestamp, .. }
            | QueueEvent::Requeued { timestamp, .. }
            | QueueEvent::Replayed { timestamp, .. } => *timestamp,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            QueueEvent::Paused { name, .. }
            | QueueEvent::Resumed { name, .. }
            | QueueEvent::Deferred { name, .. }
            | QueueEvent::Requeued { name, .. }
            | QueueEvent::Replayed { name, .. } => name,
        }
    }
}
