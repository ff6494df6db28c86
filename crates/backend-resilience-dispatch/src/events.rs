use backend_resilience_core::events::BackendEvent;
use std::time::{Duration, Instant};

/// Why a dispatched request was put back in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequeueReason {
    /// The backend answered 401.
    Unauthorized,
    /// No response arrived, either from a timeout or a network error.
    Unreachable { timed_out: bool },
}

/// Events emitted by the dispatcher.
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    /// The queue was paused; the request waits for a replay.
    Deferred { name: String, timestamp: Instant },
    /// The request got a successful response.
    Succeeded {
        name: String,
        timestamp: Instant,
        status: u16,
        duration: Duration,
    },
    /// The request was rejected with a non-401 error status.
    Rejected {
        name: String,
        timestamp: Instant,
        status: u16,
        duration: Duration,
    },
    /// The request was requeued for replay after repair.
    Requeued {
        name: String,
        timestamp: Instant,
        reason: RequeueReason,
    },
}

impl BackendEvent for DispatchEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DispatchEvent::Deferred { .. } => "deferred",
            DispatchEvent::Succeeded { .. } => "succeeded",
            DispatchEvent::Rejected { .. } => "rejected",
            DispatchEvent::Requeued { .. } => "requeued",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            DispatchEvent::Deferred { timestamp, .. }
            | DispatchEvent::Succeeded { timestamp, .. }
            | DispatchEvent::Rejected { timestamp, .. }
            | DispatchEvent::Requeued { timestamp, .. } => *timestamp,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            DispatchEvent::Deferred { name, .. }
            | DispatchEvent::Succeeded { name, .. }
            | DispatchEvent::Rejected { name, .. }
            | DispatchEvent::Requeued { name, .. } => name,
        }
    }
}
