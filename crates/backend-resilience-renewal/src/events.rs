use backend_resilience_core::events::BackendEvent;
use std::time::Instant;

/// Events emitted by the renewal coordinator.
#[derive(Debug, Clone)]
pub enum RenewalEvent {
    /// The queue was paused and renewal announced.
    RenewalRequested { name: String, timestamp: Instant },
    /// Renewal finished and the queue was resumed with `pending` operations.
    RenewalCompleted {
        name: String,
        timestamp: Instant,
        pending: usize,
    },
}

impl BackendEvent for RenewalEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RenewalEvent::RenewalRequested { .. } => "renewal_requested",
            RenewalEvent::RenewalCompleted { .. } => "renewal_completed",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            RenewalEvent::RenewalRequested { timestamp, .. }
            | RenewalEvent::RenewalCompleted { timestamp, .. } => *timestamp,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            RenewalEvent::RenewalRequested { name, .. }
            | RenewalEvent::RenewalCompleted { name, .. } => name,
        }
    }
}
