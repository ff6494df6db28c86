use backend_resilience_core::events::BackendEvent;
use std::time::{Duration, Instant};

/// Events emitted by the connectivity prober.
#[derive(Debug, Clone)]
pub enum ProbeEvent {
    /// A new probe sequence started; no other sequence was in flight.
    CheckStarted { name: String, timestamp: Instant },
    /// A caller joined the sequence already in flight.
    CheckJoined { name: String, timestamp: Instant },
    /// A probe request is being sent.
    ProbeSent {
        name: String,
        timestamp: Instant,
        attempt: usize,
    },
    /// A probe got no response; the next one follows after `next_delay`.
    ProbeFailed {
        name: String,
        timestamp: Instant,
        attempt: usize,
        timed_out: bool,
        next_delay: Duration,
    },
    /// A probe got a response; the backend is reachable.
    Reachable {
        name: String,
        timestamp: Instant,
        attempts: usize,
        status: u16,
    },
}

impl BackendEvent for ProbeEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProbeEvent::CheckStarted { .. } => "check_started",
            ProbeEvent::CheckJoined { .. } => "check_joined",
            ProbeEvent::ProbeSent { .. } => "probe_sent",
            ProbeEvent::ProbeFailed { .. } => "probe_failed",
            ProbeEvent::Reachable { .. } => "reachable",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            ProbeEvent::CheckStarted { timestamp, .. }
            | ProbeEvent::CheckJoined { timestamp, .. }
            | ProbeEvent::ProbeSent { timestamp, .. }
            | ProbeEvent::ProbeFailed { timestamp, .. }
            | ProbeEvent::Reachable { timestamp, .. } => *timestamp,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            ProbeEvent::CheckStarted { name, .. }
            | ProbeEvent::CheckJoined { name, .. }
            | ProbeEvent::ProbeSent { name, .. }
            | ProbeEvent::ProbeFailed { name, .. }
            | ProbeEvent::Reachable { name, .. } => name,
        }
    }
}
