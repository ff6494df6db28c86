//! The prober itself: one shared probe sequence per outage.

use crate::config::ProbeConfig;
use crate::events::ProbeEvent;
use backend_resilience_core::Transport;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Instant;

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter};

#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

/// What the prober last learned about the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    /// No check has completed yet.
    Unknown,
    /// A probe sequence is in flight.
    Checking,
    /// The last sequence received a response.
    Reachable,
}

/// Future returned by [`ConnectivityProber::check`].
///
/// Every caller that checks while a sequence is in flight receives a clone
/// of the same shared future.
pub type ConnectivityCheck = Shared<BoxFuture<'static, ()>>;

struct Flight {
    state: ConnectivityState,
    sequence: Option<ConnectivityCheck>,
}

struct Inner<T> {
    transport: T,
    config: ProbeConfig,
    flight: Mutex<Flight>,
}

/// Decides whether the backend is reachable by probing it until it answers.
///
/// Any HTTP response ends the sequence, whatever its status: a 401 still
/// proves the server is there. Timeouts and network failures are followed by
/// the configured backoff and another probe, without bound.
pub struct ConnectivityProber<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ConnectivityProber<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ConnectivityProber<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityProber")
            .field("name", &self.inner.config.name)
            .field("state", &self.state())
            .finish()
    }
}

impl<T> ConnectivityProber<T> {
    /// Returns the current connectivity state.
    pub fn state(&self) -> ConnectivityState {
        self.inner.flight.lock().state
    }

    /// Returns true while a probe sequence is in flight.
    pub fn is_checking(&self) -> bool {
        self.state() == ConnectivityState::Checking
    }

    /// Returns the prober configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.inner.config
    }
}

impl<T: Transport> ConnectivityProber<T> {
    /// Creates a prober sending probes through `transport`.
    pub fn new(transport: T, config: ProbeConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            describe_counter!(
                "connectivity_probes_total",
                "Total number of probe requests sent"
            );
            describe_counter!(
                "connectivity_checks_total",
                "Total number of connectivity checks, by whether they started or joined a sequence"
            );
        }

        Self {
            inner: Arc::new(Inner {
                transport,
                config,
                flight: Mutex::new(Flight {
                    state: ConnectivityState::Unknown,
                    sequence: None,
                }),
            }),
        }
    }

    /// Resolves once the backend has answered a probe.
    ///
    /// Never fails. If a sequence is already in flight the returned future
    /// joins it instead of probing again.
    pub fn check(&self) -> ConnectivityCheck {
        let (sequence, joined) = {
            let mut flight = self.inner.flight.lock();
            match &flight.sequence {
                Some(sequence) => (sequence.clone(), true),
                None => {
                    let sequence = probe_until_reachable(Arc::downgrade(&self.inner))
                        .boxed()
                        .shared();
                    flight.state = ConnectivityState::Checking;
                    flight.sequence = Some(sequence.clone());
                    (sequence, false)
                }
            }
        };

        let config = &self.inner.config;
        let event = if joined {
            ProbeEvent::CheckJoined {
                name: config.name.clone(),
                timestamp: Instant::now(),
            }
        } else {
            ProbeEvent::CheckStarted {
                name: config.name.clone(),
                timestamp: Instant::now(),
            }
        };
        config.event_listeners.emit(&event);

        #[cfg(feature = "metrics")]
        counter!(
            "connectivity_checks_total",
            "prober" => config.name.clone(),
            "role" => if joined { "joined" } else { "started" }
        )
        .increment(1);

        #[cfg(feature = "tracing")]
        debug!(prober = %config.name, joined, "connectivity check");

        sequence
    }
}

/// Runs one probe sequence. Holds only a weak reference between attempts so
/// an abandoned sequence does not keep a dropped prober alive.
async fn probe_until_reachable<T: Transport>(inner: Weak<Inner<T>>) {
    let mut attempt = 0;

    loop {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        attempt += 1;
        let config = &inner.config;

        config.event_listeners.emit(&ProbeEvent::ProbeSent {
            name: config.name.clone(),
            timestamp: Instant::now(),
            attempt,
        });

        #[cfg(feature = "metrics")]
        counter!("connectivity_probes_total", "prober" => config.name.clone()).increment(1);

        let probe = inner.transport.dispatch(config.request.clone());
        let timed_out = match tokio::time::timeout(config.timeout, probe).await {
            Ok(Ok(response)) => {
                {
                    let mut flight = inner.flight.lock();
                    flight.state = ConnectivityState::Reachable;
                    flight.sequence = None;
                }

                config.event_listeners.emit(&ProbeEvent::Reachable {
                    name: config.name.clone(),
                    timestamp: Instant::now(),
                    attempts: attempt,
                    status: response.status,
                });

                #[cfg(feature = "tracing")]
                info!(prober = %config.name, attempts = attempt, status = response.status, "backend reachable");

                return;
            }
            Ok(Err(error)) => error.is_timeout(),
            Err(_elapsed) => true,
        };

        let delay = config.backoff.next_interval(attempt - 1);
        config.event_listeners.emit(&ProbeEvent::ProbeFailed {
            name: config.name.clone(),
            timestamp: Instant::now(),
            attempt,
            timed_out,
            next_delay: delay,
        });

        #[cfg(feature = "tracing")]
        warn!(prober = %config.name, attempt, timed_out, ?delay, "backend unreachable, probing again");

        drop(inner);
        tokio::time::sleep(delay).await;
    }
}
