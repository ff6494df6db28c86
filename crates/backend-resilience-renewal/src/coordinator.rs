use crate::config::RenewalConfig;
use crate::events::RenewalEvent;
use crate::sink::CredentialRenewalSink;
use backend_resilience_queue::RequestQueue;
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter};

#[cfg(feature = "tracing")]
use tracing::info;

/// Gates the request queue on credential renewal.
///
/// An unauthorized response leads to [`request_renewal`]: the queue is
/// paused and the sink is told to renew. The external authenticator
/// finishes the job by calling [`renewal_completed`].
///
/// Every call announces; concurrent 401s yield one announcement each.
///
/// [`request_renewal`]: RenewalCoordinator::request_renewal
/// [`renewal_completed`]: RenewalCoordinator::renewal_completed
#[derive(Clone)]
pub struct RenewalCoordinator {
    queue: RequestQueue,
    sink: Arc<dyn CredentialRenewalSink>,
    config: Arc<RenewalConfig>,
}

impl RenewalCoordinator {
    /// Creates a coordinator pausing `queue` and announcing to `sink`.
    pub fn new<S>(queue: RequestQueue, sink: S, config: RenewalConfig) -> Self
    where
        S: CredentialRenewalSink,
    {
        #[cfg(feature = "metrics")]
        describe_counter!(
            "credential_renewals_requested_total",
            "Total number of credential renewal announcements"
        );

        Self {
            queue,
            sink: Arc::new(sink),
            config: Arc::new(config),
        }
    }

    /// Pauses the request queue, then announces renewal.
    pub fn request_renewal(&self) {
        self.queue.pause();
        self.sink.renew_credentials();

        let config = &self.config;
        config.event_listeners.emit(&RenewalEvent::RenewalRequested {
            name: config.name.clone(),
            timestamp: Instant::now(),
        });

        #[cfg(feature = "metrics")]
        counter!("credential_renewals_requested_total", "coordinator" => config.name.clone())
            .increment(1);

        #[cfg(feature = "tracing")]
        info!(coordinator = %config.name, pending = self.queue.len(), "credential renewal requested");
    }

    /// Resumes the request queue once fresh credentials are in place.
    pub fn renewal_completed(&self) {
        let pending = self.queue.len();
        self.queue.resume();

        let config = &self.config;
        config.event_listeners.emit(&RenewalEvent::RenewalCompleted {
            name: config.name.clone(),
            timestamp: Instant::now(),
            pending,
        });

        #[cfg(feature = "tracing")]
        info!(coordinator = %config.name, pending, "credential renewal completed");
    }

    /// Returns the queue this coordinator gates.
    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }
}

impl std::fmt::Debug for RenewalCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenewalCoordinator")
            .field("name", &self.config.name)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}
