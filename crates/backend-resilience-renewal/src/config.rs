use crate::events::RenewalEvent;
use backend_resilience_core::events::{EventListeners, FnListener};

/// Configuration for the renewal coordinator.
pub struct RenewalConfig {
    pub(crate) name: String,
    pub(crate) event_listeners: EventListeners<RenewalEvent>,
}

impl RenewalConfig {
    pub fn builder() -> RenewalConfigBuilder {
        RenewalConfigBuilder::new()
    }
}

impl Default for RenewalConfig {
    fn default() -> Self {
        RenewalConfigBuilder::new().build()
    }
}

/// Builder for [`RenewalConfig`].
pub struct RenewalConfigBuilder {
    name: String,
    event_listeners: EventListeners<RenewalEvent>,
}

impl RenewalConfigBuilder {
    pub fn new() -> Self {
        Self {
            name: "credential-renewal".to_string(),
            event_listeners: EventListeners::new(),
        }
    }

    /// Default: "credential-renewal"
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked every time renewal is requested.
    pub fn on_renewal_requested<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RenewalEvent::RenewalRequested { .. } = event {
                f();
            }
        }));
        self
    }

    /// Registers a callback invoked when renewal completes.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - the number of queued requests about to be replayed.
    pub fn on_renewal_completed<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RenewalEvent::RenewalCompleted { pending, .. } = event {
                f(*pending);
            }
        }));
        self
    }

    pub fn build(self) -> RenewalConfig {
        RenewalConfig {
            name: self.name,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for RenewalConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
