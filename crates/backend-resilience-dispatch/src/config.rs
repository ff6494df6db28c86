//! Configuration for the dispatcher.

use crate::events::{DispatchEvent, RequeueReason};
use backend_resilience_core::events::{EventListeners, FnListener};
use backend_resilience_core::{default_success, Response};
use std::sync::Arc;
use std::time::Duration;

/// Decides which non-401 responses count as success.
pub type SuccessPredicate = Arc<dyn Fn(&Response) -> bool + Send + Sync>;

/// Configuration for the dispatcher.
#[derive(Clone)]
pub struct DispatchConfig {
    pub(crate) name: String,
    pub(crate) default_timeout: Option<Duration>,
    pub(crate) is_success: SuccessPredicate,
    pub(crate) event_listeners: EventListeners<DispatchEvent>,
}

impl DispatchConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> DispatchConfigBuilder {
        DispatchConfigBuilder::new()
    }

    /// Returns the timeout applied to requests that carry none.
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfigBuilder::new().build()
    }
}

impl std::fmt::Debug for DispatchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchConfig")
            .field("name", &self.name)
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for [`DispatchConfig`].
pub struct DispatchConfigBuilder {
    name: String,
    default_timeout: Option<Duration>,
    is_success: SuccessPredicate,
    event_listeners: EventListeners<DispatchEvent>,
}

impl DispatchConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            name: "dispatcher".to_string(),
            default_timeout: None,
            is_success: Arc::new(default_success),
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the name of this dispatcher.
    ///
    /// Default: "dispatcher"
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the timeout for requests that do not carry their own.
    ///
    /// A timed out request is treated like a network failure: it is requeued
    /// and a connectivity check starts.
    ///
    /// Default: None (wait for the transport)
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Sets which responses count as success.
    ///
    /// A 401 always triggers credential renewal, whatever the predicate
    /// returns.
    ///
    /// Default: any status below 400
    pub fn success_when<F>(mut self, f: F) -> Self
    where
        F: Fn(&Response) -> bool + Send + Sync + 'static,
    {
        self.is_success = Arc::new(f);
        self
    }

    /// Registers a callback invoked when a request is deferred by a paused queue.
    pub fn on_deferred<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let DispatchEvent::Deferred { .. } = event {
                f();
            }
        }));
        self
    }

    /// Registers a callback invoked when a request succeeds.
    ///
    /// # Callback Signature
    /// `Fn(u16, Duration)` - the status code and the duration of the attempt
    /// that succeeded.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(u16, Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let DispatchEvent::Succeeded {
                status, duration, ..
            } = event
            {
                f(*status, *duration);
            }
        }));
        self
    }

    /// Registers a callback invoked when a request is rejected.
    ///
    /// # Callback Signature
    /// `Fn(u16)` - the rejecting status code.
    ///
    /// # Example
    /// ```rust
    /// use backend_resilience_dispatch::DispatchConfig;
    ///
    /// let config = DispatchConfig::builder()
    ///     .on_rejected(|status| {
    ///         if status >= 500 {
    ///             eprintln!("backend error {}", status);
    ///         }
    ///     })
    ///     .build();
    /// ```
    pub fn on_rejected<F>(mut self, f: F) -> Self
    where
        F: Fn(u16) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let DispatchEvent::Rejected { status, .. } = event {
                f(*status);
            }
        }));
        self
    }

    /// Registers a callback invoked when a request is requeued.
    ///
    /// # Callback Signature
    /// `Fn(RequeueReason)` - whether credentials or connectivity failed.
    pub fn on_requeued<F>(mut self, f: F) -> Self
    where
        F: Fn(RequeueReason) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let DispatchEvent::Requeued { reason, .. } = event {
                f(*reason);
            }
        }));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> DispatchConfig {
        DispatchConfig {
            name: self.name,
            default_timeout: self.default_timeout,
            is_success: self.is_success,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for DispatchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
