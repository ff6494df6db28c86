//! Configuration for the request queue.

use crate::events::QueueEvent;
use backend_resilience_core::events::{EventListeners, FnListener};

/// Configuration for the request queue.
pub struct QueueConfig {
    pub(crate) name: String,
    pub(crate) event_listeners: EventListeners<QueueEvent>,
}

impl QueueConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> QueueConfigBuilder {
        QueueConfigBuilder::new()
    }

    /// Returns the name used in events, logs and metrics.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfigBuilder::new().build()
    }
}

/// Builder for [`QueueConfig`].
pub struct QueueConfigBuilder {
    name: String,
    event_listeners: EventListeners<QueueEvent>,
}

impl QueueConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            name: "request-queue".to_string(),
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the name of this queue.
    ///
    /// Default: "request-queue"
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked when the queue pauses.
    pub fn on_paused<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let QueueEvent::Paused { .. } = event {
                f();
            }
        }));
        self
    }

    /// Registers a callback invoked when a paused queue resumes.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - the number of operations about to be replayed.
    pub fn on_resumed<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let QueueEvent::Resumed { pending, .. } = event {
                f(*pending);
            }
        }));
        self
    }

    /// Registers a callback invoked when an operation is deferred or requeued.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - the number of pending operations, including this one.
    ///
    /// # Example
    /// ```rust
    /// use backend_resilience_queue::QueueConfig;
    ///
    /// let config = QueueConfig::builder()
    ///     .on_deferred(|pending| {
    ///         if pending > 100 {
    ///             eprintln!("{} requests waiting for the backend", pending);
    ///         }
    ///     })
    ///     .build();
    /// ```
    pub fn on_deferred<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| match event {
            QueueEvent::Deferred { pending, .. } | QueueEvent::Requeued { pending, .. } => {
                f(*pending)
            }
            _ => {}
        }));
        self
    }

    /// Registers a callback invoked before each replayed operation runs.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - the number of operations still waiting behind it.
    pub fn on_replayed<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let QueueEvent::Replayed { remaining, .. } = event {
                f(*remaining);
            }
        }));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> QueueConfig {
        QueueConfig {
            name: self.name,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for QueueConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
