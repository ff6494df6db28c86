use crate::backoff::{ExponentialBackoff, FixedInterval, IntervalFunction};
use crate::events::ProbeEvent;
use backend_resilience_core::events::{EventListeners, FnListener};
use backend_resilience_core::{Method, RequestDescriptor};
use std::sync::Arc;
use std::time::Duration;

/// Timeout of a single probe request.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(250);

/// Delay between a failed probe and the next one.
pub const DEFAULT_PROBE_BACKOFF: Duration = Duration::from_millis(2500);

/// Configuration for the connectivity prober.
#[derive(Clone)]
pub struct ProbeConfig {
    pub(crate) request: RequestDescriptor,
    pub(crate) timeout: Duration,
    pub(crate) backoff: Arc<dyn IntervalFunction>,
    pub(crate) name: String,
    pub(crate) event_listeners: EventListeners<ProbeEvent>,
}

impl ProbeConfig {
    /// Creates a builder probing `url` with `HEAD`.
    pub fn builder(url: impl Into<String>) -> ProbeConfigBuilder {
        ProbeConfigBuilder::new(url)
    }

    /// Returns the request sent on every probe attempt.
    pub fn request(&self) -> &RequestDescriptor {
        &self.request
    }

    /// Returns the timeout of a single probe.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the name used in events, logs and metrics.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for ProbeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeConfig")
            .field("request", &self.request)
            .field("timeout", &self.timeout)
            .field("name", &self.name)
            .field("event_listeners", &self.event_listeners)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ProbeConfig`].
pub struct ProbeConfigBuilder {
    request: RequestDescriptor,
    timeout: Duration,
    backoff: Arc<dyn IntervalFunction>,
    name: String,
    event_listeners: EventListeners<ProbeEvent>,
}

impl ProbeConfigBuilder {
    /// Creates a builder with defaults.
    ///
    /// Defaults:
    /// - request: `HEAD url`
    /// - timeout: 250ms
    /// - backoff: fixed 2500ms
    /// - name: `"connectivity"`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            request: RequestDescriptor::head(url),
            timeout: DEFAULT_PROBE_TIMEOUT,
            backoff: Arc::new(FixedInterval::new(DEFAULT_PROBE_BACKOFF)),
            name: "connectivity".to_string(),
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the probe method. Keep it lightweight; `HEAD` is the default.
    pub fn method(mut self, method: Method) -> Self {
        self.request.method = method;
        self
    }

    /// Replaces the whole probe request.
    pub fn request(mut self, request: RequestDescriptor) -> Self {
        self.request = request;
        self
    }

    /// Sets the timeout of a single probe.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Waits the same `delay` after every failed probe.
    pub fn fixed_backoff(mut self, delay: Duration) -> Self {
        self.backoff = Arc::new(FixedInterval::new(delay));
        self
    }

    /// Doubles the delay after every failed probe, up to `max_delay`.
    pub fn exponential_backoff(mut self, initial_delay: Duration, max_delay: Duration) -> Self {
        self.backoff = Arc::new(ExponentialBackoff::new(initial_delay).max_interval(max_delay));
        self
    }

    /// Sets a custom backoff.
    pub fn backoff<I>(mut self, backoff: I) -> Self
    where
        I: IntervalFunction + 'static,
    {
        self.backoff = Arc::new(backoff);
        self
    }

    /// Sets the name used in events, logs and metrics.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked on every [`check`] call.
    ///
    /// # Callback Signature
    /// `Fn(bool)` - true when the call joined a sequence already in flight,
    /// false when it started a new one.
    ///
    /// [`check`]: crate::ConnectivityProber::check
    pub fn on_check<F>(mut self, f: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| match event {
            ProbeEvent::CheckStarted { .. } => f(false),
            ProbeEvent::CheckJoined { .. } => f(true),
            _ => {}
        }));
        self
    }

    /// Registers a callback invoked before every probe request.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - the 1-indexed attempt number within the current sequence.
    pub fn on_probe<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let ProbeEvent::ProbeSent { attempt, .. } = event {
                f(*attempt);
            }
        }));
        self
    }

    /// Registers a callback invoked when a probe times out or fails below HTTP.
    ///
    /// # Callback Signature
    /// `Fn(usize, Duration)` - the failed attempt number and the delay before
    /// the next probe.
    ///
    /// # Example
    /// ```rust
    /// use backend_resilience_connectivity::ProbeConfig;
    ///
    /// let config = ProbeConfig::builder("https://backend.example.com/self")
    ///     .on_probe_failed(|attempt, delay| {
    ///         eprintln!("backend unreachable (attempt {}), retrying in {:?}", attempt, delay);
    ///     })
    ///     .build();
    /// ```
    pub fn on_probe_failed<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let ProbeEvent::ProbeFailed {
                attempt,
                next_delay,
                ..
            } = event
            {
                f(*attempt, *next_delay);
            }
        }));
        self
    }

    /// Registers a callback invoked when a sequence ends with a response.
    ///
    /// # Callback Signature
    /// `Fn(usize, u16)` - the number of probes the sequence took and the
    /// status code that ended it.
    pub fn on_reachable<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, u16) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let ProbeEvent::Reachable {
                attempts, status, ..
            } = event
            {
                f(*attempts, *status);
            }
        }));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ProbeConfig {
        ProbeConfig {
            request: self.request,
            timeout: self.timeout,
            backoff: self.backoff,
            name: self.name,
            event_listeners: self.event_listeners,
        }
    }
}
