//! Backend client facade.

use crate::config::DispatchConfig;
use crate::dispatcher::Dispatcher;
use crate::error::DispatchError;
use crate::json::{JsonEnvelope, JsonRequest};
use backend_resilience_connectivity::{ConnectivityCheck, ProbeConfig};
use backend_resilience_core::{RequestDescriptor, Response, Transport};
use backend_resilience_queue::{QueueConfig, RequestQueue};
use backend_resilience_renewal::{CredentialRenewalSink, RenewalConfig, RenewalCoordinator};
use serde::Serialize;
use std::sync::Arc;

/// Path of the endpoint probed for connectivity.
pub const SELF_PATH: &str = "/self";

/// Base URLs of the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUrls {
    rest_url: String,
    websocket_url: String,
}

impl BackendUrls {
    pub fn new(rest_url: impl Into<String>, websocket_url: impl Into<String>) -> Self {
        Self {
            rest_url: rest_url.into(),
            websocket_url: websocket_url.into(),
        }
    }

    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    pub fn websocket_url(&self) -> &str {
        &self.websocket_url
    }

    /// Joins the REST base URL and `path` with exactly one slash between them.
    pub fn create_url(&self, path: &str) -> String {
        let base = self.rest_url.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// Entry point for talking to the backend.
///
/// Wires a [`Dispatcher`] to its queue, renewal coordinator and connectivity
/// prober. Requests sent through it survive connectivity loss and expired
/// credentials; see [`Dispatcher`] for the exact outcomes.
///
/// # Example
///
/// ```rust
/// use backend_resilience_core::{RequestDescriptor, Response, TransportError};
/// use backend_resilience_dispatch::{BackendClient, BackendUrls, JsonRequest};
/// use backend_resilience_renewal::RenewCredentials;
/// use tokio::sync::mpsc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let transport = tower::service_fn(|_request: RequestDescriptor| async {
///     Ok::<_, TransportError>(Response::new(201))
/// });
/// let (renewals, _renewal_rx) = mpsc::unbounded_channel::<RenewCredentials>();
///
/// let client = BackendClient::builder(
///     transport,
///     BackendUrls::new("https://backend.example.com", "wss://backend.example.com"),
///     renewals,
/// )
/// .build();
///
/// let url = client.create_url("/conversations");
/// let response = client
///     .send_json(JsonRequest::post(url, serde_json::json!({ "name": "general" })))
///     .await
///     .unwrap();
/// assert_eq!(response.status, 201);
/// # }
/// ```
pub struct BackendClient<T> {
    urls: BackendUrls,
    dispatcher: Dispatcher<T>,
}

impl<T> Clone for BackendClient<T> {
    fn clone(&self) -> Self {
        Self {
            urls: self.urls.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<T> std::fmt::Debug for BackendClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("urls", &self.urls)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

impl<T: Transport> BackendClient<T> {
    /// Creates a builder sending through `transport`. Renewal
    /// announcements go to `sink`.
    pub fn builder<S>(transport: T, urls: BackendUrls, sink: S) -> BackendClientBuilder<T>
    where
        S: CredentialRenewalSink,
    {
        BackendClientBuilder::new(transport, urls, sink)
    }

    /// Sends a request; see [`Dispatcher::send`].
    pub async fn send(&self, request: RequestDescriptor) -> Result<Response, DispatchError> {
        self.dispatcher.send(request).await
    }

    /// Sends a request even while the queue is paused; see
    /// [`Dispatcher::send_immediately`].
    pub async fn send_immediately(
        &self,
        request: RequestDescriptor,
    ) -> Result<Response, DispatchError> {
        self.dispatcher.send_immediately(request).await
    }

    /// Encodes `request` as gzip-compressed JSON and sends it.
    ///
    /// Encoding failures are returned before anything is sent or queued.
    pub async fn send_json<D: Serialize>(
        &self,
        request: JsonRequest<D>,
    ) -> Result<Response, DispatchError> {
        let descriptor = JsonEnvelope::build(&request)?;
        self.dispatcher.send(descriptor).await
    }

    /// Resolves once the backend answers a probe.
    pub fn check_connectivity(&self) -> ConnectivityCheck {
        self.dispatcher.check_connectivity()
    }
}

impl<T> BackendClient<T> {
    /// Resumes the request queue and replays what it holds.
    ///
    /// Called by the authenticator once credentials have been renewed.
    pub fn resume(&self) {
        self.dispatcher.renewal().renewal_completed();
    }

    /// Returns the number of requests waiting for a replay.
    pub fn pending_requests(&self) -> usize {
        self.dispatcher.queue().len()
    }

    /// Joins the REST base URL and `path`.
    pub fn create_url(&self, path: &str) -> String {
        self.urls.create_url(path)
    }

    pub fn urls(&self) -> &BackendUrls {
        &self.urls
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    pub fn queue(&self) -> &RequestQueue {
        self.dispatcher.queue()
    }
}

/// Builder for [`BackendClient`].
pub struct BackendClientBuilder<T> {
    transport: T,
    urls: BackendUrls,
    sink: Arc<dyn CredentialRenewalSink>,
    probe: Option<ProbeConfig>,
    queue: QueueConfig,
    renewal: RenewalConfig,
    dispatch: DispatchConfig,
}

impl<T: Transport> BackendClientBuilder<T> {
    pub fn new<S>(transport: T, urls: BackendUrls, sink: S) -> Self
    where
        S: CredentialRenewalSink,
    {
        Self {
            transport,
            urls,
            sink: Arc::new(sink),
            probe: None,
            queue: QueueConfig::default(),
            renewal: RenewalConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }

    /// Sets the connectivity probe configuration.
    ///
    /// Default: `HEAD {rest_url}/self`, 250ms timeout, fixed 2500ms backoff
    pub fn probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn queue(mut self, queue: QueueConfig) -> Self {
        self.queue = queue;
        self
    }

    pub fn renewal(mut self, renewal: RenewalConfig) -> Self {
        self.renewal = renewal;
        self
    }

    pub fn dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Builds the client.
    pub fn build(self) -> BackendClient<T> {
        let probe = self
            .probe
            .unwrap_or_else(|| ProbeConfig::builder(self.urls.create_url(SELF_PATH)).build());
        let renewal = RenewalCoordinator::new(RequestQueue::new(self.queue), self.sink, self.renewal);

        BackendClient {
            urls: self.urls,
            dispatcher: Dispatcher::new(self.transport, renewal, probe, self.dispatch),
        }
    }
}
