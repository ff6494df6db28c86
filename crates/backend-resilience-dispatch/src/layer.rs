//! Tower layer implementation for the dispatcher.

use crate::config::DispatchConfig;
use crate::dispatcher::Dispatcher;
use backend_resilience_connectivity::ProbeConfig;
use backend_resilience_core::Transport;
use backend_resilience_renewal::RenewalCoordinator;
use tower::Layer;

/// Layer that wraps a transport in a [`Dispatcher`].
///
/// Every wrapped transport gets its own connectivity prober built from the
/// probe configuration; all of them share the renewal coordinator and its
/// queue.
///
/// # Examples
///
/// ```
/// use backend_resilience_connectivity::ProbeConfig;
/// use backend_resilience_core::{RequestDescriptor, Response, TransportError};
/// use backend_resilience_dispatch::{DispatchConfig, DispatchLayer};
/// use backend_resilience_queue::RequestQueue;
/// use backend_resilience_renewal::{FnSink, RenewalConfig, RenewalCoordinator};
/// use tower::{Layer, ServiceExt};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let renewal = RenewalCoordinator::new(
///     RequestQueue::default(),
///     FnSink::new(|| println!("renew credentials")),
///     RenewalConfig::default(),
/// );
/// let layer = DispatchLayer::new(
///     renewal,
///     ProbeConfig::builder("http://localhost/self").build(),
///     DispatchConfig::default(),
/// );
///
/// let transport = tower::service_fn(|_request: RequestDescriptor| async {
///     Ok::<_, TransportError>(Response::new(200))
/// });
/// let dispatcher = layer.layer(transport);
///
/// let response = dispatcher
///     .oneshot(RequestDescriptor::get("http://localhost/user"))
///     .await
///     .unwrap();
/// assert_eq!(response.status, 200);
/// # }
/// ```
#[derive(Clone)]
pub struct DispatchLayer {
    renewal: RenewalCoordinator,
    probe: ProbeConfig,
    config: DispatchConfig,
}

impl DispatchLayer {
    /// Creates a new dispatch layer.
    pub fn new(renewal: RenewalCoordinator, probe: ProbeConfig, config: DispatchConfig) -> Self {
        Self {
            renewal,
            probe,
            config,
        }
    }
}

impl<T: Transport> Layer<T> for DispatchLayer {
    type Service = Dispatcher<T>;

    fn layer(&self, transport: T) -> Self::Service {
        Dispatcher::new(
            transport,
            self.renewal.clone(),
            self.probe.clone(),
            self.config.clone(),
        )
    }
}
