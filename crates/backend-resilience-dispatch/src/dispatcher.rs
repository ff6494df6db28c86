//! The dispatcher: sends requests and repairs the failures it can.

use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::events::{DispatchEvent, RequeueReason};
use backend_resilience_connectivity::{ConnectivityProber, ProbeConfig};
use backend_resilience_core::{Classification, RequestDescriptor, Response, Transport, TransportError};
use backend_resilience_queue::{RequestQueue, SendOperation};
use backend_resilience_renewal::RenewalCoordinator;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tokio::sync::oneshot;
use tower::Service;

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

type Reply = oneshot::Sender<Result<Response, DispatchError>>;

struct Inner<T> {
    transport: T,
    queue: RequestQueue,
    renewal: RenewalCoordinator,
    prober: ConnectivityProber<T>,
    config: DispatchConfig,
}

/// Sends requests through a transport and hides recoverable failures.
///
/// | outcome                         | what the caller sees                   |
/// |---------------------------------|----------------------------------------|
/// | accepted by the success policy  | `Ok(response)`                         |
/// | 401                             | pending; requeued, renewal requested   |
/// | timeout or network error        | pending; requeued, connectivity probed |
/// | any other status                | `Err(DispatchError::Rejected)`         |
///
/// Pending requests settle once a replay reaches success or rejection.
/// While the queue is paused, or still replaying older requests, new
/// requests are deferred behind them without touching the transport.
///
/// The connectivity watch resumes the shared queue as soon as the backend
/// answers, even if a credential renewal is also outstanding. Requests
/// requeued after a 401 are then replayed with the old credentials and
/// announce the renewal again.
pub struct Dispatcher<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.inner.config)
            .field("queue", &self.inner.queue)
            .field("prober", &self.inner.prober)
            .finish()
    }
}

impl<T: Transport> Dispatcher<T> {
    /// Creates a dispatcher probing connectivity through the same transport.
    ///
    /// The dispatcher gates on the queue of `renewal`.
    pub fn new(
        transport: T,
        renewal: RenewalCoordinator,
        probe: ProbeConfig,
        config: DispatchConfig,
    ) -> Self {
        let prober = ConnectivityProber::new(transport.clone(), probe);
        Self::with_prober(transport, renewal, prober, config)
    }

    /// Creates a dispatcher sharing an existing prober.
    pub fn with_prober(
        transport: T,
        renewal: RenewalCoordinator,
        prober: ConnectivityProber<T>,
        config: DispatchConfig,
    ) -> Self {
        #[cfg(feature = "metrics")]
        describe_counter!(
            "dispatch_requests_total",
            "Total number of dispatch attempts, by outcome"
        );

        Self {
            inner: Arc::new(Inner {
                transport,
                queue: renewal.queue().clone(),
                renewal,
                prober,
                config,
            }),
        }
    }

    /// Sends `request`, deferring it while the queue is paused.
    ///
    /// Resolves with the response once an attempt succeeds, or with
    /// [`DispatchError::Rejected`] once one is rejected. Attempts that fail
    /// with 401 or without a response are replayed after repair and keep
    /// the returned future pending in the meantime.
    pub async fn send(&self, request: RequestDescriptor) -> Result<Response, DispatchError> {
        let (reply, settled) = oneshot::channel();
        let op = attempt(Arc::clone(&self.inner), request, reply);

        match self.inner.queue.try_defer(op) {
            Ok(()) => {
                let config = &self.inner.config;
                config.event_listeners.emit(&DispatchEvent::Deferred {
                    name: config.name.clone(),
                    timestamp: Instant::now(),
                });

                #[cfg(feature = "tracing")]
                debug!(dispatcher = %config.name, pending = self.inner.queue.len(), "request deferred");
            }
            Err(op) => op().await,
        }

        settled.await.map_err(|_| DispatchError::Abandoned)?
    }

    /// Sends `request` now, even while the queue is paused.
    ///
    /// Meant for traffic that repairs the pause itself, such as the token
    /// refresh an authenticator performs after a renewal announcement.
    /// Failures are handled like in [`send`](Self::send).
    pub async fn send_immediately(
        &self,
        request: RequestDescriptor,
    ) -> Result<Response, DispatchError> {
        let (reply, settled) = oneshot::channel();
        attempt(Arc::clone(&self.inner), request, reply)().await;
        settled.await.map_err(|_| DispatchError::Abandoned)?
    }

    /// Starts a connectivity check, or joins the one in flight.
    pub fn check_connectivity(&self) -> backend_resilience_connectivity::ConnectivityCheck {
        self.inner.prober.check()
    }
}

impl<T> Dispatcher<T> {
    /// Returns the request queue.
    pub fn queue(&self) -> &RequestQueue {
        &self.inner.queue
    }

    /// Returns the renewal coordinator.
    pub fn renewal(&self) -> &RenewalCoordinator {
        &self.inner.renewal
    }

    /// Returns the connectivity prober.
    pub fn prober(&self) -> &ConnectivityProber<T> {
        &self.inner.prober
    }
}

impl<T: Transport> Service<RequestDescriptor> for Dispatcher<T> {
    type Response = Response;
    type Error = DispatchError;
    type Future = BoxFuture<'static, Result<Response, DispatchError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: RequestDescriptor) -> Self::Future {
        let dispatcher = self.clone();
        Box::pin(async move { dispatcher.send(request).await })
    }
}

fn attempt<T: Transport>(
    inner: Arc<Inner<T>>,
    request: RequestDescriptor,
    reply: Reply,
) -> SendOperation {
    Box::new(move || run_attempt(inner, request, reply))
}

fn run_attempt<T: Transport>(
    inner: Arc<Inner<T>>,
    request: RequestDescriptor,
    reply: Reply,
) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        let started = Instant::now();
        let call = inner.transport.dispatch(request.clone());
        let outcome = match request.timeout.or(inner.config.default_timeout) {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_elapsed) => Err(TransportError::Timeout),
            },
            None => call.await,
        };

        let config = &inner.config;
        let classification = Classification::of(outcome, |response| (config.is_success)(response));

        #[cfg(feature = "metrics")]
        counter!(
            "dispatch_requests_total",
            "dispatcher" => config.name.clone(),
            "outcome" => classification.label()
        )
        .increment(1);

        match classification {
            Classification::Success(response) => {
                config.event_listeners.emit(&DispatchEvent::Succeeded {
                    name: config.name.clone(),
                    timestamp: Instant::now(),
                    status: response.status,
                    duration: started.elapsed(),
                });
                let _ = reply.send(Ok(response));
            }
            Classification::Rejected(response) => {
                config.event_listeners.emit(&DispatchEvent::Rejected {
                    name: config.name.clone(),
                    timestamp: Instant::now(),
                    status: response.status,
                    duration: started.elapsed(),
                });

                #[cfg(feature = "tracing")]
                debug!(dispatcher = %config.name, status = response.status, url = %request.url, "request rejected");

                let _ = reply.send(Err(DispatchError::Rejected { response }));
            }
            Classification::Unauthorized(_) => {
                #[cfg(feature = "tracing")]
                warn!(dispatcher = %config.name, url = %request.url, "unauthorized, requeueing until credentials are renewed");

                emit_requeued(config, RequeueReason::Unauthorized);
                inner
                    .queue
                    .requeue(attempt(Arc::clone(&inner), request, reply));
                inner.renewal.request_renewal();
            }
            Classification::Unreachable(error) => {
                let timed_out = error.is_timeout();

                #[cfg(feature = "tracing")]
                warn!(dispatcher = %config.name, url = %request.url, %error, "backend unreachable, requeueing until connectivity returns");

                emit_requeued(config, RequeueReason::Unreachable { timed_out });
                inner
                    .queue
                    .requeue(attempt(Arc::clone(&inner), request, reply));

                let check = inner.prober.check();
                let queue = inner.queue.clone();
                tokio::spawn(async move {
                    check.await;
                    queue.resume();
                });
            }
        }
    })
}

fn emit_requeued(config: &DispatchConfig, reason: RequeueReason) {
    config.event_listeners.emit(&DispatchEvent::Requeued {
        name: config.name.clone(),
        timestamp: Instant::now(),
        reason,
    });
}
