//! Dispatcher metrics regression tests

use super::helpers::*;
use backend_resilience_connectivity::ProbeConfig;
use backend_resilience_core::{RequestDescriptor, Response, TransportError};
use backend_resilience_dispatch::{DispatchConfig, Dispatcher};
use backend_resilience_queue::RequestQueue;
use backend_resilience_renewal::{FnSink, RenewalConfig, RenewalCoordinator};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn dispatch_metrics_exist() {
    init_recorder();

    let transport = tower::service_fn(|request: RequestDescriptor| async move {
        let status = if request.url.ends_with("/missing") { 404 } else { 200 };
        Ok::<_, TransportError>(Response::new(status))
    });
    let renewal = RenewalCoordinator::new(
        RequestQueue::default(),
        FnSink::new(|| {}),
        RenewalConfig::default(),
    );
    let dispatcher = Dispatcher::new(
        transport,
        renewal,
        ProbeConfig::builder("http://localhost/self").build(),
        DispatchConfig::builder().name("test_dispatcher").build(),
    );

    let _ = dispatcher
        .send(RequestDescriptor::get("http://localhost/user"))
        .await;
    let _ = dispatcher
        .send(RequestDescriptor::get("http://localhost/missing"))
        .await;

    assert_counter_exists("dispatch_requests_total");
    assert_metric_has_label("dispatch_requests_total", "dispatcher", "test_dispatcher");
    assert_metric_has_label("dispatch_requests_total", "outcome", "success");
    assert_metric_has_label("dispatch_requests_total", "outcome", "rejected");
}
