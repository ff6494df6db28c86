use crate::common::{settle, Counter, Reply, ScriptedTransport};
use backend_resilience_connectivity::ProbeConfig;
use backend_resilience_core::RequestDescriptor;
use backend_resilience_dispatch::{DispatchConfig, DispatchError, DispatchLayer};
use backend_resilience_queue::RequestQueue;
use backend_resilience_renewal::{FnSink, RenewalConfig, RenewalCoordinator};
use tower::{Service, ServiceBuilder, ServiceExt};

fn layer(renewals: Counter) -> DispatchLayer {
    let renewal = RenewalCoordinator::new(
        RequestQueue::default(),
        FnSink::new(move || renewals.hit()),
        RenewalConfig::default(),
    );
    DispatchLayer::new(
        renewal,
        ProbeConfig::builder("http://localhost/self").build(),
        DispatchConfig::default(),
    )
}

#[tokio::test]
async fn layer_builds_a_dispatcher_service() {
    let transport = ScriptedTransport::new(|request, _| {
        if request.url.ends_with("/missing") {
            Reply::Status(404)
        } else {
            Reply::Status(200)
        }
    });
    let mut service = ServiceBuilder::new()
        .layer(layer(Counter::new()))
        .service(transport);

    let response = service
        .ready()
        .await
        .unwrap()
        .call(RequestDescriptor::get("http://localhost/user"))
        .await
        .unwrap();
    assert_eq!(response.status, 200);

    let missing = service
        .ready()
        .await
        .unwrap()
        .call(RequestDescriptor::get("http://localhost/missing"))
        .await;
    assert!(matches!(missing, Err(DispatchError::Rejected { .. })));
}

#[tokio::test]
async fn layered_services_share_the_queue() {
    let renewals = Counter::new();
    let layer = layer(renewals.clone());
    let first = tower::Layer::layer(&layer, ScriptedTransport::always(Reply::Status(401)));
    let second = tower::Layer::layer(&layer, ScriptedTransport::always(Reply::Status(200)));

    let pending = tokio::spawn(first.clone().oneshot(RequestDescriptor::get("http://localhost/a")));
    settle().await;
    assert_eq!(renewals.get(), 1);
    assert!(second.queue().is_paused());

    let deferred = tokio::spawn(second.clone().oneshot(RequestDescriptor::get("http://localhost/b")));
    settle().await;
    assert_eq!(second.queue().len(), 2);
    assert!(!pending.is_finished());
    assert!(!deferred.is_finished());
}
