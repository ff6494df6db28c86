use crate::common::{advance_to, Reply, ScriptedTransport};
use backend_resilience_connectivity::{ConnectivityProber, ConnectivityState, ProbeConfig};
use backend_resilience_core::Method;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

fn prober(transport: &ScriptedTransport) -> ConnectivityProber<ScriptedTransport> {
    ConnectivityProber::new(
        transport.clone(),
        ProbeConfig::builder("http://localhost/self").build(),
    )
}

#[tokio::test(start_paused = true)]
async fn resolves_when_backend_answers_ok() {
    let transport = ScriptedTransport::always(Reply::After(Duration::from_millis(10), 200));
    let prober = prober(&transport);
    let start = Instant::now();

    prober.check().await;

    assert!(start.elapsed() >= Duration::from_millis(10));
    assert!(start.elapsed() < Duration::from_millis(250));
    assert_eq!(transport.count(Method::Head), 1);
    assert_eq!(prober.state(), ConnectivityState::Reachable);
}

#[tokio::test(start_paused = true)]
async fn any_status_counts_as_reachable() {
    for status in [401, 404, 500, 503] {
        let transport = ScriptedTransport::always(Reply::After(Duration::from_millis(10), status));
        let prober = prober(&transport);

        prober.check().await;

        assert_eq!(transport.count(Method::Head), 1, "status {}", status);
        assert_eq!(prober.state(), ConnectivityState::Reachable);
    }
}

#[tokio::test(start_paused = true)]
async fn probes_head_self() {
    let transport = ScriptedTransport::always(Reply::Status(200));
    prober(&transport).check().await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Head);
    assert_eq!(requests[0].url, "http://localhost/self");
}

#[tokio::test(start_paused = true)]
async fn silent_backend_is_probed_again_after_backoff() {
    let transport = ScriptedTransport::always(Reply::Silent);
    let prober = prober(&transport);
    let start = Instant::now();

    let check = tokio::spawn(prober.check());

    advance_to(start, Duration::from_millis(251)).await;
    assert_eq!(transport.count(Method::Head), 1);
    assert!(!check.is_finished());

    advance_to(start, Duration::from_millis(2749)).await;
    assert_eq!(transport.count(Method::Head), 1);

    advance_to(start, Duration::from_millis(2751)).await;
    assert_eq!(transport.count(Method::Head), 2);
    assert!(!check.is_finished());
    assert_eq!(prober.state(), ConnectivityState::Checking);

    // Keeps going without an attempt ceiling.
    advance_to(start, Duration::from_secs(60)).await;
    assert!(transport.count(Method::Head) >= 20);
    assert!(!check.is_finished());
}

#[tokio::test(start_paused = true)]
async fn resolves_on_a_later_attempt() {
    let transport = ScriptedTransport::new(|_, previous| {
        if previous == 0 {
            Reply::Silent
        } else {
            Reply::Status(401)
        }
    });
    let prober = prober(&transport);
    let start = Instant::now();

    prober.check().await;

    assert_eq!(transport.count(Method::Head), 2);
    assert!(start.elapsed() >= Duration::from_millis(2750));
    assert!(start.elapsed() < Duration::from_millis(2800));
}

#[tokio::test(start_paused = true)]
async fn refused_connection_skips_the_timeout() {
    let transport = ScriptedTransport::new(|_, previous| {
        if previous == 0 {
            Reply::Refused
        } else {
            Reply::Status(200)
        }
    });
    let prober = prober(&transport);
    let start = Instant::now();

    prober.check().await;

    assert_eq!(transport.count(Method::Head), 2);
    assert!(start.elapsed() >= Duration::from_millis(2500));
    assert!(start.elapsed() < Duration::from_millis(2750));
}

#[tokio::test(start_paused = true)]
async fn exponential_backoff_grows_between_probes() {
    let transport = ScriptedTransport::new(|_, previous| {
        if previous < 3 {
            Reply::Silent
        } else {
            Reply::Status(200)
        }
    });
    let failures = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::clone(&failures);
    let config = ProbeConfig::builder("http://localhost/self")
        .exponential_backoff(Duration::from_millis(100), Duration::from_secs(1))
        .on_probe_failed(move |attempt, delay| f.lock().unwrap().push((attempt, delay)))
        .build();
    let prober = ConnectivityProber::new(transport.clone(), config);
    let start = Instant::now();

    prober.check().await;

    assert_eq!(
        *failures.lock().unwrap(),
        vec![
            (1, Duration::from_millis(100)),
            (2, Duration::from_millis(200)),
            (3, Duration::from_millis(400)),
        ]
    );
    // Three 250ms timeouts plus 700ms of backoff.
    assert!(start.elapsed() >= Duration::from_millis(1450));
    assert!(start.elapsed() < Duration::from_millis(1500));
    assert_eq!(transport.count(Method::Head), 4);
}

#[tokio::test(start_paused = true)]
async fn callbacks_report_the_sequence() {
    let transport = ScriptedTransport::new(|_, previous| {
        if previous == 0 {
            Reply::Silent
        } else {
            Reply::Status(204)
        }
    });
    let probes = Arc::new(Mutex::new(Vec::new()));
    let reachable = Arc::new(Mutex::new(None));
    let p = Arc::clone(&probes);
    let r = Arc::clone(&reachable);
    let config = ProbeConfig::builder("http://localhost/self")
        .name("api")
        .on_probe(move |attempt| p.lock().unwrap().push(attempt))
        .on_reachable(move |attempts, status| *r.lock().unwrap() = Some((attempts, status)))
        .build();

    ConnectivityProber::new(transport, config).check().await;

    assert_eq!(*probes.lock().unwrap(), vec![1, 2]);
    assert_eq!(*reachable.lock().unwrap(), Some((2, 204)));
}
