use crate::common::{advance_to, settle, Counter, Reply, ScriptedTransport};
use backend_resilience_connectivity::{ConnectivityProber, ConnectivityState, ProbeConfig};
use backend_resilience_core::Method;
use std::time::Duration;
use tokio::time::Instant;

fn silent_once() -> ScriptedTransport {
    ScriptedTransport::new(|_, previous| {
        if previous == 0 {
            Reply::Silent
        } else {
            Reply::Status(200)
        }
    })
}

#[tokio::test(start_paused = true)]
async fn concurrent_checks_share_one_sequence() {
    let transport = silent_once();
    let prober = ConnectivityProber::new(
        transport.clone(),
        ProbeConfig::builder("http://localhost/self").build(),
    );

    let checks: Vec<_> = (0..10).map(|_| tokio::spawn(prober.check())).collect();
    for check in checks {
        check.await.unwrap();
    }

    assert_eq!(transport.count(Method::Head), 2);
    assert_eq!(prober.state(), ConnectivityState::Reachable);
}

#[tokio::test(start_paused = true)]
async fn late_caller_joins_the_running_sequence() {
    let transport = silent_once();
    let started = Counter::new();
    let joined = Counter::new();
    let (s, j) = (started.clone(), joined.clone());
    let config = ProbeConfig::builder("http://localhost/self")
        .on_check(move |joined| if joined { j.hit() } else { s.hit() })
        .build();
    let prober = ConnectivityProber::new(transport.clone(), config);
    let start = Instant::now();

    let first = tokio::spawn(prober.check());
    advance_to(start, Duration::from_millis(1000)).await;
    assert!(prober.is_checking());

    let second = tokio::spawn(prober.check());
    settle().await;
    assert_eq!(transport.count(Method::Head), 1);

    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(transport.count(Method::Head), 2);
    assert_eq!(started.get(), 1);
    assert_eq!(joined.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn finished_sequence_is_not_reused() {
    let transport = ScriptedTransport::always(Reply::Status(200));
    let prober = ConnectivityProber::new(
        transport.clone(),
        ProbeConfig::builder("http://localhost/self").build(),
    );

    prober.check().await;
    prober.check().await;

    assert_eq!(transport.count(Method::Head), 2);
}

#[tokio::test(start_paused = true)]
async fn clones_share_the_sequence() {
    let transport = silent_once();
    let prober = ConnectivityProber::new(
        transport.clone(),
        ProbeConfig::builder("http://localhost/self").build(),
    );
    let clone = prober.clone();

    futures::future::join(prober.check(), clone.check()).await;

    assert_eq!(transport.count(Method::Head), 2);
    assert_eq!(clone.state(), ConnectivityState::Reachable);
}
