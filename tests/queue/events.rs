use crate::common::{settle, Counter};
use backend_resilience_queue::{QueueConfig, RequestQueue};
use futures::FutureExt;
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn callbacks_follow_a_pause_cycle() {
    let paused = Counter::new();
    let deferred = Arc::new(Mutex::new(Vec::new()));
    let resumed = Arc::new(Mutex::new(Vec::new()));
    let replayed = Arc::new(Mutex::new(Vec::new()));
    let (p, d, r, rp) = (
        paused.clone(),
        Arc::clone(&deferred),
        Arc::clone(&resumed),
        Arc::clone(&replayed),
    );

    let queue = RequestQueue::new(
        QueueConfig::builder()
            .on_paused(move || p.hit())
            .on_deferred(move |pending| d.lock().unwrap().push(pending))
            .on_resumed(move |pending| r.lock().unwrap().push(pending))
            .on_replayed(move |remaining| rp.lock().unwrap().push(remaining))
            .build(),
    );

    queue.pause();
    queue.enqueue(Box::new(|| async {}.boxed()));
    queue.requeue(Box::new(|| async {}.boxed()));
    queue.enqueue(Box::new(|| async {}.boxed()));
    queue.resume();
    settle().await;

    assert_eq!(paused.get(), 1);
    assert_eq!(*deferred.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(*resumed.lock().unwrap(), vec![3]);
    assert_eq!(*replayed.lock().unwrap(), vec![2, 1, 0]);
}

#[tokio::test]
async fn open_queue_emits_nothing() {
    let events = Counter::new();
    let (a, b, c) = (events.clone(), events.clone(), events.clone());
    let queue = RequestQueue::new(
        QueueConfig::builder()
            .on_deferred(move |_| a.hit())
            .on_resumed(move |_| b.hit())
            .on_replayed(move |_| c.hit())
            .build(),
    );

    queue.enqueue(Box::new(|| async {}.boxed()));
    queue.resume();
    settle().await;

    assert_eq!(events.get(), 0);
}
