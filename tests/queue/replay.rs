use crate::common::settle;
use backend_resilience_queue::{QueueConfig, RequestQueue, SendOperation};
use futures::FutureExt;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn record(log: &Arc<Mutex<Vec<usize>>>, id: usize) -> SendOperation {
    let log = Arc::clone(log);
    Box::new(move || async move { log.lock().unwrap().push(id) }.boxed())
}

#[tokio::test]
async fn replay_waits_for_each_operation() {
    let queue = RequestQueue::default();
    let log = Arc::new(Mutex::new(Vec::new()));

    queue.pause();
    for id in 0..3 {
        let log = Arc::clone(&log);
        queue.enqueue(Box::new(move || {
            async move {
                log.lock().unwrap().push(id * 10);
                tokio::time::sleep(Duration::from_millis(5)).await;
                log.lock().unwrap().push(id * 10 + 1);
            }
            .boxed()
        }));
    }

    queue.resume();
    while log.lock().unwrap().len() < 6 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert_eq!(*log.lock().unwrap(), vec![0, 1, 10, 11, 20, 21]);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn requeues_within_one_pause_keep_their_order() {
    let queue = RequestQueue::default();
    let log = Arc::new(Mutex::new(Vec::new()));

    queue.pause();
    queue.enqueue(record(&log, 10));
    queue.enqueue(record(&log, 11));
    queue.requeue(record(&log, 1));
    queue.requeue(record(&log, 2));
    queue.enqueue(record(&log, 12));
    queue.requeue(record(&log, 3));

    queue.resume();
    settle().await;

    assert_eq!(*log.lock().unwrap(), vec![1, 2, 3, 10, 11, 12]);
}

#[tokio::test]
async fn requeue_during_replay_goes_ahead_of_the_rest() {
    let queue = RequestQueue::default();
    let log = Arc::new(Mutex::new(Vec::new()));

    queue.pause();
    {
        // Fails once: records itself, then puts a retry back in the queue.
        let q = queue.clone();
        let l = Arc::clone(&log);
        queue.enqueue(Box::new(move || {
            async move {
                l.lock().unwrap().push(1);
                q.requeue(record(&l, 100));
            }
            .boxed()
        }));
    }
    queue.enqueue(record(&log, 2));
    queue.enqueue(record(&log, 3));

    queue.resume();
    settle().await;
    assert_eq!(*log.lock().unwrap(), vec![1]);
    assert!(queue.is_paused());
    assert_eq!(queue.len(), 3);

    queue.resume();
    settle().await;
    assert_eq!(*log.lock().unwrap(), vec![1, 100, 2, 3]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enqueue_and_resume_run_everything_once() {
    let queue = RequestQueue::new(QueueConfig::builder().name("stress").build());
    let log = Arc::new(Mutex::new(Vec::new()));

    queue.pause();
    let producers: Vec<_> = (0..4)
        .map(|producer| {
            let queue = queue.clone();
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                for i in 0..50 {
                    queue.enqueue(record(&log, producer * 1000 + i));
                    if i % 10 == 0 {
                        queue.resume();
                        tokio::task::yield_now().await;
                        queue.pause();
                    }
                }
            })
        })
        .collect();
    for producer in producers {
        producer.await.unwrap();
    }

    queue.resume();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while log.lock().unwrap().len() < 200 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 200);
    let unique: HashSet<_> = log.iter().copied().collect();
    assert_eq!(unique.len(), 200);
    assert!(queue.is_empty());
}

#[test]
fn resume_outside_a_runtime_uses_the_captured_handle() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let queue = runtime.block_on(async { RequestQueue::default() });
    let log = Arc::new(Mutex::new(Vec::new()));

    queue.pause();
    queue.enqueue(record(&log, 1));
    queue.resume();

    runtime.block_on(settle());
    assert_eq!(*log.lock().unwrap(), vec![1]);
}
