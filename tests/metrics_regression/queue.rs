//! Request queue metrics regression tests

use super::helpers::*;
use backend_resilience_queue::{QueueConfig, RequestQueue};
use futures::FutureExt;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn queue_metrics_exist() {
    init_recorder();

    let queue = RequestQueue::new(QueueConfig::builder().name("test_queue").build());
    queue.pause();
    queue.enqueue(Box::new(|| async {}.boxed()));
    queue.enqueue(Box::new(|| async {}.boxed()));

    assert_gauge_exists("request_queue_pending");
    assert_metric_has_label("request_queue_pending", "queue", "test_queue");

    queue.resume();
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert!(queue.is_empty());

    assert_counter_exists("request_queue_replayed_total");
    assert_metric_has_label("request_queue_replayed_total", "queue", "test_queue");
}
