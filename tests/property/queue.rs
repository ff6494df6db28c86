//! Property tests for the request queue.
//!
//! Invariants tested:
//! - Every operation runs exactly once, in enqueue order, however pauses
//!   and resumes interleave
//! - Operations deferred during one pause replay in FIFO order

use backend_resilience_queue::{RequestQueue, SendOperation};
use futures::FutureExt;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};
use tokio::runtime::Builder;

#[derive(Debug, Clone)]
enum Step {
    Pause,
    Resume,
    Enqueue,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => Just(Step::Pause),
        1 => Just(Step::Resume),
        4 => Just(Step::Enqueue),
    ]
}

fn record(log: &Arc<Mutex<Vec<usize>>>, id: usize) -> SendOperation {
    let log = Arc::clone(log);
    Box::new(move || {
        async move {
            log.lock().unwrap().push(id);
        }
        .boxed()
    })
}

async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: each enqueued operation runs exactly once and none overtakes an older one
    #[test]
    fn operations_run_exactly_once_in_order(steps in prop::collection::vec(step(), 1..40)) {
        let rt = Builder::new_current_thread().enable_all().build().unwrap();
        let (ran, enqueued) = rt.block_on(async {
            let queue = RequestQueue::default();
            let log = Arc::new(Mutex::new(Vec::new()));
            let mut enqueued = 0;

            for step in &steps {
                match step {
                    Step::Pause => queue.pause(),
                    Step::Resume => queue.resume(),
                    Step::Enqueue => {
                        queue.enqueue(record(&log, enqueued));
                        enqueued += 1;
                    }
                }
                settle().await;
            }

            queue.resume();
            settle().await;
            assert!(queue.is_empty());

            let ran = log.lock().unwrap().clone();
            (ran, enqueued)
        });

        prop_assert_eq!(ran, (0..enqueued).collect::<Vec<_>>());
    }

    /// Property: a single pause replays in enqueue order
    #[test]
    fn paused_operations_replay_in_order(count in 1usize..30) {
        let rt = Builder::new_current_thread().enable_all().build().unwrap();
        let ran = rt.block_on(async {
            let queue = RequestQueue::default();
            let log = Arc::new(Mutex::new(Vec::new()));

            queue.pause();
            for id in 0..count {
                queue.enqueue(record(&log, id));
            }
            assert_eq!(queue.len(), count);

            queue.resume();
            settle().await;
            let ran = log.lock().unwrap().clone();
            ran
        });

        prop_assert_eq!(ran, (0..count).collect::<Vec<_>>());
    }
}
