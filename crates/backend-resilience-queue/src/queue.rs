use crate::config::QueueConfig;
use crate::events::QueueEvent;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter, describe_gauge, gauge};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// A deferred send. Invoking it starts the attempt; the returned future
/// completes once the attempt has been classified.
pub type SendOperation = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

struct QueueState {
    paused: bool,
    pending: VecDeque<SendOperation>,
    // Operations requeued since the last resume; they sit at the front.
    requeued: usize,
    draining: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    config: QueueConfig,
    handle: Option<Handle>,
}

/// Ordered buffer of deferred sends, with a pause flag.
///
/// While paused, and until a replay has caught up, new operations are
/// appended instead of run. [`resume`]
/// clears the flag and replays the pending operations one at a time, in
/// order, each exactly once. A replayed operation that pauses the queue again
/// stops the replay; whatever has not been replayed yet stays queued.
///
/// The queue never pauses or resumes by itself.
///
/// [`resume`]: RequestQueue::resume
#[derive(Clone)]
pub struct RequestQueue {
    shared: Arc<Shared>,
}

impl RequestQueue {
    /// Creates an open queue.
    ///
    /// When called inside a Tokio runtime, the runtime handle is kept and
    /// used for replays triggered from outside any runtime.
    pub fn new(config: QueueConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            describe_gauge!(
                "request_queue_pending",
                "Number of operations waiting in the request queue"
            );
            describe_counter!(
                "request_queue_replayed_total",
                "Total number of operations replayed after a resume"
            );
        }

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState {
                    paused: false,
                    pending: VecDeque::new(),
                    requeued: 0,
                    draining: false,
                }),
                config,
                handle: Handle::try_current().ok(),
            }),
        }
    }

    /// Stops running new operations; they are deferred until [`resume`].
    ///
    /// [`resume`]: RequestQueue::resume
    pub fn pause(&self) {
        let was_paused = {
            let mut state = self.shared.state.lock();
            std::mem::replace(&mut state.paused, true)
        };

        if !was_paused {
            self.emit_paused();
        }
    }

    /// Runs `op` now, or appends it to the queue while paused or while
    /// older operations are still waiting to be replayed.
    pub fn enqueue(&self, op: SendOperation) {
        if let Err(op) = self.try_defer(op) {
            self.spawn(op());
        }
    }

    /// Appends `op` if the queue is paused or still holds operations,
    /// otherwise hands it back.
    ///
    /// A replay in progress counts as holding operations: `op` is appended
    /// behind them and the running replay picks it up, so it never
    /// overtakes an older operation. The check and the append happen under
    /// one lock, so an operation handed back was never visible to a
    /// concurrent replay.
    pub fn try_defer(&self, op: SendOperation) -> Result<(), SendOperation> {
        let pending = {
            let mut state = self.shared.state.lock();
            if !state.paused && !state.draining && state.pending.is_empty() {
                return Err(op);
            }
            state.pending.push_back(op);
            state.pending.len()
        };

        let config = &self.shared.config;
        config.event_listeners.emit(&QueueEvent::Deferred {
            name: config.name.clone(),
            timestamp: Instant::now(),
            pending,
        });

        #[cfg(feature = "metrics")]
        gauge!("request_queue_pending", "queue" => config.name.clone()).set(pending as f64);

        #[cfg(feature = "tracing")]
        debug!(queue = %config.name, pending, "operation deferred");

        Ok(())
    }

    /// Pauses the queue and puts a failed operation back.
    ///
    /// Requeued operations go ahead of operations deferred while paused,
    /// in the order they were requeued.
    pub fn requeue(&self, op: SendOperation) {
        let (was_paused, position, pending) = {
            let mut state = self.shared.state.lock();
            let was_paused = std::mem::replace(&mut state.paused, true);
            let position = state.requeued.min(state.pending.len());
            state.pending.insert(position, op);
            state.requeued = position + 1;
            (was_paused, position, state.pending.len())
        };

        if !was_paused {
            self.emit_paused();
        }

        let config = &self.shared.config;
        config.event_listeners.emit(&QueueEvent::Requeued {
            name: config.name.clone(),
            timestamp: Instant::now(),
            position,
            pending,
        });

        #[cfg(feature = "metrics")]
        gauge!("request_queue_pending", "queue" => config.name.clone()).set(pending as f64);

        #[cfg(feature = "tracing")]
        debug!(queue = %config.name, position, pending, "operation requeued");
    }

    /// Reopens the queue and replays pending operations in order.
    ///
    /// Replays run sequentially on a background task: each operation is
    /// awaited before the next starts. Calling `resume` while a replay is
    /// already running does not start a second one.
    pub fn resume(&self) {
        let (was_paused, pending, start_drain) = {
            let mut state = self.shared.state.lock();
            let was_paused = std::mem::replace(&mut state.paused, false);
            state.requeued = 0;
            let start_drain = !state.draining && !state.pending.is_empty();
            if start_drain {
                state.draining = true;
            }
            (was_paused, state.pending.len(), start_drain)
        };

        let config = &self.shared.config;
        if was_paused {
            config.event_listeners.emit(&QueueEvent::Resumed {
                name: config.name.clone(),
                timestamp: Instant::now(),
                pending,
            });

            #[cfg(feature = "tracing")]
            debug!(queue = %config.name, pending, "queue resumed");
        }

        if start_drain && !self.spawn(drain(Arc::clone(&self.shared))) {
            self.shared.state.lock().draining = false;
        }
    }

    /// Returns true while the queue is paused.
    pub fn is_paused(&self) -> bool {
        self.shared.state.lock().paused
    }

    /// Returns the number of pending operations.
    pub fn len(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    /// Returns true when no operation is pending.
    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().pending.is_empty()
    }

    /// Returns the queue configuration.
    pub fn config(&self) -> &QueueConfig {
        &self.shared.config
    }

    fn emit_paused(&self) {
        let config = &self.shared.config;
        config.event_listeners.emit(&QueueEvent::Paused {
            name: config.name.clone(),
            timestamp: Instant::now(),
        });

        #[cfg(feature = "tracing")]
        debug!(queue = %config.name, "queue paused");
    }

    fn spawn(&self, future: BoxFuture<'static, ()>) -> bool {
        match Handle::try_current()
            .ok()
            .or_else(|| self.shared.handle.clone())
        {
            Some(handle) => {
                handle.spawn(future);
                true
            }
            None => {
                #[cfg(feature = "tracing")]
                warn!(queue = %self.shared.config.name, "no tokio runtime available, operation dropped");
                false
            }
        }
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

impl std::fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("RequestQueue")
            .field("name", &self.shared.config.name)
            .field("paused", &state.paused)
            .field("pending", &state.pending.len())
            .finish()
    }
}

fn drain(shared: Arc<Shared>) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        loop {
            let (op, remaining) = {
                let mut state = shared.state.lock();
                let next = if state.paused {
                    None
                } else {
                    state.pending.pop_front()
                };
                match next {
                    Some(op) => (op, state.pending.len()),
                    None => {
                        state.draining = false;
                        return;
                    }
                }
            };

            let config = &shared.config;
            config.event_listeners.emit(&QueueEvent::Replayed {
                name: config.name.clone(),
                timestamp: Instant::now(),
                remaining,
            });

            #[cfg(feature = "metrics")]
            {
                counter!("request_queue_replayed_total", "queue" => config.name.clone())
                    .increment(1);
                gauge!("request_queue_pending", "queue" => config.name.clone())
                    .set(remaining as f64);
            }

            op().await;
        }
    })
}
