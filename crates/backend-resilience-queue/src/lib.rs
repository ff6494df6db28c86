//! Pausable request queue.
//!
//! A [`RequestQueue`] holds sends that cannot go out right now: requests
//! issued while the backend is unreachable or credentials are being renewed,
//! and requests that failed for one of those reasons. On [`RequestQueue::resume`]
//! they are replayed in order, one at a time.
//!
//! # Example
//!
//! ```rust
//! use backend_resilience_queue::{QueueConfig, RequestQueue};
//! use futures::FutureExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let queue = RequestQueue::new(
//!     QueueConfig::builder()
//!         .name("api")
//!         .on_resumed(|pending| println!("replaying {} requests", pending))
//!         .build(),
//! );
//!
//! queue.pause();
//! queue.enqueue(Box::new(|| async { println!("sent") }.boxed()));
//! assert_eq!(queue.len(), 1);
//!
//! queue.resume();
//! # }
//! ```

mod config;
mod events;
mod queue;

pub use config::{QueueConfig, QueueConfigBuilder};
pub use events::QueueEvent;
pub use queue::{RequestQueue, SendOperation};
