//! Backend reachability probing.
//!
//! [`ConnectivityProber::check`] sends a lightweight probe request (by
//! default `HEAD {rest_url}/self`) and resolves as soon as the backend
//! answers with any HTTP response. Timeouts and network errors are followed
//! by a backoff and another probe, with no attempt ceiling.
//!
//! Only one probe sequence runs at a time. Callers that check while a
//! sequence is in flight share its outcome.
//!
//! # Example
//!
//! ```rust,no_run
//! use backend_resilience_connectivity::{ConnectivityProber, ProbeConfig};
//! use backend_resilience_core::{RequestDescriptor, Response, TransportError};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let transport = tower::service_fn(|_request: RequestDescriptor| async {
//!     Ok::<_, TransportError>(Response::new(200))
//! });
//!
//! let config = ProbeConfig::builder("https://backend.example.com/self")
//!     .timeout(Duration::from_millis(250))
//!     .fixed_backoff(Duration::from_millis(2500))
//!     .on_reachable(|attempts, status| {
//!         println!("backend answered {} after {} probes", status, attempts);
//!     })
//!     .build();
//!
//! let prober = ConnectivityProber::new(transport, config);
//! prober.check().await;
//! # }
//! ```
//!
//! # Backoff
//!
//! - [`FixedInterval`]: the same delay after every failure (default, 2500ms)
//! - [`ExponentialBackoff`]: growing delay with an optional cap
//! - [`FnInterval`]: delay computed by a closure
//!
//! None of them limit the number of probes.

mod backoff;
mod config;
mod events;
mod prober;

pub use backoff::{ExponentialBackoff, FixedInterval, FnInterval, IntervalFunction};
pub use config::{ProbeConfig, ProbeConfigBuilder, DEFAULT_PROBE_BACKOFF, DEFAULT_PROBE_TIMEOUT};
pub use events::ProbeEvent;
pub use prober::{ConnectivityCheck, ConnectivityProber, ConnectivityState};
