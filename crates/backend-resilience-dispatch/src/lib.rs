//! Resilient request dispatch for an HTTP backend.
//!
//! The [`Dispatcher`] sits between callers and a [`Transport`] and turns
//! recoverable failures into waiting instead of errors:
//!
//! - **401**: the request is requeued, the queue paused and credential
//!   renewal announced. The authenticator resumes the queue when done.
//! - **Timeout or network error**: the request is requeued, the queue
//!   paused and a single-flight connectivity check started. The queue
//!   resumes on its own once the backend answers a probe.
//! - **Any other error status**: the caller gets [`DispatchError::Rejected`].
//!
//! Requests sent while the queue is paused wait in it. Replays run in
//! order; requests that were requeued go first.
//!
//! [`BackendClient`] bundles all of it behind `send`, `send_json`,
//! `check_connectivity` and `resume`. [`JsonEnvelope`] turns a
//! [`JsonRequest`] into a gzip-compressed JSON request.
//!
//! [`Transport`]: backend_resilience_core::Transport
//!
//! # Example
//!
//! ```rust
//! use backend_resilience_core::{RequestDescriptor, Response, TransportError};
//! use backend_resilience_dispatch::{BackendClient, BackendUrls, DispatchConfig};
//! use backend_resilience_renewal::FnSink;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let transport = tower::service_fn(|_request: RequestDescriptor| async {
//!     Ok::<_, TransportError>(Response::new(200))
//! });
//!
//! let client = BackendClient::builder(
//!     transport,
//!     BackendUrls::new("https://backend.example.com", "wss://backend.example.com"),
//!     FnSink::new(|| println!("access token expired")),
//! )
//! .dispatch(
//!     DispatchConfig::builder()
//!         .default_timeout(Duration::from_secs(30))
//!         .on_requeued(|reason| println!("requeued: {:?}", reason))
//!         .build(),
//! )
//! .build();
//!
//! let response = client
//!     .send(RequestDescriptor::get(client.create_url("/self")))
//!     .await
//!     .unwrap();
//! assert_eq!(response.status, 200);
//! # }
//! ```
//!
//! # Feature Flags
//!
//! - `tracing`: log state transitions with the `tracing` crate
//! - `metrics`: export counters and gauges with the `metrics` crate

mod client;
mod config;
mod dispatcher;
mod error;
mod events;
mod json;
mod layer;

pub use client::{BackendClient, BackendClientBuilder, BackendUrls, SELF_PATH};
pub use config::{DispatchConfig, DispatchConfigBuilder, SuccessPredicate};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, Result};
pub use events::{DispatchEvent, RequeueReason};
pub use json::{EnvelopeError, JsonEnvelope, JsonRequest, GZIP_CONTENT_ENCODING, JSON_CONTENT_TYPE};
pub use layer::DispatchLayer;
