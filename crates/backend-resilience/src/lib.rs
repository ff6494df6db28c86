//! Keep talking to an HTTP backend through connectivity loss and expired
//! credentials.
//!
//! `backend-resilience` puts a resilience layer between an application and
//! its backend. Requests that fail because the backend is unreachable or
//! because credentials expired are not surfaced as errors: they are queued
//! and replayed, in order, once the problem is repaired.
//!
//! # Components
//!
//! - **Connectivity** (`connectivity` feature): single-flight probing of the
//!   backend until it answers, with unbounded backoff retry
//! - **Queue** (`queue` feature): pausable FIFO of deferred requests
//! - **Renewal** (`renewal` feature): pauses the queue and announces
//!   credential renewal to an external authenticator
//! - **Dispatch** (`dispatch` feature): the dispatcher, the gzip JSON
//!   envelope and the [`BackendClient`](dispatch::BackendClient) facade
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! backend-resilience = { version = "0.1", features = ["full"] }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "dispatch", feature = "reqwest"))]
//! # {
//! use backend_resilience::core::ReqwestTransport;
//! use backend_resilience::dispatch::{BackendClient, BackendUrls, JsonRequest};
//! use backend_resilience::renewal::RenewCredentials;
//! use tokio::sync::mpsc;
//!
//! # async fn example() {
//! let (renewals, mut renewal_rx) = mpsc::unbounded_channel::<RenewCredentials>();
//! let client = BackendClient::builder(
//!     ReqwestTransport::new(),
//!     BackendUrls::new("https://backend.example.com", "wss://backend.example.com"),
//!     renewals,
//! )
//! .build();
//!
//! // The authenticator renews and then resumes the queue.
//! let authenticator = client.clone();
//! tokio::spawn(async move {
//!     while renewal_rx.recv().await.is_some() {
//!         // refresh the access token here
//!         authenticator.resume();
//!     }
//! });
//!
//! let url = client.create_url("/conversations");
//! let _ = client
//!     .send_json(JsonRequest::post(url, vec!["alice", "bob"]))
//!     .await;
//! # }
//! # }
//! ```

// Re-export core (always available)
pub use backend_resilience_core as core;

#[cfg(feature = "connectivity")]
pub use backend_resilience_connectivity as connectivity;

#[cfg(feature = "dispatch")]
pub use backend_resilience_dispatch as dispatch;

#[cfg(feature = "queue")]
pub use backend_resilience_queue as queue;

#[cfg(feature = "renewal")]
pub use backend_resilience_renewal as renewal;
