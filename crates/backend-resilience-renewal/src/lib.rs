//! Credential renewal coordination.
//!
//! When the backend answers 401, outbound traffic has to wait for fresh
//! credentials. [`RenewalCoordinator::request_renewal`] pauses the
//! [`RequestQueue`](backend_resilience_queue::RequestQueue) and announces
//! [`RenewCredentials`] to a [`CredentialRenewalSink`]. Renewing is not done
//! here; the authenticator listening on the sink calls
//! [`RenewalCoordinator::renewal_completed`] when it is done.
//!
//! # Example
//!
//! ```rust
//! use backend_resilience_queue::RequestQueue;
//! use backend_resilience_renewal::{RenewalConfig, RenewalCoordinator, RenewCredentials};
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::unbounded_channel::<RenewCredentials>();
//! let coordinator = RenewalCoordinator::new(RequestQueue::default(), tx, RenewalConfig::default());
//!
//! coordinator.request_renewal();
//! assert!(coordinator.queue().is_paused());
//! assert!(rx.try_recv().is_ok());
//! ```

mod config;
mod coordinator;
mod events;
mod sink;

pub use config::{RenewalConfig, RenewalConfigBuilder};
pub use coordinator::RenewalCoordinator;
pub use events::RenewalEvent;
pub use sink::{CredentialRenewalSink, FnSink, RenewCredentials};
