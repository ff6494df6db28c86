//! Core infrastructure for backend-resilience.
//!
//! This crate provides what every other backend-resilience crate shares:
//! - The transport boundary ([`Transport`], [`RequestDescriptor`], [`Response`])
//! - Transport failures and outcome classification ([`TransportError`], [`Classification`])
//! - The event system used for observability
//! - A `reqwest` transport adapter (`reqwest` feature)

pub mod error;
pub mod events;
#[cfg(feature = "reqwest")]
mod http_client;
pub mod transport;

pub use error::{default_success, BoxError, Classification, TransportError};
pub use events::{BackendEvent, EventListener, EventListeners, FnListener};
#[cfg(feature = "reqwest")]
pub use http_client::ReqwestTransport;
pub use transport::{Headers, Method, RequestDescriptor, Response, Transport};
