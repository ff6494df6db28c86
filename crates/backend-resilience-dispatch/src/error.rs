//! Error types for the dispatcher.

use crate::json::EnvelopeError;
use backend_resilience_core::Response;

/// Errors surfaced to callers of [`Dispatcher::send`](crate::Dispatcher::send).
///
/// Unauthorized responses and connectivity failures never show up here;
/// those requests are requeued and replayed instead.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The backend answered with a status the success policy does not accept.
    #[error("backend rejected the request with status {}", .response.status)]
    Rejected {
        /// The rejecting response, body included.
        response: Response,
    },
    /// The JSON body could not be encoded; nothing was sent.
    #[error("failed to encode request: {0}")]
    Encode(#[from] EnvelopeError),
    /// The queue holding the deferred request was dropped before replaying it.
    #[error("request abandoned before it could be replayed")]
    Abandoned,
}

impl DispatchError {
    /// Returns the rejecting response, if any.
    pub fn response(&self) -> Option<&Response> {
        match self {
            DispatchError::Rejected { response } => Some(response),
            _ => None,
        }
    }

    /// Returns the rejecting status code, if any.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|response| response.status)
    }
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
