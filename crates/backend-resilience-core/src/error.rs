//! Transport failures and the outcome classification the dispatcher and the
//! prober act on.
//!
//! A transport call either produces a [`Response`] (any status code) or a
//! [`TransportError`]. [`Classification`] sorts both into the four cases of
//! the failure taxonomy:
//!
//! | Outcome                      | Classification  | Handling                         |
//! |------------------------------|-----------------|----------------------------------|
//! | status accepted as success   | `Success`       | resolved                         |
//! | 401                          | `Unauthorized`  | requeued, renewal requested      |
//! | any other status >= 400      | `Rejected`      | surfaced to the caller           |
//! | timeout / network failure    | `Unreachable`   | requeued behind a connectivity check |

use crate::transport::Response;

/// Boxed error type used for network failures reported by adapters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A transport call that produced no HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No response arrived within the request timeout.
    #[error("request timed out")]
    Timeout,
    /// The call failed below HTTP (DNS, refused connection, reset, ...).
    #[error("network error: {0}")]
    Network(#[source] BoxError),
}

impl TransportError {
    /// Wraps any error as a network failure.
    pub fn network<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        TransportError::Network(error.into())
    }

    /// Returns true if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

/// How a single transport outcome is handled.
#[derive(Debug)]
pub enum Classification {
    /// A response accepted as success.
    Success(Response),
    /// The backend answered 401; credentials need renewing.
    Unauthorized(Response),
    /// The backend answered with another error status.
    Rejected(Response),
    /// The backend could not be reached.
    Unreachable(TransportError),
}

impl Classification {
    /// Classifies a transport outcome.
    ///
    /// `is_success` decides which non-401 responses count as success; the
    /// default policy is [`default_success`]. A 401 is always
    /// `Unauthorized`, whatever the predicate says.
    pub fn of<F>(outcome: Result<Response, TransportError>, is_success: F) -> Self
    where
        F: Fn(&Response) -> bool,
    {
        match outcome {
            Ok(response) if response.is_unauthorized() => Classification::Unauthorized(response),
            Ok(response) if is_success(&response) => Classification::Success(response),
            Ok(response) => Classification::Rejected(response),
            Err(error) => Classification::Unreachable(error),
        }
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Success(_) => "success",
            Classification::Unauthorized(_) => "unauthorized",
            Classification::Rejected(_) => "rejected",
            Classification::Unreachable(_) => "unreachable",
        }
    }
}

/// Default success policy: any status below 400.
pub fn default_success(response: &Response) -> bool {
    response.status < 400
}
