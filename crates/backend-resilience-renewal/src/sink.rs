//! Where renewal announcements go.

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

#[cfg(feature = "tracing")]
use tracing::warn;

/// Announcement that the current credentials were rejected and must be
/// renewed before queued requests can be replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenewCredentials;

/// Receives renewal announcements.
///
/// The authenticator behind the sink renews credentials on its own schedule
/// and then resumes the request queue. Announcing never blocks and never
/// fails from the caller's point of view.
pub trait CredentialRenewalSink: Send + Sync + 'static {
    /// Announces that credentials must be renewed.
    fn renew_credentials(&self);
}

/// Sink backed by a closure.
pub struct FnSink<F> {
    f: F,
}

impl<F> FnSink<F>
where
    F: Fn() + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> CredentialRenewalSink for FnSink<F>
where
    F: Fn() + Send + Sync + 'static,
{
    fn renew_credentials(&self) {
        (self.f)();
    }
}

impl<S> CredentialRenewalSink for Arc<S>
where
    S: CredentialRenewalSink + ?Sized,
{
    fn renew_credentials(&self) {
        (**self).renew_credentials();
    }
}

impl CredentialRenewalSink for mpsc::UnboundedSender<RenewCredentials> {
    fn renew_credentials(&self) {
        if self.send(RenewCredentials).is_err() {
            #[cfg(feature = "tracing")]
            warn!("renewal receiver dropped, announcement lost");
        }
    }
}

impl CredentialRenewalSink for mpsc::Sender<RenewCredentials> {
    fn renew_credentials(&self) {
        // A full channel already holds an announcement nobody has handled.
        if let Err(mpsc::error::TrySendError::Closed(_)) = self.try_send(RenewCredentials) {
            #[cfg(feature = "tracing")]
            warn!("renewal receiver dropped, announcement lost");
        }
    }
}

impl CredentialRenewalSink for broadcast::Sender<RenewCredentials> {
    fn renew_credentials(&self) {
        if self.send(RenewCredentials).is_err() {
            #[cfg(feature = "tracing")]
            warn!("no renewal subscribers, announcement lost");
        }
    }
}
