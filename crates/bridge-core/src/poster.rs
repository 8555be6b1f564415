//! Delivery contracts for the remote service.

use async_trait::async_trait;

use crate::{
    credentials::RemoteCredentials,
    error::BridgeError,
    types::{LocalUser, RemoteStatus},
};

/// One auth strategy's view of the remote service: post a status, get back
/// the remote echo or a classified failure.
///
/// A successful call may still return `None` when the service responds
/// without a payload; callers treat that as transient flakiness rather than
/// a confirmed delivery.
#[async_trait]
pub trait StatusPoster: Send + Sync {
    /// Post one status update.
    async fn post_status(&self, text: &str) -> Result<Option<RemoteStatus>, BridgeError>;
}

/// Maps a decoded credential variant to the strategy that can use it.
pub trait PosterSelector: Send + Sync {
    /// Build the poster for the given credentials.
    fn select(&self, credentials: &RemoteCredentials) -> Box<dyn StatusPoster>;
}

/// Collaborator delivering notification mail to local users.
#[async_trait]
pub trait BridgeMailer: Send + Sync {
    /// Send one message; failures are reported, never retried here.
    async fn send_mail(
        &self,
        user: &LocalUser,
        subject: &str,
        body: &str,
    ) -> Result<(), BridgeError>;
}
