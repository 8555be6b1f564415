//! Outbound broadcast pipeline: classification, formatting, strategy
//! dispatch, and failure classification.

use std::sync::Arc;

use bridge_core::{
    BridgeError, BridgeErrorCategory, BroadcastOutcome, ForeignLink, Notice, PosterSelector,
    RemoteCredentials, UrlShortener, format_status, should_broadcast,
};
use bridge_store::{LinkStore, UserDirectory};
use tracing::{debug, info, warn};

use crate::{config::BridgeConfig, lifecycle::LinkLifecycle};

/// Orchestrates one broadcast attempt per notice.
///
/// Expected remote-service failures are converted into the three-way
/// [`BroadcastOutcome`]; only unreadable credentials propagate as a hard
/// error, since no recovery policy exists for them. Retry is caller-driven:
/// `Requeue` is a signal, not a promise to re-invoke.
pub struct BroadcastCoordinator {
    links: Arc<dyn LinkStore>,
    users: Arc<dyn UserDirectory>,
    posters: Arc<dyn PosterSelector>,
    shortener: Arc<dyn UrlShortener>,
    lifecycle: Arc<LinkLifecycle>,
    config: BridgeConfig,
}

impl BroadcastCoordinator {
    pub fn new(
        links: Arc<dyn LinkStore>,
        users: Arc<dyn UserDirectory>,
        posters: Arc<dyn PosterSelector>,
        shortener: Arc<dyn UrlShortener>,
        lifecycle: Arc<LinkLifecycle>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            links,
            users,
            posters,
            shortener,
            lifecycle,
            config,
        }
    }

    /// Attempt delivery of one notice to the remote service.
    pub async fn broadcast(&self, notice: &Notice) -> Result<BroadcastOutcome, BridgeError> {
        let link = match self
            .links
            .link_for_user(notice.profile_id, self.config.remote_service_id)
        {
            Ok(link) => link,
            Err(err) => {
                warn!(
                    notice_id = notice.id,
                    error = %err,
                    "link lookup failed; requeueing notice"
                );
                return Ok(BroadcastOutcome::Requeue);
            }
        };

        let Some(link) = link else {
            debug!(notice_id = notice.id, "no bridge link for author");
            return Ok(BroadcastOutcome::Delivered);
        };

        if !should_broadcast(notice, Some(&link)) {
            debug!(
                notice_id = notice.id,
                "notice is not bound for the remote service"
            );
            return Ok(BroadcastOutcome::Delivered);
        }

        let credentials = RemoteCredentials::decode(&link.credentials)?;
        let owner_label = self.owner_label(link.user_id);

        let statustxt = match format_status(notice, self.shortener.as_ref()).await {
            Ok(statustxt) => statustxt,
            Err(err) => {
                warn!(
                    notice_id = notice.id,
                    user = %owner_label,
                    error = %err,
                    "status formatting failed; requeueing notice"
                );
                return Ok(BroadcastOutcome::Requeue);
            }
        };

        let poster = self.posters.select(&credentials);
        match poster.post_status(&statustxt).await {
            Ok(Some(status)) => {
                info!(
                    notice_id = notice.id,
                    user = %owner_label,
                    remote_status_id = status.id,
                    strategy = credentials.strategy_name(),
                    "posted notice to remote service"
                );
                Ok(BroadcastOutcome::Delivered)
            }
            Ok(None) => {
                warn!(
                    notice_id = notice.id,
                    user = %owner_label,
                    "no data returned by remote service; requeueing notice"
                );
                Ok(BroadcastOutcome::Requeue)
            }
            Err(err) => Ok(self.outcome_for_failure(notice, &link, &owner_label, err).await),
        }
    }

    async fn outcome_for_failure(
        &self,
        notice: &Notice,
        link: &ForeignLink,
        owner_label: &str,
        err: BridgeError,
    ) -> BroadcastOutcome {
        warn!(
            notice_id = notice.id,
            user = %owner_label,
            code = ?err.remote_status,
            message = %err.message,
            "remote service rejected notice"
        );

        match err.category {
            BridgeErrorCategory::Auth => {
                // Revoked or otherwise dead access credentials; tear the
                // link down. The notice itself is handled, not retried.
                self.lifecycle.remove_link(link).await;
                BroadcastOutcome::Dropped
            }
            // Over the rate limit; toss the notice, keep the link.
            BridgeErrorCategory::RateLimited => BroadcastOutcome::Dropped,
            _ => BroadcastOutcome::Requeue,
        }
    }

    fn owner_label(&self, user_id: u64) -> String {
        match self.users.user(user_id) {
            Ok(Some(user)) => format!("{} (user id {})", user.nickname, user.id),
            _ => format!("user id {user_id}"),
        }
    }
}
