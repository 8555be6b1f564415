//! Bridge-link record lifecycle: removal with user notification, and the
//! cached remote-identity upsert.

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use bridge_core::{BridgeMailer, ForeignLink, ForeignUser, LocalUser};
use bridge_store::{LinkStore, RemoteUserStore, UserDirectory};
use tracing::{error, info, warn};

use crate::{config::BridgeConfig, mail::compose_removal_mail};

/// Create/update/remove operations over bridge-link and remote-identity
/// records. Persistence and notification failures are logged here and never
/// escalated; the decisions that led to these calls stand regardless.
pub struct LinkLifecycle {
    links: Arc<dyn LinkStore>,
    remote_users: Arc<dyn RemoteUserStore>,
    users: Arc<dyn UserDirectory>,
    mailer: Arc<dyn BridgeMailer>,
    config: BridgeConfig,
}

impl LinkLifecycle {
    pub fn new(
        links: Arc<dyn LinkStore>,
        remote_users: Arc<dyn RemoteUserStore>,
        users: Arc<dyn UserDirectory>,
        mailer: Arc<dyn BridgeMailer>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            links,
            remote_users,
            users,
            mailer,
            config,
        }
    }

    /// Remove a bridge link and notify its owner, best-effort.
    ///
    /// A delete failure is logged and the notification is still attempted; a
    /// notification failure is logged and swallowed.
    pub async fn remove_link(&self, link: &ForeignLink) {
        let owner = self.lookup_owner(link.user_id);

        match &owner {
            Some(owner) => info!(
                user_id = link.user_id,
                user = %owner.nickname,
                "removing bridge link"
            ),
            None => info!(user_id = link.user_id, "removing bridge link"),
        }

        if let Err(err) = self.links.delete_link(link.user_id, link.service) {
            error!(
                user_id = link.user_id,
                error = %err,
                "could not remove bridge link"
            );
        }

        let Some(owner) = owner else {
            return;
        };
        if owner.email.is_none() {
            return;
        }

        let (subject, body) = compose_removal_mail(&owner, &self.config);
        if let Err(err) = self.mailer.send_mail(&owner, &subject, &body).await {
            warn!(
                user_id = owner.id,
                user = %owner.nickname,
                error = %err,
                "unable to notify user that their bridge link was removed"
            );
        }
    }

    /// Refresh the cached remote-identity record for an observed account.
    ///
    /// Stale records under the same remote ID (screen-name change) or the
    /// same computed profile URI (remote-account reassignment) are deleted
    /// first. Returns `None` when the fresh record could not be inserted.
    pub fn upsert_remote_user(&self, remote_id: u64, screen_name: &str) -> Option<ForeignUser> {
        let service = self.config.remote_service_id;

        match self.remote_users.remote_user(remote_id, service) {
            Ok(Some(existing)) if existing.nickname != screen_name => {
                match self.remote_users.delete_remote_user(remote_id, service) {
                    Ok(()) => info!(
                        remote_id,
                        old = %existing.nickname,
                        new = screen_name,
                        "remote user changed screen name; refreshing record"
                    ),
                    Err(err) => warn!(
                        remote_id,
                        error = %err,
                        "could not delete renamed remote user record"
                    ),
                }
            }
            Ok(_) => {}
            Err(err) => warn!(
                remote_id,
                error = %err,
                "remote user lookup failed; proceeding with insert"
            ),
        }

        let uri = self.config.profile_uri(screen_name);

        // Remote accounts move around and get reassigned; a record already
        // holding the new screen name's URI belongs to a dead identity.
        match self.remote_users.remote_user_by_uri(&uri, service) {
            Ok(Some(stale)) if stale.remote_id != remote_id => {
                match self
                    .remote_users
                    .delete_remote_user(stale.remote_id, service)
                {
                    Ok(()) => info!(
                        stale_remote_id = stale.remote_id,
                        %uri,
                        "removed remote user record with colliding profile uri"
                    ),
                    Err(err) => warn!(
                        stale_remote_id = stale.remote_id,
                        error = %err,
                        "could not delete colliding remote user record"
                    ),
                }
            }
            Ok(_) => {}
            Err(err) => warn!(
                %uri,
                error = %err,
                "remote user uri lookup failed; proceeding with insert"
            ),
        }

        let fresh = ForeignUser {
            remote_id,
            service,
            nickname: screen_name.to_owned(),
            uri,
            created_ms: now_ms(),
        };

        match self.remote_users.insert_remote_user(&fresh) {
            Ok(()) => {
                info!(remote_id, nickname = screen_name, "cached remote user record");
                Some(fresh)
            }
            Err(err) => {
                warn!(
                    remote_id,
                    nickname = screen_name,
                    error = %err,
                    "failed caching remote user record"
                );
                None
            }
        }
    }

    fn lookup_owner(&self, user_id: u64) -> Option<LocalUser> {
        match self.users.user(user_id) {
            Ok(owner) => owner,
            Err(err) => {
                warn!(user_id, error = %err, "owner lookup failed");
                None
            }
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}
