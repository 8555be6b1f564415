mod config;
mod logging;

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use bridge_broadcast::{BridgeConfig, BroadcastCoordinator, LinkLifecycle};
use bridge_core::{BridgeError, BridgeMailer, ForeignLink, LocalUser, Notice, NoticeSyncFlags};
use bridge_remote::{HttpUrlShortener, RemoteApiConfig, RemotePosterSelector};
use bridge_store::{InMemoryLinkStore, InMemoryRemoteUserStore, InMemoryUserDirectory, LinkStore};
use tracing::info;

use crate::config::SmokeConfig;

const SMOKE_USER_ID: u64 = 1;

/// Mailer stand-in for smoke runs: notification mail is logged, not sent.
struct LogMailer;

#[async_trait]
impl BridgeMailer for LogMailer {
    async fn send_mail(
        &self,
        user: &LocalUser,
        subject: &str,
        _body: &str,
    ) -> Result<(), BridgeError> {
        info!(user = %user.nickname, subject, "would send notification mail");
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    logging::init();

    let cfg = match SmokeConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    let bridge_config = match BridgeConfig::new(
        cfg.remote_service_id,
        cfg.remote_service_name.clone(),
        cfg.remote_profile_base.clone(),
        cfg.site_name.clone(),
        cfg.settings_url.clone(),
    ) {
        Ok(bridge_config) => bridge_config,
        Err(err) => {
            eprintln!("Invalid bridge configuration: {err}");
            std::process::exit(1);
        }
    };

    let links = Arc::new(InMemoryLinkStore::default());
    let users = Arc::new(InMemoryUserDirectory::default());
    let remote_users = Arc::new(InMemoryRemoteUserStore::default());

    let seeded = users
        .insert(LocalUser {
            id: SMOKE_USER_ID,
            nickname: "smoke".to_owned(),
            email: None,
        })
        .and_then(|()| {
            links.upsert_link(&ForeignLink {
                user_id: SMOKE_USER_ID,
                service: cfg.remote_service_id,
                credentials: cfg.credentials.clone(),
                noticesync: NoticeSyncFlags::SEND | NoticeSyncFlags::SEND_REPLY,
            })
        });
    if let Err(err) = seeded {
        eprintln!("Failed seeding smoke records: {err}");
        std::process::exit(1);
    }

    let remote_config = RemoteApiConfig::new(cfg.api_base.clone(), cfg.shortener_endpoint.clone());
    let shortener = Arc::new(HttpUrlShortener::new(&remote_config));
    let selector = Arc::new(RemotePosterSelector::new(remote_config));

    let lifecycle = Arc::new(LinkLifecycle::new(
        links.clone(),
        remote_users,
        users.clone(),
        Arc::new(LogMailer),
        bridge_config.clone(),
    ));
    let coordinator = BroadcastCoordinator::new(
        links,
        users,
        selector,
        shortener,
        lifecycle,
        bridge_config,
    );

    let Some(content) = cfg.live_post else {
        println!("Bridge components initialized against {}.", cfg.api_base);
        println!("Set BRIDGE_LIVE_POST to some content to post a live smoke status.");
        return;
    };

    let notice = Notice {
        id: 1,
        profile_id: SMOKE_USER_ID,
        content,
        uri: "https://local.example/notice/1".to_owned(),
        created_ms: now_ms(),
    };

    match coordinator.broadcast(&notice).await {
        Ok(outcome) => println!("Broadcast outcome: {outcome:?}"),
        Err(err) => {
            eprintln!("Broadcast hard-failed: {err}");
            std::process::exit(1);
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}
