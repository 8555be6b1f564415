//! Notification mail composition for removed bridge links.

use bridge_core::LocalUser;

use crate::config::BridgeConfig;

/// Compose the subject and body telling a user their bridge link was removed
/// because access to the remote service was apparently revoked.
pub fn compose_removal_mail(user: &LocalUser, config: &BridgeConfig) -> (String, String) {
    let subject = format!(
        "Your {} bridge has been disabled",
        config.remote_service_name
    );

    let body = format!(
        "Hi, {nickname}. We're sorry to inform you that your link to \
{remote} has been disabled. We no longer seem to have permission to update \
your {remote} status. (Did you revoke {site}'s access?)\n\n\
You can re-enable your {remote} bridge by visiting your settings page:\n\n\
\t{settings}\n\n\
Regards,\n{site}\n",
        nickname = user.nickname,
        remote = config.remote_service_name,
        site = config.site_name,
        settings = config.settings_url,
    );

    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BridgeConfig {
        BridgeConfig::new(
            1,
            "Chirper",
            "https://remote.example",
            "Local Microblog",
            "https://local.example/settings/bridge",
        )
        .expect("config should build")
    }

    #[test]
    fn mentions_service_settings_page_and_sender() {
        let user = LocalUser {
            id: 7,
            nickname: "alice".to_owned(),
            email: Some("alice@local.example".to_owned()),
        };

        let (subject, body) = compose_removal_mail(&user, &config());

        assert_eq!(subject, "Your Chirper bridge has been disabled");
        assert!(body.starts_with("Hi, alice."));
        assert!(body.contains("https://local.example/settings/bridge"));
        assert!(body.contains("Did you revoke Local Microblog's access?"));
        assert!(body.trim_end().ends_with("Regards,\nLocal Microblog"));
    }
}
