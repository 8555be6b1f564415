use bridge_core::{BridgeError, BridgeErrorCategory};

/// Bridge configuration, constructed once and passed into the coordinator
/// and lifecycle at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Remote service ID used as a key component throughout.
    pub remote_service_id: u32,
    /// Display name of the remote service, used in notification mail.
    pub remote_service_name: String,
    /// Base URI for remote profile pages, without a trailing slash.
    pub remote_profile_base: String,
    /// Local site name, used as the sender identity in notification mail.
    pub site_name: String,
    /// URL of the local bridge settings page, included in notification mail.
    pub settings_url: String,
}

impl BridgeConfig {
    pub fn new(
        remote_service_id: u32,
        remote_service_name: impl Into<String>,
        remote_profile_base: impl Into<String>,
        site_name: impl Into<String>,
        settings_url: impl Into<String>,
    ) -> Result<Self, BridgeError> {
        let remote_profile_base = remote_profile_base.into();
        let remote_profile_base = remote_profile_base.trim_end_matches('/').to_owned();
        if remote_profile_base.is_empty() {
            return Err(BridgeError::new(
                BridgeErrorCategory::Config,
                "invalid_profile_base",
                "remote profile base URI must not be empty",
            ));
        }

        Ok(Self {
            remote_service_id,
            remote_service_name: remote_service_name.into(),
            remote_profile_base,
            site_name: site_name.into(),
            settings_url: settings_url.into(),
        })
    }

    /// Canonical profile URI for a remote screen name.
    pub fn profile_uri(&self, screen_name: &str) -> String {
        format!("{}/{screen_name}", self.remote_profile_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_profile_uris_without_double_slashes() {
        let config = BridgeConfig::new(
            1,
            "Chirper",
            "https://remote.example/",
            "Local Microblog",
            "https://local.example/settings/bridge",
        )
        .expect("config should build");

        assert_eq!(config.profile_uri("alice"), "https://remote.example/alice");
    }

    #[test]
    fn rejects_empty_profile_base() {
        let err = BridgeConfig::new(1, "Chirper", "/", "Local", "https://local.example/settings")
            .expect_err("empty base must fail");
        assert_eq!(err.code, "invalid_profile_base");
    }
}
