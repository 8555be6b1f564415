//! Environment-backed runtime configuration for `bridge-smoke`.

use std::{env, error::Error, fmt};

const DEFAULT_API_BASE: &str = "https://api.remote.example";
const DEFAULT_SHORTENER_ENDPOINT: &str = "https://sho.rt/api";
const DEFAULT_SERVICE_ID: u32 = 1;
const DEFAULT_SERVICE_NAME: &str = "Chirper";
const DEFAULT_PROFILE_BASE: &str = "https://remote.example";
const DEFAULT_SITE_NAME: &str = "Local Microblog";
const DEFAULT_SETTINGS_URL: &str = "https://local.example/settings/bridge";
const DEFAULT_CREDENTIALS: &str = "smoke:smoke";

/// Runtime configuration used by the smoke binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeConfig {
    /// Remote API base URL.
    pub api_base: String,
    /// URL-shortener endpoint.
    pub shortener_endpoint: String,
    /// Remote service ID used as a key component.
    pub remote_service_id: u32,
    /// Remote service display name.
    pub remote_service_name: String,
    /// Base URI for remote profile pages.
    pub remote_profile_base: String,
    /// Local site name used in notification mail.
    pub site_name: String,
    /// Bridge settings page URL used in notification mail.
    pub settings_url: String,
    /// Credential blob for the seeded smoke link.
    pub credentials: String,
    /// Content to post live, when set.
    pub live_post: Option<String>,
}

impl SmokeConfig {
    /// Parse configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        Ok(Self {
            api_base: trimmed_or(&mut lookup, "BRIDGE_REMOTE_API_BASE", DEFAULT_API_BASE),
            shortener_endpoint: trimmed_or(
                &mut lookup,
                "BRIDGE_SHORTENER_ENDPOINT",
                DEFAULT_SHORTENER_ENDPOINT,
            ),
            remote_service_id: parse_u32_or(
                &mut lookup,
                "BRIDGE_REMOTE_SERVICE_ID",
                DEFAULT_SERVICE_ID,
            )?,
            remote_service_name: trimmed_or(
                &mut lookup,
                "BRIDGE_REMOTE_SERVICE_NAME",
                DEFAULT_SERVICE_NAME,
            ),
            remote_profile_base: trimmed_or(
                &mut lookup,
                "BRIDGE_REMOTE_PROFILE_BASE",
                DEFAULT_PROFILE_BASE,
            ),
            site_name: trimmed_or(&mut lookup, "BRIDGE_SITE_NAME", DEFAULT_SITE_NAME),
            settings_url: trimmed_or(&mut lookup, "BRIDGE_SETTINGS_URL", DEFAULT_SETTINGS_URL),
            credentials: trimmed_or(&mut lookup, "BRIDGE_CREDENTIALS", DEFAULT_CREDENTIALS),
            live_post: optional_trimmed(&mut lookup, "BRIDGE_LIVE_POST"),
        })
    }
}

/// Errors produced while parsing runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid {key}='{value}': {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

fn optional_trimmed<F>(lookup: &mut F, key: &'static str) -> Option<String>
where
    F: FnMut(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn trimmed_or<F>(lookup: &mut F, key: &'static str, default: &str) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    optional_trimmed(lookup, key).unwrap_or_else(|| default.to_owned())
}

fn parse_u32_or<F>(lookup: &mut F, key: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: FnMut(&str) -> Option<String>,
{
    let Some(value) = optional_trimmed(lookup, key) else {
        return Ok(default);
    };
    value
        .parse::<u32>()
        .map_err(|err| ConfigError::InvalidValue {
            key,
            value,
            reason: err.to_string(),
        })
}
