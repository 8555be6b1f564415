//! Concrete remote-service collaborators over HTTP.
//!
//! Two thin status posters (token and password auth) satisfy the
//! [`StatusPoster`] contract; request mechanics stay minimal on purpose, the
//! interesting part is mapping remote responses into the bridge's outcome
//! and error model.

use async_trait::async_trait;
use bridge_core::{
    BridgeError, BridgeErrorCategory, PosterSelector, RemoteCredentials, RemoteStatus,
    StatusPoster, UrlShortener,
};
use serde::Deserialize;
use tracing::debug;

/// Connection settings for the remote service and the URL shortener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteApiConfig {
    /// Remote API base URL, without a trailing slash.
    pub api_base: String,
    /// URL-shortener endpoint, queried with the long URL.
    pub shortener_endpoint: String,
}

impl RemoteApiConfig {
    pub fn new(api_base: impl Into<String>, shortener_endpoint: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_owned(),
            shortener_endpoint: shortener_endpoint.into(),
        }
    }

    fn update_endpoint(&self) -> String {
        format!("{}/statuses/update.json", self.api_base)
    }
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    id: u64,
    text: String,
}

/// Token-strategy poster: authenticates with the link's access token.
pub struct TokenStatusPoster {
    client: reqwest::Client,
    endpoint: String,
    access_key: String,
}

#[async_trait]
impl StatusPoster for TokenStatusPoster {
    async fn post_status(&self, text: &str) -> Result<Option<RemoteStatus>, BridgeError> {
        debug!(endpoint = %self.endpoint, strategy = "token", "posting status update");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_key)
            .form(&[("status", text)])
            .send()
            .await
            .map_err(transport_error)?;

        decode_status_response(response).await
    }
}

/// Password-strategy poster: authenticates with HTTP basic auth.
pub struct PasswordStatusPoster {
    client: reqwest::Client,
    endpoint: String,
    username: String,
    password: String,
}

#[async_trait]
impl StatusPoster for PasswordStatusPoster {
    async fn post_status(&self, text: &str) -> Result<Option<RemoteStatus>, BridgeError> {
        debug!(endpoint = %self.endpoint, strategy = "password", "posting status update");
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .form(&[("status", text)])
            .send()
            .await
            .map_err(transport_error)?;

        decode_status_response(response).await
    }
}

/// Builds the poster matching a decoded credential variant.
pub struct RemotePosterSelector {
    client: reqwest::Client,
    config: RemoteApiConfig,
}

impl RemotePosterSelector {
    pub fn new(config: RemoteApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

impl PosterSelector for RemotePosterSelector {
    fn select(&self, credentials: &RemoteCredentials) -> Box<dyn StatusPoster> {
        let endpoint = self.config.update_endpoint();
        match credentials {
            RemoteCredentials::Token { key, .. } => Box::new(TokenStatusPoster {
                client: self.client.clone(),
                endpoint,
                access_key: key.clone(),
            }),
            RemoteCredentials::Password { username, password } => Box::new(PasswordStatusPoster {
                client: self.client.clone(),
                endpoint,
                username: username.clone(),
                password: password.clone(),
            }),
        }
    }
}

/// Shortener client: GET with the long URL, the short URL comes back as the
/// response body.
pub struct HttpUrlShortener {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpUrlShortener {
    pub fn new(config: &RemoteApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.shortener_endpoint.clone(),
        }
    }
}

#[async_trait]
impl UrlShortener for HttpUrlShortener {
    async fn shorten(&self, uri: &str) -> Result<String, BridgeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("longurl", uri)])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(BridgeError::new(
                BridgeErrorCategory::Network,
                "shortener_error",
                format!("shortener returned status {}", response.status()),
            ));
        }

        let short = response.text().await.map_err(transport_error)?;
        let short = short.trim();
        if short.is_empty() {
            return Err(BridgeError::new(
                BridgeErrorCategory::Network,
                "shortener_error",
                "shortener returned an empty body",
            ));
        }

        Ok(short.to_owned())
    }
}

async fn decode_status_response(
    response: reqwest::Response,
) -> Result<Option<RemoteStatus>, BridgeError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(BridgeError::remote_failure(status.as_u16(), message));
    }

    let body = response.text().await.map_err(transport_error)?;
    parse_status_body(&body)
}

/// Parse the remote echo of a posted status; an empty body is a distinct
/// "no data returned" success.
fn parse_status_body(body: &str) -> Result<Option<RemoteStatus>, BridgeError> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let payload = serde_json::from_str::<StatusPayload>(body).map_err(|err| {
        BridgeError::new(
            BridgeErrorCategory::Serialization,
            "remote_response_invalid",
            err.to_string(),
        )
    })?;

    Ok(Some(RemoteStatus {
        id: payload.id,
        text: payload.text,
    }))
}

fn transport_error(err: reqwest::Error) -> BridgeError {
    BridgeError::new(
        BridgeErrorCategory::Network,
        "remote_transport_error",
        err.to_string(),
    )
}
