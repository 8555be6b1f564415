use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad error category used for outcome classification and retry behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BridgeErrorCategory {
    /// Invalid input, unreadable credentials, or other configuration issue.
    Config,
    /// Authentication/authorization failure reported by the remote service.
    Auth,
    /// Rate or quota limit reported by the remote service.
    RateLimited,
    /// Transient network or remote-service failure.
    Network,
    /// Local persistence failure.
    Storage,
    /// Serialization/deserialization failure.
    Serialization,
    /// Internal bug or invariant break.
    Internal,
}

/// Stable error payload carried across the broadcast pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("{category:?}:{code}: {message}")]
pub struct BridgeError {
    /// High-level error category.
    pub category: BridgeErrorCategory,
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Numeric status reported by the remote service, when there was one.
    pub remote_status: Option<u16>,
}

impl BridgeError {
    /// Construct a new bridge error.
    pub fn new(
        category: BridgeErrorCategory,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code: code.into(),
            message: message.into(),
            remote_status: None,
        }
    }

    /// Build an error for a failed remote status post, classified by the
    /// numeric status the remote service returned.
    pub fn remote_failure(status: u16, message: impl Into<String>) -> Self {
        let mut err = Self::new(
            classify_remote_status(status),
            "remote_api_error",
            message.into(),
        );
        err.remote_status = Some(status);
        err
    }

    /// Build a standard unreadable-credentials error.
    pub fn credentials_unreadable(detail: impl Into<String>) -> Self {
        Self::new(
            BridgeErrorCategory::Config,
            "credentials_unreadable",
            format!("stored credentials fit no known strategy: {}", detail.into()),
        )
    }
}

/// Map a remote-service status code to an error category.
///
/// Only authorization revocation and rate limiting are special-cased; every
/// other code is treated as transient remote flakiness so content is requeued
/// instead of silently dropped.
pub fn classify_remote_status(status: u16) -> BridgeErrorCategory {
    match status {
        401 => BridgeErrorCategory::Auth,
        403 => BridgeErrorCategory::RateLimited,
        _ => BridgeErrorCategory::Network,
    }
}
