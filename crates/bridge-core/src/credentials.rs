//! Credential blob decoding and strategy selection.
//!
//! The blob stored on a link is self-describing: a JSON token pair selects
//! the token strategy, a `username:password` pair selects the password
//! strategy. The variant is decided once when the link is read, never
//! re-sniffed at dispatch time.

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Decoded credential variant for a foreign link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RemoteCredentials {
    /// Access-token pair for the token-based strategy.
    Token {
        /// Token key.
        key: String,
        /// Token secret.
        secret: String,
    },
    /// Account credentials for the password-based strategy.
    Password {
        /// Remote account name.
        username: String,
        /// Remote account password.
        password: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct PackedToken {
    key: String,
    secret: String,
}

impl RemoteCredentials {
    /// Decode a stored credential blob into its strategy variant.
    ///
    /// A blob that fits neither shape is a hard error; no recovery policy is
    /// defined for unreadable credentials.
    pub fn decode(blob: &str) -> Result<Self, BridgeError> {
        let blob = blob.trim();
        if blob.is_empty() {
            return Err(BridgeError::credentials_unreadable("empty blob"));
        }

        if blob.starts_with('{') {
            let packed = serde_json::from_str::<PackedToken>(blob)
                .map_err(|err| BridgeError::credentials_unreadable(err.to_string()))?;
            return Ok(Self::Token {
                key: packed.key,
                secret: packed.secret,
            });
        }

        match blob.split_once(':') {
            Some((username, password)) if !username.is_empty() => Ok(Self::Password {
                username: username.to_owned(),
                password: password.to_owned(),
            }),
            _ => Err(BridgeError::credentials_unreadable(
                "neither packed token nor username:password",
            )),
        }
    }

    /// Encode back into the stored blob format.
    pub fn encode(&self) -> String {
        match self {
            Self::Token { key, secret } => {
                let packed = PackedToken {
                    key: key.clone(),
                    secret: secret.clone(),
                };
                // Serializing two plain strings cannot fail.
                serde_json::to_string(&packed).unwrap_or_default()
            }
            Self::Password { username, password } => format!("{username}:{password}"),
        }
    }

    /// Short strategy label for logging.
    pub fn strategy_name(&self) -> &'static str {
        match self {
            Self::Token { .. } => "token",
            Self::Password { .. } => "password",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_packed_token_blob() {
        let creds = RemoteCredentials::decode(r#"{"key":"abc","secret":"xyz"}"#)
            .expect("token blob should decode");
        assert_eq!(
            creds,
            RemoteCredentials::Token {
                key: "abc".into(),
                secret: "xyz".into(),
            }
        );
        assert_eq!(creds.strategy_name(), "token");
    }

    #[test]
    fn decodes_password_blob() {
        let creds =
            RemoteCredentials::decode("alice:hunter:2").expect("password blob should decode");
        assert_eq!(
            creds,
            RemoteCredentials::Password {
                username: "alice".into(),
                password: "hunter:2".into(),
            }
        );
        assert_eq!(creds.strategy_name(), "password");
    }

    #[test]
    fn rejects_unreadable_blobs() {
        let empty = RemoteCredentials::decode("   ").expect_err("empty blob must fail");
        assert_eq!(empty.code, "credentials_unreadable");

        let bad_json =
            RemoteCredentials::decode(r#"{"key":"abc"}"#).expect_err("partial token must fail");
        assert_eq!(bad_json.code, "credentials_unreadable");

        let no_separator =
            RemoteCredentials::decode("just-a-string").expect_err("bare string must fail");
        assert_eq!(no_separator.code, "credentials_unreadable");
    }

    #[test]
    fn encode_decode_round_trip() {
        let token = RemoteCredentials::Token {
            key: "abc".into(),
            secret: "xyz".into(),
        };
        assert_eq!(
            RemoteCredentials::decode(&token.encode()).expect("token re-decode"),
            token
        );

        let password = RemoteCredentials::Password {
            username: "alice".into(),
            password: "s3cr3t".into(),
        };
        assert_eq!(
            RemoteCredentials::decode(&password.encode()).expect("password re-decode"),
            password
        );
    }
}
