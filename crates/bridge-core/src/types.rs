use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// One locally-posted message to be mirrored outward.
///
/// Notices are owned by the host posting pipeline and never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    /// Unique notice ID.
    pub id: u64,
    /// Profile ID of the local author.
    pub profile_id: u64,
    /// Textual content as posted.
    pub content: String,
    /// Canonical permalink URI for the notice.
    pub uri: String,
    /// Creation timestamp in milliseconds since Unix epoch.
    pub created_ms: u64,
}

/// Local account record resolved through the user directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalUser {
    /// Local user ID.
    pub id: u64,
    /// Local nickname, used in logs and notification mail.
    pub nickname: String,
    /// Registered contact address, when the user has one.
    pub email: Option<String>,
}

/// Sync-direction flag bitmask stored on a [`ForeignLink`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NoticeSyncFlags(u8);

impl NoticeSyncFlags {
    /// Forward locally-posted notices to the remote service.
    pub const SEND: Self = Self(1);
    /// Also forward notices that look like remote-style replies.
    pub const SEND_REPLY: Self = Self(1 << 1);
    /// Mirror remote statuses back into the local timeline.
    pub const RECEIVE: Self = Self(1 << 2);

    /// Empty flag set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit value as persisted.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Reconstruct from a persisted bit value.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Whether all flags in `other` are set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for NoticeSyncFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A user's configured bridge to one remote service.
///
/// At most one link exists per `(user_id, service)` pair; the store enforces
/// this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForeignLink {
    /// Local user ID owning the link.
    pub user_id: u64,
    /// Remote service ID the link bridges to.
    pub service: u32,
    /// Opaque credential blob; shape decides the auth strategy.
    pub credentials: String,
    /// Sync-direction flags.
    pub noticesync: NoticeSyncFlags,
}

/// Cached remote-identity record.
///
/// At most one row exists per `(remote_id, service)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForeignUser {
    /// Remote-service account ID.
    pub remote_id: u64,
    /// Remote service ID.
    pub service: u32,
    /// Screen name as last observed.
    pub nickname: String,
    /// Canonical profile URI derived from the screen name.
    pub uri: String,
    /// Record creation timestamp in milliseconds since Unix epoch.
    pub created_ms: u64,
}

/// The remote service's echo of a successfully posted status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteStatus {
    /// Remote status ID.
    pub id: u64,
    /// Status text as stored remotely.
    pub text: String,
}

/// Return contract of a broadcast attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// Delivered, or correctly skipped per link policy.
    Delivered,
    /// Transient failure; the caller should retry later.
    Requeue,
    /// Permanently given up; the notice is not retried.
    Dropped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_contains_requires_all_bits() {
        let flags = NoticeSyncFlags::SEND | NoticeSyncFlags::SEND_REPLY;
        assert!(flags.contains(NoticeSyncFlags::SEND));
        assert!(flags.contains(NoticeSyncFlags::SEND | NoticeSyncFlags::SEND_REPLY));
        assert!(!flags.contains(NoticeSyncFlags::RECEIVE));
        assert!(!NoticeSyncFlags::SEND.contains(NoticeSyncFlags::SEND_REPLY));
    }

    #[test]
    fn flag_bits_round_trip() {
        let flags = NoticeSyncFlags::SEND | NoticeSyncFlags::RECEIVE;
        assert_eq!(NoticeSyncFlags::from_bits(flags.bits()), flags);
        assert_eq!(NoticeSyncFlags::empty().bits(), 0);
    }
}
