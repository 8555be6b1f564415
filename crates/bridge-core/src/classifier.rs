//! Forwarding policy: which notices cross the bridge for a given link.

use crate::types::{ForeignLink, Notice, NoticeSyncFlags};

const MAX_REPLY_HANDLE_LEN: usize = 15;

/// Decide whether a notice should be forwarded over the given link.
///
/// False when the link is absent or `SEND` is unset. Notices that look like
/// remote-style replies additionally require `SEND_REPLY`.
pub fn should_broadcast(notice: &Notice, link: Option<&ForeignLink>) -> bool {
    let Some(link) = link else {
        return false;
    };

    if !link.noticesync.contains(NoticeSyncFlags::SEND) {
        return false;
    }

    !is_remote_reply(&notice.content) || link.noticesync.contains(NoticeSyncFlags::SEND_REPLY)
}

/// Whether content addresses a remote account in the remote service's own
/// reply convention: a leading `@` followed by 1-15 word characters ending at
/// a word boundary.
pub fn is_remote_reply(content: &str) -> bool {
    let Some(rest) = content.strip_prefix('@') else {
        return false;
    };

    let handle_len = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .count();

    (1..=MAX_REPLY_HANDLE_LEN).contains(&handle_len)
}
