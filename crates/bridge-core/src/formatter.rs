//! Status text formatting for the remote service.

use async_trait::async_trait;

use crate::{error::BridgeError, types::Notice};

/// Hard status length limit imposed by the remote service.
pub const REMOTE_STATUS_CHAR_LIMIT: usize = 140;

/// Collaborator that shortens a permalink for over-limit statuses.
#[async_trait]
pub trait UrlShortener: Send + Sync {
    /// Shorten a canonical notice URI.
    async fn shorten(&self, uri: &str) -> Result<String, BridgeError>;
}

/// Produce the remote status text for a notice.
///
/// A leading `@` is escaped with a prepended space so the remote service does
/// not treat the status as one of its own replies, local `!group` references
/// become `#group` hashtags, and over-limit statuses are truncated with a
/// shortened permalink appended. The shortener is only consulted in the
/// over-limit case.
pub async fn format_status(
    notice: &Notice,
    shortener: &dyn UrlShortener,
) -> Result<String, BridgeError> {
    let mut status = if notice.content.starts_with('@') {
        format!(" {}", notice.content)
    } else {
        notice.content.clone()
    };

    status = rewrite_group_refs(&status);

    if status.chars().count() > REMOTE_STATUS_CHAR_LIMIT {
        let short_url = shortener.shorten(&notice.uri).await?;
        let url_len = short_url.chars().count();
        let keep = REMOTE_STATUS_CHAR_LIMIT.saturating_sub(url_len + 3);
        let mut truncated: String = status.chars().take(keep).collect();
        truncated.push_str(" … ");
        truncated.push_str(&short_url);
        status = truncated;
    }

    Ok(status)
}

/// Rewrite `!group` references to `#group` hashtags.
///
/// A `!` qualifies when it sits at the start of the string or after
/// whitespace and is immediately followed by an alphanumeric character.
fn rewrite_group_refs(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut prev: Option<char> = None;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        let at_group_start = c == '!'
            && prev.is_none_or(char::is_whitespace)
            && chars.peek().is_some_and(|next| next.is_ascii_alphanumeric());

        out.push(if at_group_start { '#' } else { c });
        prev = Some(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn notice(content: &str) -> Notice {
        Notice {
            id: 42,
            profile_id: 7,
            content: content.to_owned(),
            uri: "https://local.example/notice/42".to_owned(),
            created_ms: 1_731_000_000_000,
        }
    }

    struct FixedShortener(&'static str);

    #[async_trait]
    impl UrlShortener for FixedShortener {
        async fn shorten(&self, _uri: &str) -> Result<String, BridgeError> {
            Ok(self.0.to_owned())
        }
    }

    #[derive(Default)]
    struct CountingShortener {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl UrlShortener for CountingShortener {
        async fn shorten(&self, _uri: &str) -> Result<String, BridgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("https://sho.rt/x".to_owned())
        }
    }

    #[tokio::test]
    async fn escapes_leading_reply_marker() {
        let formatted = format_status(&notice("@bob hi"), &FixedShortener("unused"))
            .await
            .expect("format should work");
        assert!(formatted.starts_with(" @bob hi"));
        assert_eq!(formatted, " @bob hi");
    }

    #[tokio::test]
    async fn rewrites_group_refs_to_hashtags() {
        let shortener = FixedShortener("unused");

        let leading = format_status(&notice("!group update"), &shortener)
            .await
            .expect("format should work");
        assert_eq!(leading, "#group update");

        let inner = format_status(&notice("text !group2 more"), &shortener)
            .await
            .expect("format should work");
        assert_eq!(inner, "text #group2 more");

        let embedded = format_status(&notice("a!b"), &shortener)
            .await
            .expect("format should work");
        assert_eq!(embedded, "a!b");
    }

    #[test]
    fn group_rewrite_needs_a_following_alphanumeric() {
        assert_eq!(rewrite_group_refs("wow ! nice"), "wow ! nice");
        assert_eq!(rewrite_group_refs("!"), "!");
        assert_eq!(rewrite_group_refs("!a !b"), "#a #b");
    }

    #[tokio::test]
    async fn truncates_over_limit_status_to_exactly_the_limit() {
        let content = "x".repeat(200);
        let short_url = "https://sho.rt/abc123";
        let formatted = format_status(&notice(&content), &FixedShortener(short_url))
            .await
            .expect("format should work");

        assert_eq!(formatted.chars().count(), REMOTE_STATUS_CHAR_LIMIT);
        assert!(formatted.ends_with(&format!(" … {short_url}")));
    }

    #[tokio::test]
    async fn leaves_under_limit_status_alone_without_shortening() {
        let shortener = CountingShortener::default();
        let formatted = format_status(&notice("short and sweet"), &shortener)
            .await
            .expect("format should work");

        assert_eq!(formatted, "short and sweet");
        assert_eq!(shortener.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn counts_characters_not_bytes_when_truncating() {
        let content = "ü".repeat(200);
        let short_url = "https://sho.rt/abc123";
        let formatted = format_status(&notice(&content), &FixedShortener(short_url))
            .await
            .expect("format should work");

        assert_eq!(formatted.chars().count(), REMOTE_STATUS_CHAR_LIMIT);
    }
}
