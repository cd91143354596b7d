//! Detect whether a thread moved on while a reply was being prepared.

use std::sync::Arc;

use crate::channels::MessagingClient;
use crate::coordination::clock::parse_ts;
use crate::coordination::fallback::Degradable;

/// Messages fetched when looking for the newest reply.
pub const FRESHNESS_FETCH_LIMIT: u32 = 5;

/// Compares a thread's newest message against a known timestamp.
pub struct ThreadFreshness {
    client: Arc<dyn MessagingClient>,
}

impl ThreadFreshness {
    pub fn new(client: Arc<dyn MessagingClient>) -> Self {
        Self { client }
    }

    /// Timestamp of the newest message in `thread_ts`.
    ///
    /// An empty thread yields `thread_ts` itself. On any failure the result
    /// is a fallback carrying `thread_ts`, meaning "no newer message known".
    pub async fn latest_message_timestamp(&self, thread_ts: &str) -> Degradable<String> {
        match self
            .client
            .fetch_thread_messages(thread_ts, Some(FRESHNESS_FETCH_LIMIT))
            .await
        {
            Ok(messages) => Degradable::live(
                messages
                    .last()
                    .map(|m| m.ts.clone())
                    .unwrap_or_else(|| thread_ts.to_string()),
            ),
            Err(e) => {
                tracing::warn!(
                    thread = %thread_ts,
                    channel = %self.client.name(),
                    "Could not fetch latest thread message: {}",
                    e
                );
                Degradable::fallback(thread_ts.to_string(), e.to_string())
            }
        }
    }

    /// Whether the thread has a message newer than `thread_ts`.
    pub async fn should_cancel_due_to_new_message(&self, thread_ts: &str) -> bool {
        self.latest_message_timestamp(thread_ts).await.value() != thread_ts
    }

    /// Whether `thread_ts` has a message newer than `seen_ts`, the message
    /// being answered. A failed fetch never reports a newer message.
    pub async fn has_message_after(&self, thread_ts: &str, seen_ts: &str) -> bool {
        let latest = self.latest_message_timestamp(thread_ts).await;
        if latest.is_degraded() {
            return false;
        }
        let latest = latest.value();
        match (parse_ts(latest), parse_ts(seen_ts)) {
            (Some(latest), Some(seen)) => latest > seen,
            _ => latest != seen_ts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ThreadMessage;
    use crate::testing::StubMessaging;

    fn message(ts: &str) -> ThreadMessage {
        ThreadMessage {
            ts: ts.to_string(),
            text: "hi".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_newer_message_cancels() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_thread("100.1", vec![message("100.1"), message("100.9")]);
        let freshness = ThreadFreshness::new(stub.clone());

        let latest = freshness.latest_message_timestamp("100.1").await;
        assert_eq!(latest, Degradable::live("100.9".to_string()));
        assert!(freshness.should_cancel_due_to_new_message("100.1").await);
        assert_eq!(stub.last_fetch_limit(), Some(FRESHNESS_FETCH_LIMIT));
    }

    #[tokio::test]
    async fn test_root_only_thread_does_not_cancel() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_thread("100.1", vec![message("100.1")]);
        let freshness = ThreadFreshness::new(stub);
        assert!(!freshness.should_cancel_due_to_new_message("100.1").await);
    }

    #[tokio::test]
    async fn test_reply_being_answered_is_not_newer() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_thread("100.1", vec![message("100.1"), message("100.5")]);
        let freshness = ThreadFreshness::new(stub.clone());

        assert!(!freshness.has_message_after("100.1", "100.5").await);
        assert!(freshness.has_message_after("100.1", "100.1").await);

        stub.set_thread(
            "100.1",
            vec![message("100.1"), message("100.5"), message("100.7")],
        );
        assert!(freshness.has_message_after("100.1", "100.5").await);
    }

    #[tokio::test]
    async fn test_older_page_does_not_count_as_newer() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_thread("100.1", vec![message("100.1"), message("100.2")]);
        let freshness = ThreadFreshness::new(stub);
        assert!(!freshness.has_message_after("100.1", "100.9").await);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_never_newer() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_failing(true);
        let freshness = ThreadFreshness::new(stub);
        assert!(!freshness.has_message_after("100.1", "100.5").await);
    }

    #[tokio::test]
    async fn test_empty_thread_echoes_input() {
        let freshness = ThreadFreshness::new(Arc::new(StubMessaging::new()));
        let latest = freshness.latest_message_timestamp("100.1").await;
        assert_eq!(latest, Degradable::live("100.1".to_string()));
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_input() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_failing(true);
        let freshness = ThreadFreshness::new(stub);

        let latest = freshness.latest_message_timestamp("100.1").await;
        assert!(latest.is_degraded());
        assert_eq!(latest.value(), "100.1");
        assert!(!freshness.should_cancel_due_to_new_message("100.1").await);
    }
}
