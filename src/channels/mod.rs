//! Messaging platform boundary.
//!
//! The coordination core never talks HTTP itself. It consumes
//! [`IncomingEvent`]s, produces [`Placement`] directives, and reaches the
//! platform only through the [`MessagingClient`] trait.

mod slack;

pub use slack::SlackClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

/// An inbound message event as delivered by the platform.
///
/// Every field except `ts` is optional on the wire; missing values default
/// to empty/absent so routing stays total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingEvent {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub ts: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
}

impl IncomingEvent {
    /// A plain user message with no thread association.
    pub fn new(text: impl Into<String>, ts: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ts: ts.into(),
            ..Default::default()
        }
    }

    pub fn in_thread(mut self, thread_ts: impl Into<String>) -> Self {
        self.thread_ts = Some(thread_ts.into());
        self
    }

    pub fn from_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn from_bot(mut self, bot_id: impl Into<String>) -> Self {
        self.bot_id = Some(bot_id.into());
        self
    }

    /// Thread association, treating an empty string as absent.
    pub fn thread(&self) -> Option<&str> {
        self.thread_ts.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether the event was posted by a bot.
    pub fn is_bot(&self) -> bool {
        self.bot_id.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// Where a reply should be posted.
///
/// `thread_ts` present means "reply in this thread"; absent means "reply at
/// channel level". Serializes to `{}` or `{"thread_ts": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

impl Placement {
    pub fn channel() -> Self {
        Self { thread_ts: None }
    }

    pub fn thread(thread_ts: impl Into<String>) -> Self {
        Self {
            thread_ts: Some(thread_ts.into()),
        }
    }
}

/// One message of a thread as returned by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub ts: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
}

/// Narrow interface to the messaging platform.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Fetch the messages of a thread in chronological order.
    ///
    /// `limit` caps how many messages the platform returns.
    async fn fetch_thread_messages(
        &self,
        thread_ts: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ThreadMessage>, ChannelError>;

    /// Post `text` at the given placement. Returns the new message's `ts`.
    async fn post_message(&self, text: &str, placement: &Placement)
    -> Result<String, ChannelError>;
}
