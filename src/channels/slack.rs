//! Slack Web API client.
//!
//! Uses `conversations.replies` to read threads and `chat.postMessage` to
//! post. Slack answers HTTP 200 with `{"ok": false, "error": "..."}` on most
//! failures, so both the status and the `ok` flag are checked.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::channels::{MessagingClient, Placement, ThreadMessage};
use crate::config::SlackConfig;
use crate::error::ChannelError;

const CHANNEL_NAME: &str = "slack";

/// Slack client bound to one channel.
pub struct SlackClient {
    client: Client,
    config: SlackConfig,
}

#[derive(Debug, Deserialize)]
struct RepliesResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    messages: Vec<ThreadMessage>,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}

impl SlackClient {
    pub fn new(config: SlackConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    pub fn channel_id(&self) -> &str {
        &self.config.channel_id
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/{}", self.config.api_base, method)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.bot_token.expose_secret())
    }
}

#[async_trait]
impl MessagingClient for SlackClient {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    async fn fetch_thread_messages(
        &self,
        thread_ts: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ThreadMessage>, ChannelError> {
        let mut query: Vec<(&str, String)> = vec![
            ("channel", self.config.channel_id.clone()),
            ("ts", thread_ts.to_string()),
        ];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        tracing::debug!(thread = %thread_ts, ?limit, "Fetching Slack thread");

        let response = self
            .client
            .get(self.api_url("conversations.replies"))
            .header("Authorization", self.bearer())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ChannelError::RateLimited {
                name: CHANNEL_NAME.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ChannelError::FetchFailed {
                thread_ts: thread_ts.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        let body: RepliesResponse = response.json().await?;
        if !body.ok {
            return Err(ChannelError::Api(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(body.messages)
    }

    async fn post_message(
        &self,
        text: &str,
        placement: &Placement,
    ) -> Result<String, ChannelError> {
        let mut payload = serde_json::json!({
            "channel": self.config.channel_id,
            "text": text,
        });
        if let Some(thread_ts) = &placement.thread_ts {
            payload["thread_ts"] = serde_json::Value::String(thread_ts.clone());
        }

        let response = self
            .client
            .post(self.api_url("chat.postMessage"))
            .header("Authorization", self.bearer())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ChannelError::RateLimited {
                name: CHANNEL_NAME.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ChannelError::SendFailed {
                name: CHANNEL_NAME.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        let body: PostMessageResponse = response.json().await?;
        match (body.ok, body.ts) {
            (true, Some(ts)) => Ok(ts),
            (true, None) => Err(ChannelError::InvalidMessage(
                "chat.postMessage returned no ts".to_string(),
            )),
            (false, _) => Err(ChannelError::SendFailed {
                name: CHANNEL_NAME.to_string(),
                reason: body.error.unwrap_or_else(|| "unknown error".to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replies_response_parses_error_shape() {
        let body: RepliesResponse =
            serde_json::from_str(r#"{"ok": false, "error": "thread_not_found"}"#).unwrap();
        assert!(!body.ok);
        assert_eq!(body.error.as_deref(), Some("thread_not_found"));
        assert!(body.messages.is_empty());
    }

    #[test]
    fn test_replies_response_parses_messages() {
        let body: RepliesResponse = serde_json::from_str(
            r#"{"ok": true, "messages": [
                {"ts": "100.1", "text": "root", "user": "U1"},
                {"ts": "100.2", "text": "reply", "bot_id": "B1", "type": "message"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[1].bot_id.as_deref(), Some("B1"));
    }

    #[test]
    fn test_api_url_joins_method() {
        let client = SlackClient::new(SlackConfig {
            bot_token: secrecy::SecretString::from("xoxb-test".to_string()),
            channel_id: "C1".to_string(),
            api_base: "https://slack.example".to_string(),
        });
        assert_eq!(
            client.api_url("chat.postMessage"),
            "https://slack.example/chat.postMessage"
        );
        assert_eq!(client.channel_id(), "C1");
    }
}
