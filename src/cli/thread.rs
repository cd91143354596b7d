//! `summarize` and `check-thread`: one-shot thread inspection.

use std::sync::Arc;

use serde::Serialize;

use crate::channels::{MessagingClient, SlackClient};
use crate::config::Config;
use crate::coordination::{Degradable, ThreadFreshness, ThreadSummarizer};
use crate::llm::create_llm_provider;

fn slack_client(config: &Config) -> anyhow::Result<Arc<dyn MessagingClient>> {
    let slack = config.require_slack()?;
    Ok(Arc::new(SlackClient::new(slack.clone())))
}

/// Run the summarize command.
pub async fn run_summarize_command(config: &Config, thread_ts: &str) -> anyhow::Result<()> {
    let client = slack_client(config)?;
    let llm = create_llm_provider(&config.llm)?;
    let summarizer = ThreadSummarizer::new(client, llm);

    match summarizer.summarize(thread_ts).await {
        Degradable::Live { value: Some(summary) } => println!("{summary}"),
        Degradable::Live { value: None } => println!("(no summary)"),
        Degradable::Fallback { reason, .. } => {
            anyhow::bail!("summary unavailable: {reason}");
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ThreadCheck {
    thread_ts: String,
    latest_ts: String,
    newer_message: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    degraded: Option<String>,
}

async fn check_thread(client: Arc<dyn MessagingClient>, thread_ts: &str) -> ThreadCheck {
    let latest = ThreadFreshness::new(client)
        .latest_message_timestamp(thread_ts)
        .await;
    let degraded = latest.reason().map(str::to_string);
    let latest_ts = latest.into_value();
    ThreadCheck {
        thread_ts: thread_ts.to_string(),
        newer_message: latest_ts != thread_ts,
        latest_ts,
        degraded,
    }
}

/// Run the check-thread command.
pub async fn run_check_thread_command(config: &Config, thread_ts: &str) -> anyhow::Result<()> {
    let check = check_thread(slack_client(config)?, thread_ts).await;
    println!("{}", serde_json::to_string_pretty(&check)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ThreadMessage;
    use crate::testing::StubMessaging;

    #[tokio::test]
    async fn test_check_thread_reports_newer_message() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_thread(
            "5.0",
            vec![
                ThreadMessage {
                    ts: "5.0".to_string(),
                    ..Default::default()
                },
                ThreadMessage {
                    ts: "6.0".to_string(),
                    ..Default::default()
                },
            ],
        );
        let check = check_thread(stub, "5.0").await;
        assert!(check.newer_message);
        assert_eq!(check.latest_ts, "6.0");
        assert!(check.degraded.is_none());
    }

    #[tokio::test]
    async fn test_check_thread_marks_degraded() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_failing(true);
        let check = check_thread(stub, "5.0").await;
        assert!(!check.newer_message);
        assert!(check.degraded.is_some());
    }

    #[test]
    fn test_commands_require_slack() {
        assert!(slack_client(&Config::default()).is_err());
    }
}
