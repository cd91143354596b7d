//! Thread summaries via the language model.

use std::sync::Arc;

use crate::channels::MessagingClient;
use crate::coordination::fallback::Degradable;
use crate::error::Error;
use crate::llm::LlmProvider;

/// Instruction given to the model for every summary.
pub const SUMMARY_SYSTEM_PROMPT: &str = "Summarize this Slack thread in 3 bullet points focused on decisions, outcomes, or unresolved issues.";

/// Fetches a whole thread and asks the model for a short summary.
pub struct ThreadSummarizer {
    client: Arc<dyn MessagingClient>,
    llm: Arc<dyn LlmProvider>,
}

impl ThreadSummarizer {
    pub fn new(client: Arc<dyn MessagingClient>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { client, llm }
    }

    /// Summary of `thread_ts`, or a `None` fallback on any failure.
    pub async fn summarize(&self, thread_ts: &str) -> Degradable<Option<String>> {
        match self.try_summarize(thread_ts).await {
            Ok(summary) => Degradable::live(Some(summary)),
            Err(e) => {
                tracing::warn!(thread = %thread_ts, "Failed to summarize thread: {}", e);
                Degradable::fallback(None, e.to_string())
            }
        }
    }

    async fn try_summarize(&self, thread_ts: &str) -> Result<String, Error> {
        let messages = self.client.fetch_thread_messages(thread_ts, None).await?;
        let thread_text = messages
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        tracing::debug!(
            thread = %thread_ts,
            messages = messages.len(),
            model = %self.llm.model_name(),
            "Summarizing thread"
        );

        let summary = self
            .llm
            .complete_text(SUMMARY_SYSTEM_PROMPT, &thread_text)
            .await?;
        Ok(summary.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ThreadMessage;
    use crate::testing::{StubLlm, StubMessaging};

    fn message(ts: &str, text: &str) -> ThreadMessage {
        ThreadMessage {
            ts: ts.to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_summary_is_trimmed_and_prompt_fixed() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_thread(
            "1.0",
            vec![message("1.0", "ship friday?"), message("1.1", "yes, after QA")],
        );
        let llm = Arc::new(StubLlm::new("  - ship friday\n- QA first  "));
        let summarizer = ThreadSummarizer::new(stub, llm.clone());

        let summary = summarizer.summarize("1.0").await;
        assert_eq!(
            summary,
            Degradable::live(Some("- ship friday\n- QA first".to_string()))
        );
        assert_eq!(llm.calls(), 1);

        let request = llm.last_request().expect("request captured");
        assert_eq!(request.messages[0].content, SUMMARY_SYSTEM_PROMPT);
        assert_eq!(request.messages[1].content, "ship friday?\nyes, after QA");
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_none() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_failing(true);
        let llm = Arc::new(StubLlm::default());
        let summarizer = ThreadSummarizer::new(stub, llm.clone());

        let summary = summarizer.summarize("1.0").await;
        assert!(summary.is_degraded());
        assert_eq!(summary.value(), &None);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_llm_failure_yields_none() {
        let stub = Arc::new(StubMessaging::new());
        stub.set_thread("1.0", vec![message("1.0", "hello")]);
        let summarizer = ThreadSummarizer::new(stub, Arc::new(StubLlm::failing("stub")));

        let summary = summarizer.summarize("1.0").await;
        assert!(summary.is_degraded());
        assert!(summary.reason().unwrap().contains("server error"));
    }
}
