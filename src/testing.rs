//! Test doubles for the coordination core.
//!
//! Provides:
//! - [`ManualClock`]: a clock that only moves when told to
//! - [`StubLlm`]: a configurable LLM provider that returns a fixed response
//! - [`StubMessaging`]: an in-memory messaging platform
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use crosstalk::coordination::ConversationState;
//! use crosstalk::testing::ManualClock;
//!
//! let clock = Arc::new(ManualClock::new(1_000.0));
//! let state = ConversationState::with_clock(Duration::from_secs(30), 3, clock.clone());
//! state.record_reply("isla", Some("T1"));
//! clock.advance(31.0);
//! assert!(!state.cooldown_active("isla"));
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::channels::{MessagingClient, Placement, ThreadMessage};
use crate::coordination::Clock;
use crate::error::{ChannelError, LlmError};
use crate::llm::{CompletionRequest, CompletionResponse, FinishReason, LlmProvider};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// A clock whose time is set explicitly.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new(now: f64) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn now(&self) -> f64 {
        *lock(&self.now)
    }

    pub fn set(&self, now: f64) {
        *lock(&self.now) = now;
    }

    pub fn advance(&self, secs: f64) {
        *lock(&self.now) += secs;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        ManualClock::now(self)
    }
}

/// A configurable LLM provider stub for tests.
///
/// Supports:
/// - Fixed response content
/// - Call counting via [`calls()`](Self::calls)
/// - Runtime failure toggling via [`set_failing()`](Self::set_failing)
/// - Capture of the last request via [`last_request()`](Self::last_request)
pub struct StubLlm {
    model_name: String,
    response: String,
    call_count: AtomicU32,
    should_fail: AtomicBool,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl StubLlm {
    /// Create a new stub that returns the given response.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            model_name: "stub-model".to_string(),
            response: response.into(),
            call_count: AtomicU32::new(0),
            should_fail: AtomicBool::new(false),
            last_request: Mutex::new(None),
        }
    }

    /// Create a stub that always fails with a transient error.
    pub fn failing(name: impl Into<String>) -> Self {
        let stub = Self::new(String::new()).with_model_name(name);
        stub.set_failing(true);
        stub
    }

    /// Set the model name.
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    /// Number of times `complete` was called.
    pub fn calls(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Toggle whether calls should fail at runtime.
    pub fn set_failing(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        lock(&self.last_request).clone()
    }
}

impl Default for StubLlm {
    fn default() -> Self {
        Self::new("OK")
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *lock(&self.last_request) = Some(request);
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(LlmError::RequestFailed {
                provider: self.model_name.clone(),
                reason: "server error".to_string(),
            });
        }
        Ok(CompletionResponse {
            content: self.response.clone(),
            finish_reason: FinishReason::Stop,
            input_tokens: 10,
            output_tokens: 5,
        })
    }
}

/// In-memory messaging platform.
///
/// Threads are seeded with [`set_thread()`](Self::set_thread); posted
/// messages are appended to their thread (or to the channel log) and kept
/// for inspection.
#[derive(Default)]
pub struct StubMessaging {
    threads: Mutex<HashMap<String, Vec<ThreadMessage>>>,
    posted: Mutex<Vec<(String, Placement)>>,
    last_fetch_limit: Mutex<Option<u32>>,
    should_fail: AtomicBool,
    next_ts: AtomicU32,
}

impl StubMessaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_thread(&self, thread_ts: &str, messages: Vec<ThreadMessage>) {
        lock(&self.threads).insert(thread_ts.to_string(), messages);
    }

    /// Toggle whether every call should fail.
    pub fn set_failing(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    /// Messages posted so far, in order.
    pub fn posted(&self) -> Vec<(String, Placement)> {
        lock(&self.posted).clone()
    }

    pub fn last_fetch_limit(&self) -> Option<u32> {
        *lock(&self.last_fetch_limit)
    }

    fn fail_if_requested(&self) -> Result<(), ChannelError> {
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(ChannelError::Api("stub failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MessagingClient for StubMessaging {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch_thread_messages(
        &self,
        thread_ts: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ThreadMessage>, ChannelError> {
        *lock(&self.last_fetch_limit) = limit;
        self.fail_if_requested()?;
        let threads = lock(&self.threads);
        let messages = threads.get(thread_ts).cloned().unwrap_or_default();
        Ok(match limit {
            Some(limit) => messages.into_iter().take(limit as usize).collect(),
            None => messages,
        })
    }

    async fn post_message(
        &self,
        text: &str,
        placement: &Placement,
    ) -> Result<String, ChannelError> {
        self.fail_if_requested()?;
        let ts = format!("9000.{:06}", self.next_ts.fetch_add(1, Ordering::Relaxed) + 1);
        if let Some(thread_ts) = &placement.thread_ts {
            lock(&self.threads)
                .entry(thread_ts.clone())
                .or_default()
                .push(ThreadMessage {
                    ts: ts.clone(),
                    text: text.to_string(),
                    ..Default::default()
                });
        }
        lock(&self.posted).push((text.to_string(), placement.clone()));
        Ok(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_moves_only_when_told() {
        let clock = ManualClock::new(10.0);
        clock.advance(2.5);
        assert_eq!(Clock::now(&clock), 12.5);
        clock.set(1.0);
        assert_eq!(clock.now(), 1.0);
    }

    #[tokio::test]
    async fn test_stub_llm_complete() {
        let llm = StubLlm::new("hello world");
        let response = llm
            .complete(CompletionRequest::new(vec![]))
            .await
            .expect("complete");
        assert_eq!(response.content, "hello world");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_stub_messaging_posts_into_threads() {
        let stub = StubMessaging::new();
        let ts = stub
            .post_message("on it", &Placement::thread("1.0"))
            .await
            .expect("post");
        let thread = stub.fetch_thread_messages("1.0", None).await.expect("fetch");
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].ts, ts);
        assert_eq!(stub.posted().len(), 1);
    }
}
