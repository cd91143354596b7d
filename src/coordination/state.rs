//! Conversation state shared by the event path and the reviver.
//!
//! One mutex covers the whole store: every public operation takes it once
//! and releases it before returning, so each operation is atomic and none of
//! them waits on I/O.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::coordination::clock::{Clock, SystemClock};

/// Turn counts of one thread, keyed by responder.
pub type TurnCounts = HashMap<String, u32>;

#[derive(Debug, Default)]
struct StoreInner {
    last_reply: HashMap<String, f64>,
    turns: HashMap<String, TurnCounts>,
    last_responder: HashMap<String, String>,
    last_activity: f64,
}

/// Process-wide conversation state.
pub struct ConversationState {
    clock: Arc<dyn Clock>,
    cooldown_secs: f64,
    max_turns_per_thread: u32,
    inner: Mutex<StoreInner>,
}

impl ConversationState {
    /// Create an empty store on the system clock.
    pub fn new(cooldown: Duration, max_turns_per_thread: u32) -> Self {
        Self::with_clock(cooldown, max_turns_per_thread, Arc::new(SystemClock))
    }

    /// Create an empty store on a caller-supplied clock.
    pub fn with_clock(
        cooldown: Duration,
        max_turns_per_thread: u32,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            clock,
            cooldown_secs: cooldown.as_secs_f64(),
            max_turns_per_thread,
            inner: Mutex::new(StoreInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // Every critical section leaves the maps consistent, so a poisoned
        // lock still guards valid data.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn max_turns_per_thread(&self) -> u32 {
        self.max_turns_per_thread
    }

    /// Record that `responder` replied, optionally inside `thread_ts`.
    pub fn record_reply(&self, responder: &str, thread_ts: Option<&str>) {
        let now = self.clock.now();
        let mut inner = self.lock();
        inner.last_reply.insert(responder.to_string(), now);
        if let Some(thread_ts) = thread_ts {
            let count = inner
                .turns
                .entry(thread_ts.to_string())
                .or_default()
                .entry(responder.to_string())
                .or_insert(0);
            *count = count.saturating_add(1);
            inner
                .last_responder
                .insert(thread_ts.to_string(), responder.to_string());
        }
        tracing::debug!(
            responder = %responder,
            thread = thread_ts.unwrap_or("-"),
            "Recorded reply"
        );
    }

    /// Whether `responder` replied less than the cooldown ago.
    pub fn cooldown_active(&self, responder: &str) -> bool {
        self.cooldown_remaining(responder).is_some()
    }

    /// Seconds left on `responder`'s cooldown, if it is active.
    pub fn cooldown_remaining(&self, responder: &str) -> Option<f64> {
        let now = self.clock.now();
        let last = self.lock().last_reply.get(responder).copied().unwrap_or(0.0);
        let elapsed = now - last;
        (elapsed < self.cooldown_secs).then(|| self.cooldown_secs - elapsed)
    }

    /// Whether `responder` has used up its turns in `thread_ts`.
    pub fn turns_exceeded(&self, responder: &str, thread_ts: &str) -> bool {
        self.turns(responder, thread_ts) >= self.max_turns_per_thread
    }

    /// Turns `responder` has taken in `thread_ts`.
    pub fn turns(&self, responder: &str, thread_ts: &str) -> u32 {
        self.lock()
            .turns
            .get(thread_ts)
            .and_then(|t| t.get(responder))
            .copied()
            .unwrap_or(0)
    }

    /// Snapshot of every responder's turns in `thread_ts`.
    pub fn thread_turns(&self, thread_ts: &str) -> TurnCounts {
        self.lock().turns.get(thread_ts).cloned().unwrap_or_default()
    }

    /// Most recent responder recorded in `thread_ts`.
    pub fn last_responder(&self, thread_ts: &str) -> Option<String> {
        self.lock().last_responder.get(thread_ts).cloned()
    }

    /// When `responder` last replied.
    pub fn last_reply_at(&self, responder: &str) -> Option<f64> {
        self.lock().last_reply.get(responder).copied()
    }

    /// Mark channel activity now.
    pub fn mark_activity(&self) {
        let now = self.clock.now();
        self.set_last_activity(now);
    }

    /// Seed or overwrite the last activity timestamp.
    pub fn set_last_activity(&self, timestamp: f64) {
        self.lock().last_activity = timestamp;
    }

    pub fn last_activity(&self) -> f64 {
        self.lock().last_activity
    }

    /// Seconds since the last recorded activity.
    pub fn idle_secs(&self) -> f64 {
        let now = self.clock.now();
        now - self.last_activity()
    }
}

impl std::fmt::Debug for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ConversationState")
            .field("cooldown_secs", &self.cooldown_secs)
            .field("max_turns_per_thread", &self.max_turns_per_thread)
            .field("responders", &inner.last_reply.len())
            .field("threads", &inner.turns.len())
            .field("last_activity", &inner.last_activity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;

    fn state_at(now: f64) -> (ConversationState, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        let state = ConversationState::with_clock(Duration::from_secs(30), 3, clock.clone());
        (state, clock)
    }

    #[test]
    fn test_cooldown_window() {
        let (state, clock) = state_at(1_000.0);
        assert!(!state.cooldown_active("isla"));

        state.record_reply("isla", Some("T1"));
        assert!(state.cooldown_active("isla"));
        assert!(!state.cooldown_active("dominic"));

        clock.advance(29.9);
        assert!(state.cooldown_active("isla"));

        clock.advance(0.2);
        assert!(!state.cooldown_active("isla"));
    }

    #[test]
    fn test_cooldown_is_global_per_responder() {
        let (state, _clock) = state_at(1_000.0);
        state.record_reply("isla", Some("T1"));
        // Cooldown is not per thread.
        assert!(state.cooldown_active("isla"));
        assert_eq!(state.turns("isla", "T2"), 0);
    }

    #[test]
    fn test_cooldown_remaining() {
        let (state, clock) = state_at(1_000.0);
        state.record_reply("isla", None);
        clock.advance(10.0);
        let remaining = state.cooldown_remaining("isla").unwrap();
        assert!((remaining - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_turn_limit() {
        let (state, _clock) = state_at(1_000.0);
        state.record_reply("isla", Some("T1"));
        state.record_reply("isla", Some("T1"));
        assert!(!state.turns_exceeded("isla", "T1"));
        state.record_reply("isla", Some("T1"));
        assert!(state.turns_exceeded("isla", "T1"));
        assert!(!state.turns_exceeded("isla", "T2"));
        assert!(!state.turns_exceeded("elena", "T1"));
    }

    #[test]
    fn test_reply_without_thread_only_sets_cooldown() {
        let (state, _clock) = state_at(1_000.0);
        state.record_reply("isla", None);
        assert_eq!(state.last_reply_at("isla"), Some(1_000.0));
        assert!(state.thread_turns("T1").is_empty());
    }

    #[test]
    fn test_thread_turns_and_last_responder() {
        let (state, _clock) = state_at(1_000.0);
        state.record_reply("isla", Some("T1"));
        state.record_reply("elena", Some("T1"));
        state.record_reply("isla", Some("T1"));

        let turns = state.thread_turns("T1");
        assert_eq!(turns["isla"], 2);
        assert_eq!(turns["elena"], 1);
        assert_eq!(state.last_responder("T1").as_deref(), Some("isla"));
        assert!(state.last_responder("T2").is_none());
    }

    #[test]
    fn test_activity_mark_and_seed() {
        let (state, clock) = state_at(1_000.0);
        assert_eq!(state.last_activity(), 0.0);

        state.mark_activity();
        assert_eq!(state.last_activity(), 1_000.0);

        clock.advance(45.0);
        assert!((state.idle_secs() - 45.0).abs() < 1e-9);

        state.set_last_activity(10.0);
        assert_eq!(state.last_activity(), 10.0);
    }

    #[test]
    fn test_concurrent_recording_is_atomic() {
        let (state, _clock) = state_at(1_000.0);
        let state = Arc::new(state);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        state.record_reply("isla", Some("T1"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(state.turns("isla", "T1"), 2_000);
    }
}
