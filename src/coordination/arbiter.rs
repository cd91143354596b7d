//! Turn and cooldown arbitration.

use std::sync::Arc;

use serde::Serialize;

use crate::coordination::state::ConversationState;

/// Why a responder may or may not reply right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Permitted,
    CoolingDown { remaining_secs: f64 },
    TurnLimitReached { turns: u32 },
}

impl Verdict {
    pub fn is_permitted(&self) -> bool {
        matches!(self, Verdict::Permitted)
    }
}

/// Decides whether a responder may reply, and records replies that were sent.
///
/// Performs no I/O; each check reads the store as it is at that instant.
#[derive(Debug, Clone)]
pub struct TurnArbiter {
    state: Arc<ConversationState>,
}

impl TurnArbiter {
    pub fn new(state: Arc<ConversationState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<ConversationState> {
        &self.state
    }

    /// Cooldown is checked first, then the turn limit for `thread_ts` (a
    /// channel-level reply has no turn limit).
    pub fn verdict(&self, responder: &str, thread_ts: Option<&str>) -> Verdict {
        if let Some(remaining_secs) = self.state.cooldown_remaining(responder) {
            return Verdict::CoolingDown { remaining_secs };
        }
        if let Some(thread_ts) = thread_ts
            && self.state.turns_exceeded(responder, thread_ts)
        {
            return Verdict::TurnLimitReached {
                turns: self.state.turns(responder, thread_ts),
            };
        }
        Verdict::Permitted
    }

    pub fn may_reply(&self, responder: &str, thread_ts: Option<&str>) -> bool {
        self.verdict(responder, thread_ts).is_permitted()
    }

    /// Call after a reply has actually been posted.
    pub fn record(&self, responder: &str, thread_ts: Option<&str>) {
        self.state.record_reply(responder, thread_ts);
    }
}
