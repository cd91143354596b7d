//! Conversation coordination core.
//!
//! Decides, for each incoming message, where replies go and which
//! responders may speak, and keeps the shared state those decisions depend
//! on. Everything here except [`freshness`], [`summarizer`] and the
//! [`reviver`] loop is synchronous and free of I/O.
//!
//! ```text
//!   IncomingEvent
//!        │
//!        ▼
//!   ResponseRouter ──► Placement
//!        │
//!        ▼
//!   EscalationResolver ◄── ConversationState ──► Reviver ──► ReviveHook
//!        │                       ▲
//!        ▼                       │
//!   TurnArbiter ─────────────────┘
//!        │
//!        ▼
//!   StaggerConfig ──► TurnPlan
//! ```

pub mod arbiter;
pub mod clock;
pub mod coordinator;
pub mod escalation;
pub mod fallback;
pub mod freshness;
pub mod hours;
pub mod keywords;
pub mod reviver;
pub mod router;
pub mod stagger;
pub mod state;
pub mod summarizer;

pub use arbiter::{TurnArbiter, Verdict};
pub use clock::{Clock, SystemClock, parse_ts};
pub use coordinator::{Coordinator, PlannedReply, SkippedReply, TurnPlan};
pub use escalation::{ESCALATION_FACTOR, EscalationResolver};
pub use fallback::Degradable;
pub use freshness::{FRESHNESS_FETCH_LIMIT, ThreadFreshness};
pub use hours::{WorkingHours, is_within_working_hours};
pub use keywords::{KeywordSet, is_relevant};
pub use reviver::{ReviveHook, Reviver, WakeOutcome};
pub use router::{Condition, ResponseRouter, RouteDecision, RoutingRule, Target};
pub use stagger::{StaggerConfig, stagger_delay};
pub use state::{ConversationState, TurnCounts};
pub use summarizer::{SUMMARY_SYSTEM_PROMPT, ThreadSummarizer};
