//! Crosstalk: conversation coordination for several automated responders
//! sharing one Slack channel.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                          Platform boundary                            │
//! │   ┌──────────────┐        ┌──────────────┐        ┌──────────────┐    │
//! │   │ SlackClient  │        │ OpenAI chat  │        │  CLI (stdin) │    │
//! │   └──────┬───────┘        └──────┬───────┘        └──────┬───────┘    │
//! └──────────┼───────────────────────┼───────────────────────┼────────────┘
//!            ▼                       ▼                       ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                          Coordination core                            │
//! │  ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌────────────────┐   │
//! │  │   Router   │─▶│ Escalation │─▶│  Arbiter   │─▶│    Stagger     │   │
//! │  └────────────┘  └─────┬──────┘  └─────┬──────┘  └────────────────┘   │
//! │                        └───────┬───────┘                              │
//! │                                ▼                                      │
//! │                    ┌───────────────────────┐    ┌────────────────┐    │
//! │                    │  ConversationState    │◀───│    Reviver     │    │
//! │                    └───────────────────────┘    └────────────────┘    │
//! │   ┌────────────────┐  ┌────────────────┐                              │
//! │   │   Freshness    │  │   Summarizer   │   (degrade, never fail)      │
//! │   └────────────────┘  └────────────────┘                              │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Features
//!
//! - **Reply placement** - ordered rule cascade deciding thread vs channel
//! - **Turn arbitration** - per-responder cooldowns and per-thread turn limits
//! - **Escalation and handoffs** - busy threads go to a fallback responder
//! - **Staggered replies** - deterministic per-responder delays
//! - **Revival** - nudges the channel after a period of silence

pub mod channels;
pub mod cli;
pub mod config;
pub mod coordination;
pub mod error;
pub mod llm;
pub mod testing;

pub use config::Config;
pub use error::Error;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::channels::{IncomingEvent, MessagingClient, Placement, ThreadMessage};
    pub use crate::config::Config;
    pub use crate::coordination::{
        ConversationState, Coordinator, Degradable, ResponseRouter, TurnArbiter, TurnPlan,
    };
    pub use crate::error::Error;
    pub use crate::llm::LlmProvider;
}
