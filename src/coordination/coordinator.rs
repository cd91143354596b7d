//! Per-event turn planning.
//!
//! [`Coordinator`] ties the pure components together: it routes an event,
//! decides whether the thread escalates, filters responders by topic,
//! arbitrates each one and attaches its stagger delay and handoff targets.
//! It performs no I/O; the caller posts the planned replies and then calls
//! [`Coordinator::record`] for each reply that actually went out.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::channels::{IncomingEvent, Placement};
use crate::config::Config;
use crate::coordination::arbiter::{TurnArbiter, Verdict};
use crate::coordination::escalation::EscalationResolver;
use crate::coordination::keywords::KeywordSet;
use crate::coordination::router::ResponseRouter;
use crate::coordination::stagger::StaggerConfig;
use crate::coordination::state::ConversationState;

/// A reply a responder is cleared to make.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedReply {
    pub responder: String,
    /// Seconds to wait before posting.
    pub delay_secs: f64,
    /// Who the responder may hand the conversation to, in order.
    pub handoffs: Vec<String>,
}

/// A relevant responder that may not reply right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedReply {
    pub responder: String,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Everything decided for one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnPlan {
    pub placement: Placement,
    /// Name of the routing rule that chose the placement.
    pub rule: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalated_to: Option<String>,
    pub replies: Vec<PlannedReply>,
    pub skipped: Vec<SkippedReply>,
}

pub struct Coordinator {
    state: Arc<ConversationState>,
    router: ResponseRouter,
    arbiter: TurnArbiter,
    escalation: EscalationResolver,
    stagger: StaggerConfig,
    relevance: BTreeMap<String, KeywordSet>,
}

impl Coordinator {
    pub fn new(
        state: Arc<ConversationState>,
        router: ResponseRouter,
        escalation: EscalationResolver,
        stagger: StaggerConfig,
        responder_keywords: &BTreeMap<String, Vec<String>>,
    ) -> Self {
        let relevance = responder_keywords
            .iter()
            .map(|(name, keywords)| (name.clone(), KeywordSet::new(keywords)))
            .filter(|(_, set)| !set.is_empty())
            .collect();
        Self {
            arbiter: TurnArbiter::new(Arc::clone(&state)),
            state,
            router,
            escalation,
            stagger,
            relevance,
        }
    }

    pub fn from_config(config: &Config, state: Arc<ConversationState>) -> Self {
        Self::new(
            state,
            ResponseRouter::from_config(&config.roster, &config.routing),
            EscalationResolver::from_roster(&config.roster),
            StaggerConfig::new(
                config.coordination.stagger_min_secs,
                config.coordination.stagger_max_secs,
            ),
            &config.roster.responder_keywords,
        )
    }

    pub fn state(&self) -> &Arc<ConversationState> {
        &self.state
    }

    pub fn router(&self) -> &ResponseRouter {
        &self.router
    }

    pub fn escalation(&self) -> &EscalationResolver {
        &self.escalation
    }

    /// Note that the channel saw a message.
    pub fn observe(&self, event: &IncomingEvent) {
        tracing::trace!(ts = %event.ts, "Observed event");
        self.state.mark_activity();
    }

    /// Whether `responder` cares about `text`. Responders without keywords
    /// care about everything.
    pub fn is_relevant_to(&self, responder: &str, text: &str) -> bool {
        self.relevance
            .get(responder)
            .is_none_or(|keywords| keywords.matches(text))
    }

    /// Decide placement and who may reply to `event`.
    pub fn plan<S: AsRef<str>>(&self, event: &IncomingEvent, candidates: &[S]) -> TurnPlan {
        let decision = self.router.route_with_rule(event);
        let thread_ts = decision.placement.thread_ts.as_deref();

        let escalated_to = thread_ts
            .filter(|thread| {
                self.escalation.should_escalate(
                    &self.state.thread_turns(thread),
                    self.state.max_turns_per_thread(),
                    self.state.last_responder(thread).as_deref(),
                )
            })
            .map(|_| self.escalation.fallback().to_string());

        let considered: Vec<&str> = match &escalated_to {
            Some(fallback) => vec![fallback.as_str()],
            None => candidates
                .iter()
                .map(|c| c.as_ref())
                .filter(|name| self.is_relevant_to(name, &event.text))
                .collect(),
        };

        let mut replies = Vec::new();
        let mut skipped = Vec::new();
        for responder in considered {
            match self.arbiter.verdict(responder, thread_ts) {
                Verdict::Permitted => replies.push(PlannedReply {
                    responder: responder.to_string(),
                    delay_secs: self.stagger.delay_secs(responder),
                    handoffs: self.escalation.handoff_targets(responder).to_vec(),
                }),
                verdict => skipped.push(SkippedReply {
                    responder: responder.to_string(),
                    verdict,
                }),
            }
        }

        tracing::debug!(
            ts = %event.ts,
            rule = decision.rule,
            thread = thread_ts.unwrap_or("-"),
            escalated = escalated_to.is_some(),
            replies = replies.len(),
            skipped = skipped.len(),
            "Planned turn"
        );

        TurnPlan {
            placement: decision.placement,
            rule: decision.rule,
            escalated_to,
            replies,
            skipped,
        }
    }

    /// Current verdict for `responder` replying at `placement`.
    pub fn verdict(&self, responder: &str, placement: &Placement) -> Verdict {
        self.arbiter.verdict(responder, placement.thread_ts.as_deref())
    }

    /// Record a reply that was posted at `placement`.
    pub fn record(&self, responder: &str, placement: &Placement) {
        self.arbiter.record(responder, placement.thread_ts.as_deref());
    }
}
