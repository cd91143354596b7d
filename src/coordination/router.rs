//! Thread-vs-channel placement for replies.
//!
//! Placement is an ordered list of [`RoutingRule`]s evaluated top to bottom;
//! the first rule whose condition holds decides. The default cascade:
//!
//! | # | rule | condition | reply goes to |
//! |---|------|-----------|---------------|
//! | 1 | `in_thread` | event already in a thread | that thread |
//! | 2 | `bot_origin` | posted by a bot | new thread at the event |
//! | 3 | `founder_incidental` | founder + incidental keyword | new thread |
//! | 4 | `founder_default` | founder | channel |
//! | 5 | `strategic` | strategic keyword | channel |
//! | 6 | `tactical` | tactical keyword | new thread |
//! | 7 | `question` | contains `?` | channel |
//! | 8 | `default` | always | new thread |

use serde::Serialize;

use crate::channels::{IncomingEvent, Placement};
use crate::config::{RosterConfig, RoutingConfig};
use crate::coordination::keywords::KeywordSet;

/// What a rule tests.
#[derive(Debug, Clone)]
pub enum Condition {
    HasThread,
    FromBot,
    FromFounder,
    FounderMentions(KeywordSet),
    Mentions(KeywordSet),
    ContainsQuestion,
    Always,
}

/// Where a matching rule sends the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The thread the event belongs to.
    ExistingThread,
    /// A thread rooted at the event itself.
    NewThread,
    /// Top level of the channel.
    Channel,
}

/// One entry of the cascade.
#[derive(Debug, Clone)]
pub struct RoutingRule {
    pub name: &'static str,
    pub condition: Condition,
    pub target: Target,
}

impl RoutingRule {
    pub fn new(name: &'static str, condition: Condition, target: Target) -> Self {
        Self {
            name,
            condition,
            target,
        }
    }
}

/// The placement chosen for an event and the rule that chose it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    pub rule: &'static str,
    pub placement: Placement,
}

struct RouteInput<'a> {
    event: &'a IncomingEvent,
    lowered: String,
    founder_id: Option<&'a str>,
}

impl RouteInput<'_> {
    fn from_founder(&self) -> bool {
        match (self.founder_id, self.event.user.as_deref()) {
            (Some(founder), Some(user)) => founder == user,
            _ => false,
        }
    }
}

impl Condition {
    fn holds(&self, input: &RouteInput<'_>) -> bool {
        match self {
            Condition::HasThread => input.event.thread().is_some(),
            Condition::FromBot => input.event.is_bot(),
            Condition::FromFounder => input.from_founder(),
            Condition::FounderMentions(keywords) => {
                input.from_founder() && keywords.matches_lowered(&input.lowered)
            }
            Condition::Mentions(keywords) => keywords.matches_lowered(&input.lowered),
            Condition::ContainsQuestion => input.lowered.contains('?'),
            Condition::Always => true,
        }
    }
}

/// Decides reply placement. Pure: no I/O, no state, cannot fail.
#[derive(Debug, Clone)]
pub struct ResponseRouter {
    founder_id: Option<String>,
    rules: Vec<RoutingRule>,
}

impl ResponseRouter {
    /// Build the default cascade.
    pub fn new(founder_id: Option<String>, routing: &RoutingConfig) -> Self {
        let rules = vec![
            RoutingRule::new("in_thread", Condition::HasThread, Target::ExistingThread),
            RoutingRule::new("bot_origin", Condition::FromBot, Target::NewThread),
            RoutingRule::new(
                "founder_incidental",
                Condition::FounderMentions(KeywordSet::new(&routing.incidental_keywords)),
                Target::NewThread,
            ),
            RoutingRule::new("founder_default", Condition::FromFounder, Target::Channel),
            RoutingRule::new(
                "strategic",
                Condition::Mentions(KeywordSet::new(&routing.strategic_keywords)),
                Target::Channel,
            ),
            RoutingRule::new(
                "tactical",
                Condition::Mentions(KeywordSet::new(&routing.tactical_keywords)),
                Target::NewThread,
            ),
            RoutingRule::new("question", Condition::ContainsQuestion, Target::Channel),
            RoutingRule::new("default", Condition::Always, Target::NewThread),
        ];
        Self { founder_id, rules }
    }

    pub fn from_config(roster: &RosterConfig, routing: &RoutingConfig) -> Self {
        Self::new(roster.founder_id.clone(), routing)
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    /// Insert a rule at `index` (clamped to the end of the list).
    pub fn insert_rule(&mut self, index: usize, rule: RoutingRule) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    pub fn route(&self, event: &IncomingEvent) -> Placement {
        self.route_with_rule(event).placement
    }

    pub fn route_with_rule(&self, event: &IncomingEvent) -> RouteDecision {
        let input = RouteInput {
            event,
            lowered: event.text.to_lowercase(),
            founder_id: self.founder_id.as_deref(),
        };

        let matched = self.rules.iter().find(|rule| rule.condition.holds(&input));
        let (rule, target) = match matched {
            Some(rule) => (rule.name, rule.target),
            None => ("default", Target::NewThread),
        };

        let placement = match target {
            Target::ExistingThread => Placement::thread(event.thread().unwrap_or(&event.ts)),
            Target::NewThread => Placement::thread(event.ts.clone()),
            Target::Channel => Placement::channel(),
        };

        RouteDecision { rule, placement }
    }
}
