//! Escalation to a fallback responder, and handoff lookup.

use std::collections::BTreeMap;

use crate::config::RosterConfig;
use crate::coordination::state::TurnCounts;

/// Aggregate turns at or above `max_turns * ESCALATION_FACTOR` escalate.
pub const ESCALATION_FACTOR: u32 = 3;

/// Resolves escalation and handoffs from static roster data.
#[derive(Debug, Clone)]
pub struct EscalationResolver {
    fallback: String,
    handoffs: BTreeMap<String, Vec<String>>,
}

impl EscalationResolver {
    pub fn new(fallback: impl Into<String>, handoffs: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            fallback: fallback.into(),
            handoffs,
        }
    }

    pub fn from_roster(roster: &RosterConfig) -> Self {
        Self::new(roster.fallback_responder.clone(), roster.handoffs.clone())
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Whether the thread has seen enough turns, from anyone, to hand it to
    /// the fallback responder. Never escalates when the fallback spoke last.
    pub fn should_escalate(
        &self,
        thread_turns: &TurnCounts,
        max_turns: u32,
        last_responder: Option<&str>,
    ) -> bool {
        let total: u64 = thread_turns.values().map(|&n| u64::from(n)).sum();
        let threshold = u64::from(max_turns) * u64::from(ESCALATION_FACTOR);
        total >= threshold && last_responder != Some(self.fallback.as_str())
    }

    /// Ordered handoff candidates for `responder`; empty when none are set.
    pub fn handoff_targets(&self, responder: &str) -> &[String] {
        self.handoffs
            .get(responder)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> EscalationResolver {
        EscalationResolver::from_roster(&RosterConfig::default())
    }

    fn turns(pairs: &[(&str, u32)]) -> TurnCounts {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_below_threshold_never_escalates() {
        let resolver = resolver();
        let counts = turns(&[("isla", 3), ("dominic", 3), ("zara", 2)]);
        assert!(!resolver.should_escalate(&counts, 3, Some("isla")));
        assert!(!resolver.should_escalate(&counts, 3, Some("elena")));
        assert!(!resolver.should_escalate(&counts, 3, None));
    }

    #[test]
    fn test_at_threshold_escalates_unless_fallback_spoke_last() {
        let resolver = resolver();
        let counts = turns(&[("isla", 3), ("dominic", 3), ("zara", 3)]);
        assert!(resolver.should_escalate(&counts, 3, Some("isla")));
        assert!(resolver.should_escalate(&counts, 3, None));
        assert!(!resolver.should_escalate(&counts, 3, Some("elena")));
    }

    #[test]
    fn test_aggregate_ignores_contributors() {
        let resolver = resolver();
        let counts = turns(&[("isla", 9)]);
        assert!(resolver.should_escalate(&counts, 3, Some("isla")));
    }

    #[test]
    fn test_empty_thread_with_zero_limit() {
        let resolver = resolver();
        assert!(resolver.should_escalate(&TurnCounts::new(), 0, Some("isla")));
    }

    #[test]
    fn test_handoff_targets() {
        let resolver = resolver();
        assert_eq!(resolver.handoff_targets("isla"), ["elena", "talia"]);
        assert_eq!(resolver.handoff_targets("dominic"), ["miles"]);
        assert!(resolver.handoff_targets("elena").is_empty());
        assert!(resolver.handoff_targets("nobody").is_empty());
    }
}
