use std::collections::{BTreeMap, BTreeSet};

use crate::config::helpers::{optional_env, parse_map_env, parse_string_env};
use crate::error::ConfigError;

/// Default handoff pairs, `responder=target,target;...`.
pub const DEFAULT_HANDOFF_MAP: &str = "isla=elena,talia;dominic=miles;zara=isla;roman=elena";

/// Default escalation fallback responder.
pub const DEFAULT_FALLBACK_RESPONDER: &str = "elena";

/// Who the responders are and how they relate to each other.
#[derive(Debug, Clone)]
pub struct RosterConfig {
    /// Platform user ID of the founder, whose messages get special routing.
    pub founder_id: Option<String>,
    /// Responder that high-volume threads escalate to.
    pub fallback_responder: String,
    /// Responder to ordered list of handoff candidates.
    pub handoffs: BTreeMap<String, Vec<String>>,
    /// Responder to topic keywords. Responders without an entry are relevant
    /// to every message.
    pub responder_keywords: BTreeMap<String, Vec<String>>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            founder_id: None,
            fallback_responder: DEFAULT_FALLBACK_RESPONDER.to_string(),
            handoffs: BTreeMap::from([
                ("isla".to_string(), vec!["elena".to_string(), "talia".to_string()]),
                ("dominic".to_string(), vec!["miles".to_string()]),
                ("zara".to_string(), vec!["isla".to_string()]),
                ("roman".to_string(), vec!["elena".to_string()]),
            ]),
            responder_keywords: BTreeMap::new(),
        }
    }
}

impl RosterConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            founder_id: optional_env("FOUNDER_ID")?,
            fallback_responder: parse_string_env(
                "FALLBACK_RESPONDER",
                DEFAULT_FALLBACK_RESPONDER,
            )?,
            handoffs: parse_map_env("HANDOFF_MAP", DEFAULT_HANDOFF_MAP)?,
            responder_keywords: parse_map_env("RESPONDER_KEYWORDS", "")?,
        })
    }

    /// Every responder named anywhere in the roster, sorted.
    pub fn responders(&self) -> Vec<String> {
        let mut names: BTreeSet<&str> = BTreeSet::new();
        names.insert(&self.fallback_responder);
        for (name, targets) in &self.handoffs {
            names.insert(name);
            names.extend(targets.iter().map(String::as_str));
        }
        names.extend(self.responder_keywords.keys().map(String::as_str));
        names.into_iter().map(String::from).collect()
    }
}
