use crate::config::helpers::parse_list_env;
use crate::error::ConfigError;

pub const DEFAULT_INCIDENTAL_KEYWORDS: &[&str] = &["reminder", "ping", "fyi", "log", "minor"];

pub const DEFAULT_STRATEGIC_KEYWORDS: &[&str] = &[
    "strategy",
    "roadmap",
    "launch",
    "vision",
    "funding",
    "priority",
    "q3",
    "quarter",
    "forecast",
    "big picture",
    "alignment",
];

pub const DEFAULT_TACTICAL_KEYWORDS: &[&str] = &[
    "bug",
    "issue",
    "copy",
    "feedback",
    "minor",
    "follow-up",
    "reminder",
    "cta",
    "typo",
    "handoff",
    "link",
    "can you check",
];

/// Keyword lists driving thread-vs-channel placement.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Founder messages containing these stay in a thread.
    pub incidental_keywords: Vec<String>,
    /// Messages about these are answered at channel level.
    pub strategic_keywords: Vec<String>,
    /// Messages about these are answered in a thread.
    pub tactical_keywords: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            incidental_keywords: to_owned(DEFAULT_INCIDENTAL_KEYWORDS),
            strategic_keywords: to_owned(DEFAULT_STRATEGIC_KEYWORDS),
            tactical_keywords: to_owned(DEFAULT_TACTICAL_KEYWORDS),
        }
    }
}

impl RoutingConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            incidental_keywords: parse_list_env(
                "INCIDENTAL_KEYWORDS",
                DEFAULT_INCIDENTAL_KEYWORDS,
            )?,
            strategic_keywords: parse_list_env("STRATEGIC_KEYWORDS", DEFAULT_STRATEGIC_KEYWORDS)?,
            tactical_keywords: parse_list_env("TACTICAL_KEYWORDS", DEFAULT_TACTICAL_KEYWORDS)?,
        })
    }
}

fn to_owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
