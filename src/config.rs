//! Configuration for crosstalk.
//!
//! Everything comes from environment variables (a `./.env` file is loaded
//! first via dotenvy, which never overwrites variables already set) with
//! defaults matching the reference deployment. Values are read once at
//! startup and are read-only afterwards.

mod coordination;
pub(crate) mod helpers;
mod llm;
mod reviver;
mod roster;
mod routing;
mod slack;

pub use self::coordination::CoordinationConfig;
pub use self::llm::LlmConfig;
pub use self::reviver::ReviverConfig;
pub use self::roster::{DEFAULT_FALLBACK_RESPONDER, DEFAULT_HANDOFF_MAP, RosterConfig};
pub use self::routing::{
    DEFAULT_INCIDENTAL_KEYWORDS, DEFAULT_STRATEGIC_KEYWORDS, DEFAULT_TACTICAL_KEYWORDS,
    RoutingConfig,
};
pub use self::slack::{DEFAULT_SLACK_API_BASE, SlackConfig};

use crate::error::ConfigError;

/// Main configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub slack: Option<SlackConfig>,
    pub llm: LlmConfig,
    pub coordination: CoordinationConfig,
    pub reviver: ReviverConfig,
    pub roster: RosterConfig,
    pub routing: RoutingConfig,
}

impl Config {
    /// Load configuration from `./.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::build()
    }

    fn build() -> Result<Self, ConfigError> {
        Ok(Self {
            slack: SlackConfig::resolve()?,
            llm: LlmConfig::resolve()?,
            coordination: CoordinationConfig::resolve()?,
            reviver: ReviverConfig::resolve()?,
            roster: RosterConfig::resolve()?,
            routing: RoutingConfig::resolve()?,
        })
    }

    /// Slack settings, or an error naming the missing variable.
    pub fn require_slack(&self) -> Result<&SlackConfig, ConfigError> {
        self.slack
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("SLACK_BOT_TOKEN".to_string()))
    }
}
