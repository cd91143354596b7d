use secrecy::SecretString;

use crate::config::helpers::{optional_env, parse_string_env};
use crate::error::ConfigError;

/// Default Slack Web API base URL.
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

/// Slack credentials and target channel.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub bot_token: SecretString,
    pub channel_id: String,
    pub api_base: String,
}

impl SlackConfig {
    /// Resolve Slack settings. Returns `None` when no bot token is set.
    pub(crate) fn resolve() -> Result<Option<Self>, ConfigError> {
        let Some(token) = optional_env("SLACK_BOT_TOKEN")? else {
            return Ok(None);
        };

        let channel_id =
            optional_env("SLACK_CHANNEL_ID")?.ok_or_else(|| ConfigError::MissingRequired {
                key: "SLACK_CHANNEL_ID".to_string(),
                hint: "Set it to the channel the responders share (e.g. C0123456789)."
                    .to_string(),
            })?;

        let api_base = parse_string_env("SLACK_API_BASE", DEFAULT_SLACK_API_BASE)?;
        if !api_base.starts_with("https://") && !api_base.starts_with("http://") {
            return Err(ConfigError::InvalidValue {
                key: "SLACK_API_BASE".to_string(),
                message: "must be an http(s) URL".to_string(),
            });
        }

        Ok(Some(Self {
            bot_token: SecretString::from(token),
            channel_id,
            api_base: api_base.trim_end_matches('/').to_string(),
        }))
    }
}
