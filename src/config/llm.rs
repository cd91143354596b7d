use std::time::Duration;

use secrecy::SecretString;

use crate::config::helpers::{optional_env, parse_optional_env, parse_string_env};
use crate::error::ConfigError;

/// Language-model service configuration (OpenAI-compatible chat completions).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub max_retries: u32,
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4.1".to_string(),
            max_retries: 3,
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl LlmConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            api_key: optional_env("OPENAI_API_KEY")?.map(SecretString::from),
            base_url: parse_string_env("OPENAI_BASE_URL", defaults.base_url)?
                .trim_end_matches('/')
                .to_string(),
            model: parse_string_env("OPENAI_MODEL", defaults.model)?,
            max_retries: parse_optional_env("LLM_MAX_RETRIES", defaults.max_retries)?,
            request_timeout: Duration::from_secs(parse_optional_env(
                "LLM_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
        })
    }
}
