use std::time::Duration;

use crate::config::helpers::parse_optional_env;
use crate::error::ConfigError;

/// Turn arbitration and stagger settings.
#[derive(Debug, Clone)]
pub struct CoordinationConfig {
    /// Minimum time between two replies from the same responder.
    pub cooldown: Duration,
    /// Replies a single responder may make within one thread.
    pub max_turns_per_thread: u32,
    /// Lower bound of the per-responder reply delay, in seconds.
    pub stagger_min_secs: f64,
    /// Upper bound of the per-responder reply delay, in seconds.
    pub stagger_max_secs: f64,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(30),
            max_turns_per_thread: 3,
            stagger_min_secs: 1.5,
            stagger_max_secs: 4.0,
        }
    }
}

/// Delays are rounded to tenths, so bounds must be too.
fn is_whole_tenth(secs: f64) -> bool {
    ((secs * 10.0).round() - secs * 10.0).abs() < 1e-6
}

impl CoordinationConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let stagger_min_secs: f64 =
            parse_optional_env("STAGGER_MIN_SECS", defaults.stagger_min_secs)?;
        let stagger_max_secs: f64 =
            parse_optional_env("STAGGER_MAX_SECS", defaults.stagger_max_secs)?;

        if !(stagger_min_secs >= 0.0 && stagger_min_secs <= stagger_max_secs) {
            return Err(ConfigError::InvalidValue {
                key: "STAGGER_MIN_SECS".to_string(),
                message: format!(
                    "must be non-negative and <= STAGGER_MAX_SECS ({stagger_max_secs}), got {stagger_min_secs}"
                ),
            });
        }

        for (key, value) in [
            ("STAGGER_MIN_SECS", stagger_min_secs),
            ("STAGGER_MAX_SECS", stagger_max_secs),
        ] {
            if !is_whole_tenth(value) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be a multiple of 0.1, got {value}"),
                });
            }
        }

        Ok(Self {
            cooldown: Duration::from_secs(parse_optional_env(
                "COOLDOWN_SECONDS",
                defaults.cooldown.as_secs(),
            )?),
            max_turns_per_thread: parse_optional_env(
                "MAX_TURNS_PER_THREAD",
                defaults.max_turns_per_thread,
            )?,
            stagger_min_secs,
            stagger_max_secs,
        })
    }
}
