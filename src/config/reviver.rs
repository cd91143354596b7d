use std::time::Duration;

use crate::config::helpers::{parse_bool_env, parse_optional_env};
use crate::error::ConfigError;

/// Reviver (inactivity monitor) configuration.
#[derive(Debug, Clone)]
pub struct ReviverConfig {
    /// Whether the reviver runs at all.
    pub enabled: bool,
    /// Interval between wake-ups.
    pub check_interval: Duration,
    /// Silence longer than this triggers a revival.
    pub lookback: Duration,
    /// Only revive inside working hours.
    pub working_hours_only: bool,
    /// Fixed offset of the reference time zone from UTC, in hours.
    pub utc_offset_hours: i32,
}

impl Default for ReviverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_interval: Duration::from_secs(90),
            lookback: Duration::from_secs(180),
            working_hours_only: true,
            utc_offset_hours: -4,
        }
    }
}

impl ReviverConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let check_interval_secs: u64 = parse_optional_env(
            "REVIVER_CHECK_INTERVAL",
            defaults.check_interval.as_secs(),
        )?;
        if check_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "REVIVER_CHECK_INTERVAL".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let utc_offset_hours: i32 =
            parse_optional_env("WORKING_HOURS_UTC_OFFSET", defaults.utc_offset_hours)?;
        if !(-23..=23).contains(&utc_offset_hours) {
            return Err(ConfigError::InvalidValue {
                key: "WORKING_HOURS_UTC_OFFSET".to_string(),
                message: format!("must be between -23 and 23, got {utc_offset_hours}"),
            });
        }

        Ok(Self {
            enabled: parse_bool_env("REVIVER_ENABLED", defaults.enabled)?,
            check_interval: Duration::from_secs(check_interval_secs),
            lookback: Duration::from_secs(parse_optional_env(
                "REVIVER_LOOKBACK_SECONDS",
                defaults.lookback.as_secs(),
            )?),
            working_hours_only: parse_bool_env(
                "REVIVER_WORKING_HOURS_ONLY",
                defaults.working_hours_only,
            )?,
            utc_offset_hours,
        })
    }
}
