//! Deterministic per-responder reply delays.
//!
//! Spreads replies from several responders reacting to the same message
//! without any shared coordination: each identity always maps to the same
//! delay for given bounds.

use std::time::Duration;

/// Delay in seconds for `responder`, within `[min_secs, max_secs]` and
/// rounded to one decimal place. The bounds win over rounding: with bounds
/// that are not whole tenths the result may be a bound itself.
pub fn stagger_delay(responder: &str, min_secs: f64, max_secs: f64) -> f64 {
    let seed = responder.chars().map(|c| c as u64).sum::<u64>() % 100;
    let span = ((max_secs - min_secs) * 10.0).trunc();
    if !(span >= 1.0) {
        return min_secs;
    }
    let offset = (seed % span as u64) as f64 / 10.0;
    let delay = ((min_secs + offset) * 10.0).round() / 10.0;
    delay.clamp(min_secs, max_secs)
}

/// Stagger bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaggerConfig {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            min_secs: 1.5,
            max_secs: 4.0,
        }
    }
}

impl StaggerConfig {
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    pub fn delay_secs(&self, responder: &str) -> f64 {
        stagger_delay(responder, self.min_secs, self.max_secs)
    }

    pub fn delay_for(&self, responder: &str) -> Duration {
        Duration::from_secs_f64(self.delay_secs(responder).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        // "isla": 105 + 115 + 108 + 97 = 425 -> seed 25, span 25 -> offset 0.0
        assert_eq!(stagger_delay("isla", 1.5, 4.0), 1.5);
        // "elena": 101 + 108 + 101 + 110 + 97 = 517 -> seed 17 -> offset 1.7
        assert_eq!(stagger_delay("elena", 1.5, 4.0), 3.2);
    }

    #[test]
    fn test_deterministic() {
        for name in ["isla", "dominic", "zara", "roman", "miles"] {
            assert_eq!(
                stagger_delay(name, 1.5, 4.0),
                stagger_delay(name, 1.5, 4.0)
            );
        }
    }

    #[test]
    fn test_within_bounds() {
        let long = "x".repeat(300);
        let names = ["", "a", "isla", "dominic", "zara", "roman", "Ünïcode", long.as_str()];
        for name in names {
            for (min, max) in [(1.5, 4.0), (0.0, 1.0), (2.0, 2.05), (0.33, 7.77)] {
                let delay = stagger_delay(name, min, max);
                assert!(
                    (min..=max).contains(&delay),
                    "{name:?} gave {delay} outside [{min}, {max}]"
                );
            }
        }
    }

    #[test]
    fn test_bounds_win_over_rounding() {
        // The empty name has offset 0.0, and 0.33 rounds down to 0.3.
        assert_eq!(stagger_delay("", 0.33, 7.77), 0.33);
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        assert_eq!(stagger_delay("isla", 2.0, 2.0), 2.0);
        assert_eq!(stagger_delay("isla", 3.0, 1.0), 3.0);
    }

    #[test]
    fn test_config_duration() {
        let config = StaggerConfig::default();
        assert_eq!(config.delay_for("elena"), Duration::from_secs_f64(3.2));
    }
}
