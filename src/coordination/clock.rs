//! Time source for the coordination core.
//!
//! Every timestamp in the state store comes from one [`Clock`], so tests can
//! substitute a manual clock and step through cooldowns and revival windows
//! without sleeping.

use chrono::Utc;

/// Seconds since the Unix epoch, as used by Slack message timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Parse a Slack `ts` ("1712345678.000100") into seconds.
pub fn parse_ts(ts: &str) -> Option<f64> {
    ts.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
