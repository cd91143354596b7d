//! Working-hours gate.
//!
//! The reference time zone is a fixed UTC offset. There is no daylight
//! saving adjustment; downstream scheduling relies on the fixed offset.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc, Weekday};

/// Fixed-offset weekday office hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    /// Offset of the reference zone from UTC, in hours.
    pub utc_offset_hours: i32,
    /// First working hour, inclusive.
    pub start_hour: u32,
    /// End hour, exclusive.
    pub end_hour: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            utc_offset_hours: -4,
            start_hour: 9,
            end_hour: 18,
        }
    }
}

impl WorkingHours {
    pub fn with_offset(utc_offset_hours: i32) -> Self {
        Self {
            utc_offset_hours,
            ..Self::default()
        }
    }

    /// True on Monday to Friday between `start_hour` and `end_hour` in the
    /// reference zone.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let offset =
            FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
        let local = now.with_timezone(&offset);
        let weekday = !matches!(local.weekday(), Weekday::Sat | Weekday::Sun);
        weekday && (self.start_hour..self.end_hour).contains(&local.hour())
    }
}

/// [`WorkingHours::contains`] with the reference defaults (UTC-4, 9 to 18).
pub fn is_within_working_hours(now: DateTime<Utc>) -> bool {
    WorkingHours::default().contains(now)
}
