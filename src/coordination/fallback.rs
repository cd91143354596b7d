//! Results that never fail but may be degraded.
//!
//! I/O helpers at the platform boundary must not propagate errors to the
//! coordination path. Instead of swallowing failures they return a
//! [`Degradable`], which always carries a usable value and says whether that
//! value is live or a safe default substituted after an error.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Degradable<T> {
    /// The real value.
    Live { value: T },
    /// A safe default, with the reason the real value was unavailable.
    Fallback { value: T, reason: String },
}

impl<T> Degradable<T> {
    pub fn live(value: T) -> Self {
        Degradable::Live { value }
    }

    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Degradable::Fallback {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Degradable::Live { value } | Degradable::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Degradable::Live { value } | Degradable::Fallback { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Degradable::Fallback { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Degradable::Live { .. } => None,
            Degradable::Fallback { reason, .. } => Some(reason),
        }
    }
}
