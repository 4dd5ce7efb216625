use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

use crate::types::format_rfc3339;

/// Source of "now" for every date comparison in the engine.
///
/// Injected so quarantine and forecasting rules can be exercised at any
/// instant without touching the system time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// "Now" rendered as the persisted timestamp format.
    fn now_rfc3339(&self) -> String {
        format_rfc3339(self.now())
    }
}

/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used by tests and by replays.
pub struct FixedClock {
    at: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at: RwLock::new(at) }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.at.write().unwrap() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut at = self.at.write().unwrap();
        *at += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.at.read().unwrap()
    }
}
