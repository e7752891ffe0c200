//! Wall-clock source fixed at UTC-04:00 (no DST).
//!
//! Every timestamp in the system is a naive local datetime from this clock.
//! Components receive an `Arc<dyn Clock>` instead of reading OS time, which
//! keeps time-dependent logic deterministic under test.

use chrono::{Duration, NaiveDateTime, Utc};

/// Fixed offset from UTC, in hours.
pub const UTC_OFFSET_HOURS: i64 = -4;

pub trait Clock: Send + Sync {
    /// Current local wall-clock time (naive, UTC-04:00).
    fn now(&self) -> NaiveDateTime;
}

/// Production clock deriving local time from the OS UTC clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc() + Duration::hours(UTC_OFFSET_HOURS)
    }
}

/// Clock pinned to an adjustable instant, for deterministic tests.
#[derive(Debug)]
pub struct FixedClock {
    now: std::sync::Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().expect("clock lock poisoned") = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock lock poisoned");
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().expect("clock lock poisoned")
    }
}

/// Convert a naive local (UTC-04:00) datetime to naive UTC.
///
/// Used for persistence audit fields only; scheduling logic stays in
/// local wall-clock time.
pub fn to_utc(local: NaiveDateTime) -> NaiveDateTime {
    local - Duration::hours(UTC_OFFSET_HOURS)
}

/// Convert a naive UTC datetime to naive local (UTC-04:00) time.
pub fn from_utc(utc: NaiveDateTime) -> NaiveDateTime {
    utc + Duration::hours(UTC_OFFSET_HOURS)
}
