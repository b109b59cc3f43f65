//! Time source for scheduling decisions.
//!
//! Scheduling never reads the wall clock directly; it asks a [`Clock`].
//! Stored timestamps have millisecond precision, so every clock here
//! yields millisecond-truncated instants and values survive a round trip
//! through the store unchanged.

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_to_millis(Utc::now())
    }
}

/// A clock that only moves when told to. Used by tests and simulations.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(truncate_to_millis(start)),
        }
    }

    /// Start at a fixed epoch-millisecond instant.
    ///
    /// # Panics
    /// Panics if `ms` is outside the range chrono can represent.
    pub fn at_millis(ms: i64) -> Self {
        let start = DateTime::from_timestamp_millis(ms)
            .expect("ManualClock::at_millis: timestamp out of range");
        Self::new(start)
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(truncate_to_millis(to));
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

pub(crate) fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}
