//! Wall-clock source for access evaluation and visit timestamps

use chrono::{Datelike, Local, NaiveDateTime, NaiveTime};

/// Supplies the current local date and time
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Snapshot of a clock reading split the way access rules consume it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub at: NaiveDateTime,
}

impl Moment {
    pub fn read(clock: &dyn Clock) -> Self {
        Self { at: clock.now() }
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.at.time()
    }

    /// ISO day of week, 1 = Monday .. 7 = Sunday
    pub fn iso_weekday(&self) -> u32 {
        self.at.weekday().number_from_monday()
    }
}

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
