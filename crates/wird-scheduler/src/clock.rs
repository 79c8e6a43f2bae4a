use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, TimeZone};

/// Source of "now" in a given time zone. Next-fire instants are computed on
/// the wall clock of that zone.
pub trait Clock<Tz: TimeZone>: Send + Sync {
    fn now(&self) -> DateTime<Tz>;
}

/// The device's local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock<Local> for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
pub struct FixedClock<Tz: TimeZone> {
    now: Mutex<DateTime<Tz>>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Tz>) {
        *self.now.lock().expect("fixed clock poisoned") = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("fixed clock poisoned");
        *now = now.clone() + by;
    }
}

impl<Tz> Clock<Tz> for FixedClock<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Send,
{
    fn now(&self) -> DateTime<Tz> {
        self.now.lock().expect("fixed clock poisoned").clone()
    }
}
