use chrono::{Local, NaiveDate};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// Source of time for the rate limiter (monotonic) and the booking date rule (calendar)
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn today(&self) -> NaiveDate;
}

// Wall clock used by the running server
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same time, so a test can hand one copy to the limiter
/// and keep another to advance it.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualTime>>,
}

#[derive(Debug)]
struct ManualTime {
    now: Instant,
    today: NaiveDate,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualTime {
                now: Instant::now(),
                today,
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut time) = self.inner.lock() {
            time.now += by;
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        if let Ok(mut time) = self.inner.lock() {
            time.today = today;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.inner.lock() {
            Ok(time) => time.now,
            Err(poisoned) => poisoned.into_inner().now,
        }
    }

    fn today(&self) -> NaiveDate {
        match self.inner.lock() {
            Ok(time) => time.today,
            Err(poisoned) => poisoned.into_inner().today,
        }
    }
}
