//! Test clocks
//!
//! Deadlines are computed from a [`Clock`]; these implementations pin it to
//! a known instant or make it fail.

use ntsync_api::{Clock, ClockError, Duration, Instant};
use std::sync::Mutex;

/// A clock that reads whatever it was last set to
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<Instant>,
}

impl FixedClock {
    /// Creates a clock pinned at `now`
    pub fn new(now: Instant) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Creates a clock pinned `secs` seconds after the Unix epoch
    pub fn at_unix_secs(secs: u64) -> Self {
        Self::new(Instant::EPOCH + Duration::from_secs(secs))
    }

    /// Moves the clock to `now`
    pub fn set(&self, now: Instant) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = *now + by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Result<Instant, ClockError> {
        Ok(*self.now.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

/// A clock that always fails with the same error
#[derive(Debug, Clone, Copy)]
pub struct FailingClock(pub ClockError);

impl Default for FailingClock {
    fn default() -> Self {
        Self(ClockError::Unavailable)
    }
}

impl Clock for FailingClock {
    fn now(&self) -> Result<Instant, ClockError> {
        Err(self.0)
    }
}
