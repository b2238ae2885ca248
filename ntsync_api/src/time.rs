//! Realtime instants, durations and deadlines
//!
//! Everything is counted in nanoseconds on the realtime clock, the clock
//! the driver uses for deadlines submitted with `NTSYNC_WAIT_REALTIME`.
//! Arithmetic saturates instead of wrapping.

use crate::ClockError;
use core::ops::Add;
use serde::{Deserialize, Serialize};

const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Nanoseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instant(u64);

impl Instant {
    pub const EPOCH: Instant = Instant(0);

    pub const fn from_nanos(nanos: u64) -> Self {
        Instant(nanos)
    }

    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Time from `earlier` to `self`, zero if `earlier` is later
    pub fn duration_since(&self, earlier: Instant) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, duration: Duration) -> Instant {
        Instant(self.0.saturating_add(duration.0))
    }
}

/// A span of nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration(u64);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub const fn from_nanos(nanos: u64) -> Self {
        Duration(nanos)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Duration(millis.saturating_mul(NANOS_PER_MILLI))
    }

    pub const fn from_secs(secs: u64) -> Self {
        Duration(secs.saturating_mul(NANOS_PER_SEC))
    }

    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Whole milliseconds, truncated
    pub const fn as_millis(&self) -> u64 {
        self.0 / NANOS_PER_MILLI
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, other: Duration) -> Duration {
        Duration(self.0.saturating_add(other.0))
    }
}

impl From<Duration> for std::time::Duration {
    fn from(duration: Duration) -> Self {
        std::time::Duration::from_nanos(duration.0)
    }
}

/// An absolute wait deadline in the driver's encoding
///
/// `u64::MAX` is the driver's "no timeout" sentinel; every other value is
/// an [`Instant`] in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Deadline(u64);

impl Deadline {
    /// A deadline that never expires
    pub const NEVER: Deadline = Deadline(u64::MAX);

    /// Creates a deadline at the given instant
    ///
    /// Instants that collide with the sentinel are pulled back by one
    /// nanosecond so a finite deadline stays finite.
    pub fn at(instant: Instant) -> Self {
        Self(instant.as_nanos().min(u64::MAX - 1))
    }

    /// Creates a deadline from the raw driver value
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw driver value
    pub const fn as_raw(self) -> u64 {
        self.0
    }

    /// Returns true if this deadline never expires
    pub const fn is_never(self) -> bool {
        self.0 == u64::MAX
    }

    /// Returns the instant of this deadline, if it has one
    pub fn instant(self) -> Option<Instant> {
        if self.is_never() {
            None
        } else {
            Some(Instant::from_nanos(self.0))
        }
    }
}

/// Source of wall-clock time
///
/// Deadline computation reads the clock through this trait so tests can pin
/// or break it.
pub trait Clock {
    /// Reads the current wall-clock time
    fn now(&self) -> Result<Instant, ClockError>;
}

/// The host realtime clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<Instant, ClockError> {
        let since_epoch = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|_| ClockError::BeforeEpoch)?;
        let nanos = u64::try_from(since_epoch.as_nanos()).map_err(|_| ClockError::OutOfRange)?;
        Ok(Instant::from_nanos(nanos))
    }
}
