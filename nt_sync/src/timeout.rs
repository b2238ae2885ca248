//! Timeout encoding
//!
//! NT timeouts count 100 ns intervals. A negative value is relative to the
//! moment of the call, a positive one is an absolute system time measured
//! from 1601-01-01 UTC, zero polls. The facility wants an absolute realtime
//! deadline in Unix-epoch nanoseconds.

use ntsync_api::{Clock, ClockError, Deadline, Duration, Instant};
use serde::{Deserialize, Serialize};

/// 100 ns intervals between 1601-01-01 and 1970-01-01
pub const NT_EPOCH_OFFSET: u64 = 116_444_736_000_000_000;

/// Nanoseconds per NT interval
const NANOS_PER_TICK: u64 = 100;

/// Win32 "wait forever"
pub const INFINITE: u32 = 0xFFFF_FFFF;

/// An NT `LARGE_INTEGER` timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NtTimeout(i64);

impl NtTimeout {
    /// Return immediately if the wait cannot be satisfied
    pub const POLL: NtTimeout = NtTimeout(0);

    /// Wraps a raw 100 ns value
    pub const fn from_raw(raw: i64) -> Self {
        NtTimeout(raw)
    }

    /// Returns the raw 100 ns value
    pub const fn as_raw(self) -> i64 {
        self.0
    }

    /// A timeout `after` from the time of the call
    ///
    /// Sub-interval remainders are truncated.
    pub fn relative(after: Duration) -> Self {
        let ticks = after.as_nanos() / NANOS_PER_TICK;
        NtTimeout(-i64::try_from(ticks).unwrap_or(i64::MAX))
    }

    /// An absolute deadline, given in Unix-epoch time
    pub fn absolute(at: Instant) -> Self {
        let ticks = (at.as_nanos() / NANOS_PER_TICK).saturating_add(NT_EPOCH_OFFSET);
        NtTimeout(i64::try_from(ticks).unwrap_or(i64::MAX))
    }

    /// Converts Win32 milliseconds; [`INFINITE`] means no timeout
    pub fn from_win32_millis(millis: u32) -> Option<Self> {
        if millis == INFINITE {
            return None;
        }
        Some(NtTimeout(-i64::from(millis) * 10_000))
    }

    pub fn is_relative(self) -> bool {
        self.0 < 0
    }

    pub fn is_absolute(self) -> bool {
        self.0 > 0
    }
}

/// Encodes a timeout as a facility deadline
///
/// No timeout maps to [`Deadline::NEVER`] without reading the clock.
/// Otherwise the clock is read first, so a broken clock fails every timed
/// wait, absolute ones included.
pub fn encode_deadline<C: Clock + ?Sized>(
    timeout: Option<NtTimeout>,
    clock: &C,
) -> Result<Deadline, ClockError> {
    let Some(timeout) = timeout else {
        return Ok(Deadline::NEVER);
    };
    let now = clock.now()?;

    let at = match timeout.as_raw() {
        raw if raw < 0 => {
            let nanos = raw.unsigned_abs().saturating_mul(NANOS_PER_TICK);
            now + Duration::from_nanos(nanos)
        }
        0 => now,
        raw => {
            let unix_ticks = raw.unsigned_abs().saturating_sub(NT_EPOCH_OFFSET);
            Instant::from_nanos(unix_ticks.saturating_mul(NANOS_PER_TICK))
        }
    };
    Ok(Deadline::at(at))
}
