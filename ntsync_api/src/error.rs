//! Facility error types

use thiserror::Error;

/// Errors reported by the synchronization facility
///
/// Each variant corresponds to the errno class the driver uses for it.
/// Errnos outside those classes are kept verbatim in [`FacilityError::Other`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FacilityError {
    /// The object identifier does not name an open object (`EBADF`)
    #[error("Bad object descriptor")]
    BadDescriptor,

    /// The driver could not access a caller buffer (`EFAULT`)
    #[error("Bad address")]
    Fault,

    /// The request arguments were rejected (`EINVAL`)
    #[error("Invalid argument")]
    InvalidArgument,

    /// The wait deadline passed before the wait was satisfied (`ETIMEDOUT`)
    #[error("Wait timed out")]
    TimedOut,

    /// A count would exceed its maximum (`EOVERFLOW`)
    #[error("Count overflow")]
    Overflow,

    /// The caller does not own the object (`EPERM`)
    #[error("Operation not permitted")]
    PermissionDenied,

    /// The driver does not implement the request (`ENOSYS`)
    #[error("Operation not supported")]
    Unsupported,

    /// Any other errno
    #[error("Driver error (errno {0})")]
    Other(i32),
}

impl FacilityError {
    /// Classifies a raw errno value
    pub fn from_errno(errno: i32) -> Self {
        match errno {
            libc::EBADF => FacilityError::BadDescriptor,
            libc::EFAULT => FacilityError::Fault,
            libc::EINVAL => FacilityError::InvalidArgument,
            libc::ETIMEDOUT => FacilityError::TimedOut,
            libc::EOVERFLOW => FacilityError::Overflow,
            libc::EPERM => FacilityError::PermissionDenied,
            libc::ENOSYS => FacilityError::Unsupported,
            other => FacilityError::Other(other),
        }
    }

    /// Returns the errno this error stands for
    pub fn errno(self) -> i32 {
        match self {
            FacilityError::BadDescriptor => libc::EBADF,
            FacilityError::Fault => libc::EFAULT,
            FacilityError::InvalidArgument => libc::EINVAL,
            FacilityError::TimedOut => libc::ETIMEDOUT,
            FacilityError::Overflow => libc::EOVERFLOW,
            FacilityError::PermissionDenied => libc::EPERM,
            FacilityError::Unsupported => libc::ENOSYS,
            FacilityError::Other(errno) => errno,
        }
    }

    /// Captures the calling thread's errno
    ///
    /// Must be called directly after the failing request, before anything
    /// else can overwrite errno.
    pub fn last_os_error() -> Self {
        Self::from(std::io::Error::last_os_error())
    }
}

impl From<std::io::Error> for FacilityError {
    fn from(error: std::io::Error) -> Self {
        match error.raw_os_error() {
            Some(errno) => FacilityError::from_errno(errno),
            None => FacilityError::Other(0),
        }
    }
}

/// Errors reading the wall clock
///
/// Kept apart from [`FacilityError`] because the clock is not part of the
/// driver.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// The wall clock could not be read
    #[error("Wall clock unavailable")]
    Unavailable,

    /// The wall clock reads earlier than the Unix epoch
    #[error("Wall clock is before the Unix epoch")]
    BeforeEpoch,

    /// The wall clock reading does not fit the deadline encoding
    #[error("Wall clock reading out of range")]
    OutOfRange,
}
