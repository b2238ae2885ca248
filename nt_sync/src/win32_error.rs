//! Win32 error codes
//!
//! The `GetLastError` values the compatibility layer reports, translated
//! from the same errno classes as [`NtStatus`](crate::NtStatus).

use ntsync_api::FacilityError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Win32 error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Win32Error(u32);

impl Win32Error {
    pub const SUCCESS: Win32Error = Win32Error(0);
    pub const INVALID_FUNCTION: Win32Error = Win32Error(1);
    pub const ACCESS_DENIED: Win32Error = Win32Error(5);
    pub const INVALID_HANDLE: Win32Error = Win32Error(6);
    pub const GEN_FAILURE: Win32Error = Win32Error(31);
    pub const INVALID_PARAMETER: Win32Error = Win32Error(87);
    pub const TOO_MANY_POSTS: Win32Error = Win32Error(298);
    pub const NOACCESS: Win32Error = Win32Error(998);
    pub const TIMEOUT: Win32Error = Win32Error(1460);

    /// Wraps a raw error code
    pub const fn from_raw(code: u32) -> Self {
        Win32Error(code)
    }

    /// Returns the raw error code
    pub const fn code(self) -> u32 {
        self.0
    }
}

impl From<FacilityError> for Win32Error {
    fn from(error: FacilityError) -> Self {
        match error {
            FacilityError::BadDescriptor => Win32Error::INVALID_HANDLE,
            FacilityError::Fault => Win32Error::NOACCESS,
            FacilityError::InvalidArgument => Win32Error::INVALID_PARAMETER,
            FacilityError::TimedOut => Win32Error::TIMEOUT,
            FacilityError::Overflow => Win32Error::TOO_MANY_POSTS,
            FacilityError::PermissionDenied => Win32Error::ACCESS_DENIED,
            FacilityError::Unsupported => Win32Error::INVALID_FUNCTION,
            FacilityError::Other(_) => Win32Error::GEN_FAILURE,
        }
    }
}

impl fmt::Display for Win32Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
