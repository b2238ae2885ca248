//! NT layer errors

use crate::{NtStatus, Win32Error};
use ntsync_api::{ClockError, FacilityError};
use thiserror::Error;

/// Result type for NT operations
pub type NtResult<T> = Result<T, NtError>;

/// Errors returned by NT operations
///
/// Argument and access checks fail locally, before any facility request.
/// Every variant has an NT status and a Win32 error code.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NtError {
    /// Argument `n` (1-based) was rejected
    #[error("Invalid parameter {0}")]
    InvalidParameter(u8),

    /// The handle lacks a right the operation requires
    #[error("Access denied")]
    AccessDenied,

    /// Named objects, security descriptors and alertable waits
    #[error("Not implemented")]
    NotImplemented,

    /// The facility reported an index outside the wait request
    #[error("Wait index {index} outside a request of {count} objects")]
    WaitIndexOutOfRange { index: u32, count: usize },

    /// The facility request failed
    #[error("Facility error: {0}")]
    Facility(#[from] FacilityError),

    /// The wall clock could not be read while encoding a timeout
    #[error("Clock error: {0}")]
    Clock(#[from] ClockError),
}

impl NtError {
    /// The NT status code for this error
    pub fn status(&self) -> NtStatus {
        match self {
            NtError::InvalidParameter(position) => NtStatus::invalid_parameter(*position),
            NtError::AccessDenied => NtStatus::ACCESS_DENIED,
            NtError::NotImplemented => NtStatus::NOT_IMPLEMENTED,
            NtError::WaitIndexOutOfRange { .. } => NtStatus::UNSUCCESSFUL,
            NtError::Facility(error) => NtStatus::from(*error),
            NtError::Clock(_) => NtStatus::UNSUCCESSFUL,
        }
    }

    /// The Win32 error code for this error
    pub fn win32_error(&self) -> Win32Error {
        match self {
            NtError::InvalidParameter(_) => Win32Error::INVALID_PARAMETER,
            NtError::AccessDenied => Win32Error::ACCESS_DENIED,
            NtError::NotImplemented => Win32Error::INVALID_FUNCTION,
            NtError::WaitIndexOutOfRange { .. } => Win32Error::GEN_FAILURE,
            NtError::Facility(error) => Win32Error::from(*error),
            NtError::Clock(_) => Win32Error::GEN_FAILURE,
        }
    }
}

impl From<NtError> for NtStatus {
    fn from(error: NtError) -> Self {
        error.status()
    }
}
