//! NTSTATUS values
//!
//! The status codes this layer produces and the translation from facility
//! errnos. Wait results share the value space: `STATUS_WAIT_n` is `n`.

use ntsync_api::{FacilityError, MAX_WAIT_OBJECTS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An NT status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NtStatus(u32);

impl NtStatus {
    pub const SUCCESS: NtStatus = NtStatus(0x0000_0000);
    pub const WAIT_0: NtStatus = NtStatus(0x0000_0000);
    pub const TIMEOUT: NtStatus = NtStatus(0x0000_0102);
    pub const UNSUCCESSFUL: NtStatus = NtStatus(0xC000_0001);
    pub const NOT_IMPLEMENTED: NtStatus = NtStatus(0xC000_0002);
    pub const ACCESS_VIOLATION: NtStatus = NtStatus(0xC000_0005);
    pub const INVALID_HANDLE: NtStatus = NtStatus(0xC000_0008);
    pub const INVALID_PARAMETER: NtStatus = NtStatus(0xC000_000D);
    pub const ACCESS_DENIED: NtStatus = NtStatus(0xC000_0022);
    pub const INTEGER_OVERFLOW: NtStatus = NtStatus(0xC000_0095);
    pub const INVALID_PARAMETER_1: NtStatus = NtStatus(0xC000_00EF);
    pub const INVALID_PARAMETER_2: NtStatus = NtStatus(0xC000_00F0);
    pub const INVALID_PARAMETER_3: NtStatus = NtStatus(0xC000_00F1);
    pub const INVALID_PARAMETER_4: NtStatus = NtStatus(0xC000_00F2);
    pub const INVALID_PARAMETER_5: NtStatus = NtStatus(0xC000_00F3);
    pub const INVALID_PARAMETER_6: NtStatus = NtStatus(0xC000_00F4);
    pub const INVALID_PARAMETER_7: NtStatus = NtStatus(0xC000_00F5);
    pub const INVALID_PARAMETER_8: NtStatus = NtStatus(0xC000_00F6);
    pub const INVALID_PARAMETER_9: NtStatus = NtStatus(0xC000_00F7);
    pub const INVALID_PARAMETER_10: NtStatus = NtStatus(0xC000_00F8);
    pub const INVALID_PARAMETER_11: NtStatus = NtStatus(0xC000_00F9);
    pub const INVALID_PARAMETER_12: NtStatus = NtStatus(0xC000_00FA);

    /// Wraps a raw status code
    pub const fn from_raw(code: u32) -> Self {
        NtStatus(code)
    }

    /// Returns the raw status code
    pub const fn code(self) -> u32 {
        self.0
    }

    /// `STATUS_WAIT_n` for a satisfied wait on object `index`
    pub const fn wait(index: u32) -> Self {
        NtStatus(index)
    }

    /// `STATUS_INVALID_PARAMETER_n` for argument `position` (1-based)
    ///
    /// Positions beyond 12 have no dedicated code and map to the generic
    /// `STATUS_INVALID_PARAMETER`.
    pub const fn invalid_parameter(position: u8) -> Self {
        match position {
            1..=12 => NtStatus(Self::INVALID_PARAMETER_1.0 + position as u32 - 1),
            _ => Self::INVALID_PARAMETER,
        }
    }

    /// `NT_SUCCESS`: success, informational and wait codes
    pub const fn is_success(self) -> bool {
        (self.0 as i32) >= 0
    }

    /// Error severity (top two bits set)
    pub const fn is_error(self) -> bool {
        self.0 >> 30 == 0b11
    }

    /// The object index of a `STATUS_WAIT_n` code
    pub fn wait_index(self) -> Option<u32> {
        (self.0 < MAX_WAIT_OBJECTS as u32).then_some(self.0)
    }
}

impl From<FacilityError> for NtStatus {
    fn from(error: FacilityError) -> Self {
        match error {
            FacilityError::BadDescriptor => NtStatus::INVALID_HANDLE,
            FacilityError::Fault => NtStatus::ACCESS_VIOLATION,
            FacilityError::InvalidArgument => NtStatus::INVALID_PARAMETER,
            FacilityError::TimedOut => NtStatus::TIMEOUT,
            FacilityError::Overflow => NtStatus::INTEGER_OVERFLOW,
            FacilityError::PermissionDenied => NtStatus::ACCESS_DENIED,
            FacilityError::Unsupported => NtStatus::NOT_IMPLEMENTED,
            FacilityError::Other(_) => NtStatus::UNSUCCESSFUL,
        }
    }
}

impl fmt::Display for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}
