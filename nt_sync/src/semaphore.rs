//! Semaphores
//!
//! `NtCreateSemaphore`, `NtReleaseSemaphore` and `NtQuerySemaphore`. Count
//! limits are enforced by the facility; this layer validates arguments and
//! rights before submitting anything.

use crate::{AccessMask, Handle, NtError, NtResult, NtSync, ObjectAttributes};
use log::debug;
use ntsync_api::{Clock, FacilityError, SemaphoreArgs, SyncFacility};
use serde::{Deserialize, Serialize};

/// `SemaphoreBasicInformation`, the only semaphore information class
pub const SEMAPHORE_BASIC_INFORMATION_CLASS: u32 = 0;

/// `SEMAPHORE_BASIC_INFORMATION`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemaphoreBasicInformation {
    pub current_count: i32,
    pub maximum_count: i32,
}

impl SemaphoreBasicInformation {
    /// Size of the structure in bytes
    pub const SIZE: usize = core::mem::size_of::<Self>();

    /// The structure in native byte order, as written to a caller buffer
    pub fn to_ne_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[..4].copy_from_slice(&self.current_count.to_ne_bytes());
        bytes[4..].copy_from_slice(&self.maximum_count.to_ne_bytes());
        bytes
    }
}

impl TryFrom<SemaphoreArgs> for SemaphoreBasicInformation {
    type Error = FacilityError;

    fn try_from(args: SemaphoreArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            current_count: i32::try_from(args.count).map_err(|_| FacilityError::Overflow)?,
            maximum_count: i32::try_from(args.max).map_err(|_| FacilityError::Overflow)?,
        })
    }
}

impl<F: SyncFacility, C: Clock> NtSync<F, C> {
    /// Creates a semaphore (`NtCreateSemaphore`)
    ///
    /// `maximum` must be positive and `initial` within `0..=maximum`. The
    /// handle carries `access` exactly as requested.
    pub fn create_semaphore(
        &self,
        access: AccessMask,
        attributes: Option<&ObjectAttributes>,
        initial: i32,
        maximum: i32,
    ) -> NtResult<Handle> {
        if attributes.is_some() {
            return Err(NtError::NotImplemented);
        }
        if maximum <= 0 {
            return Err(NtError::InvalidParameter(5));
        }
        if initial < 0 || initial > maximum {
            return Err(NtError::InvalidParameter(4));
        }

        let args = SemaphoreArgs {
            count: initial.unsigned_abs(),
            max: maximum.unsigned_abs(),
        };
        let object = self.facility().create_semaphore(args)?;
        debug!(
            "created semaphore {} ({}/{}), access {:#x}",
            object,
            initial,
            maximum,
            access.bits()
        );
        Ok(Handle::new(object, access))
    }

    /// Adds `count` to a semaphore (`NtReleaseSemaphore`)
    ///
    /// Returns the count before the release. A release past the maximum
    /// fails with `STATUS_INTEGER_OVERFLOW` and leaves the count unchanged.
    pub fn release_semaphore(&self, semaphore: &Handle, count: i32) -> NtResult<i32> {
        if count <= 0 {
            return Err(NtError::InvalidParameter(2));
        }
        semaphore.require(AccessMask::SEMAPHORE_MODIFY_STATE)?;

        let previous = self
            .facility()
            .release_semaphore(semaphore.object(), count.unsigned_abs())?;
        i32::try_from(previous).map_err(|_| NtError::Facility(FacilityError::Overflow))
    }

    /// Reads a semaphore's count and maximum (`NtQuerySemaphore`)
    pub fn query_semaphore(&self, semaphore: &Handle) -> NtResult<SemaphoreBasicInformation> {
        semaphore.require(AccessMask::SEMAPHORE_QUERY_STATE)?;

        let args = self.facility().read_semaphore(semaphore.object())?;
        Ok(SemaphoreBasicInformation::try_from(args)?)
    }

    /// Raw-buffer form of [`query_semaphore`](Self::query_semaphore)
    ///
    /// `class` must be [`SEMAPHORE_BASIC_INFORMATION_CLASS`] and `buffer`
    /// exactly [`SemaphoreBasicInformation::SIZE`] bytes; both are checked
    /// before the handle's rights. Returns the number of bytes written.
    pub fn query_semaphore_into(
        &self,
        semaphore: &Handle,
        class: u32,
        buffer: &mut [u8],
    ) -> NtResult<u32> {
        if class != SEMAPHORE_BASIC_INFORMATION_CLASS {
            return Err(NtError::InvalidParameter(2));
        }
        if buffer.len() != SemaphoreBasicInformation::SIZE {
            return Err(NtError::InvalidParameter(4));
        }

        let info = self.query_semaphore(semaphore)?;
        buffer.copy_from_slice(&info.to_ne_bytes());
        Ok(SemaphoreBasicInformation::SIZE as u32)
    }
}
