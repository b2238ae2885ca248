//! Waits
//!
//! `NtWaitForSingleObject` and `NtWaitForMultipleObjects`. Every handle is
//! checked for `SYNCHRONIZE` before a single request carrying all object
//! identifiers is submitted; the facility performs the wait atomically.

use crate::timeout::encode_deadline;
use crate::{AccessMask, Handle, NtError, NtResult, NtStatus, NtSync, NtTimeout};
use log::trace;
use ntsync_api::{Clock, FacilityError, ObjectId, SyncFacility, WaitMode, MAX_WAIT_OBJECTS};
use serde::{Deserialize, Serialize};

/// `WAIT_TYPE`
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaitType {
    /// Satisfied when every object is available at once
    WaitAll = 0,
    /// Satisfied by the first available object
    WaitAny = 1,
}

impl From<WaitType> for WaitMode {
    fn from(wait_type: WaitType) -> Self {
        match wait_type {
            WaitType::WaitAll => WaitMode::All,
            WaitType::WaitAny => WaitMode::Any,
        }
    }
}

/// How a wait completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaitOutcome {
    /// The object at this index satisfied the wait (always 0 for
    /// [`WaitType::WaitAll`])
    Satisfied(u32),
    /// The timeout expired first
    TimedOut,
}

impl WaitOutcome {
    /// `STATUS_WAIT_n` or `STATUS_TIMEOUT`
    pub fn status(self) -> NtStatus {
        match self {
            WaitOutcome::Satisfied(index) => NtStatus::wait(index),
            WaitOutcome::TimedOut => NtStatus::TIMEOUT,
        }
    }

    /// The satisfying index, if any
    pub fn index(self) -> Option<u32> {
        match self {
            WaitOutcome::Satisfied(index) => Some(index),
            WaitOutcome::TimedOut => None,
        }
    }
}

/// Object identifiers of one wait request
struct WaitList {
    objects: [ObjectId; MAX_WAIT_OBJECTS],
    len: usize,
}

impl WaitList {
    /// Collects identifiers, failing on the first handle without `SYNCHRONIZE`
    fn collect(handles: &[&Handle]) -> NtResult<Self> {
        let mut list = WaitList {
            objects: [ObjectId::from_raw(-1); MAX_WAIT_OBJECTS],
            len: 0,
        };
        for (slot, handle) in list.objects.iter_mut().zip(handles) {
            handle.require(AccessMask::SYNCHRONIZE)?;
            *slot = handle.object();
            list.len += 1;
        }
        Ok(list)
    }

    fn as_slice(&self) -> &[ObjectId] {
        &self.objects[..self.len]
    }
}

impl<F: SyncFacility, C: Clock> NtSync<F, C> {
    /// Waits on one object (`NtWaitForSingleObject`)
    ///
    /// `timeout` of `None` waits forever. Alertable waits are not
    /// supported.
    pub fn wait_for_single_object(
        &self,
        handle: &Handle,
        alertable: bool,
        timeout: Option<NtTimeout>,
    ) -> NtResult<WaitOutcome> {
        self.wait_for_multiple_objects(&[handle], WaitType::WaitAny, alertable, timeout)
    }

    /// Waits on up to 64 objects (`NtWaitForMultipleObjects`)
    ///
    /// A timeout is an outcome, not an error.
    pub fn wait_for_multiple_objects(
        &self,
        handles: &[&Handle],
        wait_type: WaitType,
        alertable: bool,
        timeout: Option<NtTimeout>,
    ) -> NtResult<WaitOutcome> {
        if handles.is_empty() || handles.len() > MAX_WAIT_OBJECTS {
            return Err(NtError::InvalidParameter(1));
        }
        if alertable {
            return Err(NtError::NotImplemented);
        }
        let list = WaitList::collect(handles)?;
        let deadline = encode_deadline(timeout, self.clock())?;

        trace!(
            "{:?} on {} objects, deadline {:#x}",
            wait_type,
            list.len,
            deadline.as_raw()
        );
        match self
            .facility()
            .wait(list.as_slice(), wait_type.into(), deadline)
        {
            Ok(index) if (index as usize) < list.len => Ok(WaitOutcome::Satisfied(index)),
            Ok(index) => Err(NtError::WaitIndexOutOfRange {
                index,
                count: list.len,
            }),
            Err(FacilityError::TimedOut) => Ok(WaitOutcome::TimedOut),
            Err(error) => Err(NtError::Facility(error)),
        }
    }
}
