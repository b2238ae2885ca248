//! Synchronization facility trait and object identifiers

use crate::{Deadline, EventArgs, FacilityError, SemaphoreArgs};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Result type for facility requests
pub type FacilityResult<T> = Result<T, FacilityError>;

/// Kernel-assigned object identifier
///
/// For the real driver this is the file descriptor returned by the create
/// request. The layout matches the `__u32` descriptors the driver reads from
/// a wait request's object array.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(i32);

impl ObjectId {
    /// Wraps a raw identifier
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier
    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// How a multi-object wait is satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaitMode {
    /// Satisfied by the first available object
    Any,
    /// Satisfied only when every object is available at the same time
    All,
}

/// The synchronization facility
///
/// This is the narrow request interface of the kernel driver. Multiple
/// implementations are possible:
/// - The `/dev/ntsync` character device
/// - A simulated facility (for testing)
///
/// # Contract
///
/// - Requests take `&self`: the facility is shared by every thread of the
///   process and provides its own mutual exclusion.
/// - Count limits, atomic multi-object acquisition, auto-reset consumption
///   and pulse semantics are the facility's responsibility.
/// - A failing request returns the errno class it failed with, captured
///   before any other call can overwrite it.
pub trait SyncFacility {
    /// Creates a semaphore with the given count and maximum
    fn create_semaphore(&self, args: SemaphoreArgs) -> FacilityResult<ObjectId>;

    /// Adds `count` to a semaphore
    ///
    /// Returns the count before the release. Fails with
    /// [`FacilityError::Overflow`] if the result would exceed the maximum.
    fn release_semaphore(&self, semaphore: ObjectId, count: u32) -> FacilityResult<u32>;

    /// Reads a semaphore's count and maximum
    fn read_semaphore(&self, semaphore: ObjectId) -> FacilityResult<SemaphoreArgs>;

    /// Creates an event
    fn create_event(&self, args: EventArgs) -> FacilityResult<ObjectId>;

    /// Signals an event, returning the previous state
    fn set_event(&self, event: ObjectId) -> FacilityResult<bool>;

    /// Unsignals an event, returning the previous state
    fn reset_event(&self, event: ObjectId) -> FacilityResult<bool>;

    /// Signals an event, releases the waiters already queued on it, and
    /// unsignals it again, returning the previous state
    fn pulse_event(&self, event: ObjectId) -> FacilityResult<bool>;

    /// Reads an event's type and state
    fn read_event(&self, event: ObjectId) -> FacilityResult<EventArgs>;

    /// Waits on a set of objects
    ///
    /// Returns the index of the satisfying object for [`WaitMode::Any`] and
    /// zero for [`WaitMode::All`]. Fails with [`FacilityError::TimedOut`]
    /// once `deadline` passes.
    fn wait(&self, objects: &[ObjectId], mode: WaitMode, deadline: Deadline)
        -> FacilityResult<u32>;

    /// Releases an object identifier
    fn close(&self, object: ObjectId) -> FacilityResult<()>;
}

impl<T: SyncFacility + ?Sized> SyncFacility for &T {
    fn create_semaphore(&self, args: SemaphoreArgs) -> FacilityResult<ObjectId> {
        (**self).create_semaphore(args)
    }

    fn release_semaphore(&self, semaphore: ObjectId, count: u32) -> FacilityResult<u32> {
        (**self).release_semaphore(semaphore, count)
    }

    fn read_semaphore(&self, semaphore: ObjectId) -> FacilityResult<SemaphoreArgs> {
        (**self).read_semaphore(semaphore)
    }

    fn create_event(&self, args: EventArgs) -> FacilityResult<ObjectId> {
        (**self).create_event(args)
    }

    fn set_event(&self, event: ObjectId) -> FacilityResult<bool> {
        (**self).set_event(event)
    }

    fn reset_event(&self, event: ObjectId) -> FacilityResult<bool> {
        (**self).reset_event(event)
    }

    fn pulse_event(&self, event: ObjectId) -> FacilityResult<bool> {
        (**self).pulse_event(event)
    }

    fn read_event(&self, event: ObjectId) -> FacilityResult<EventArgs> {
        (**self).read_event(event)
    }

    fn wait(
        &self,
        objects: &[ObjectId],
        mode: WaitMode,
        deadline: Deadline,
    ) -> FacilityResult<u32> {
        (**self).wait(objects, mode, deadline)
    }

    fn close(&self, object: ObjectId) -> FacilityResult<()> {
        (**self).close(object)
    }
}
