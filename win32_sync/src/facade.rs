//! Win32 synchronization calls
//!
//! Each call reshapes its arguments into the NT layer: default access
//! rights, flag decoding, millisecond timeouts. Named and secured objects
//! are rejected before anything reaches the facility.

use crate::constants::{
    CREATE_EVENT_INITIAL_SET, CREATE_EVENT_MANUAL_RESET, WAIT_FAILED, WAIT_OBJECT_0, WAIT_TIMEOUT,
};
use crate::last_error::set_last_error;
use log::debug;
use nt_sync::{
    AccessMask, EventType, Handle, NtResult, NtSync, NtTimeout, WaitOutcome, WaitType, Win32Error,
};
use ntsync_api::{Clock, SyncFacility, SystemClock};
use ntsync_device::{DeviceConfig, DeviceError, NtsyncDevice};
use serde::{Deserialize, Serialize};

/// Result type for Win32 calls
pub type Win32Result<T> = Result<T, Win32Error>;

/// `SECURITY_ATTRIBUTES`
///
/// Accepted for signature fidelity; passing any fails the call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityAttributes {
    pub security_descriptor: Option<Vec<u8>>,
    pub inherit_handle: bool,
}

/// A completed wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaitResult {
    /// `WAIT_OBJECT_0 + n`
    Object(u32),
    /// `WAIT_TIMEOUT`
    Timeout,
}

impl WaitResult {
    /// The `DWORD` a Win32 wait returns
    pub fn code(self) -> u32 {
        match self {
            WaitResult::Object(index) => WAIT_OBJECT_0 + index,
            WaitResult::Timeout => WAIT_TIMEOUT,
        }
    }

    /// The `DWORD` for a wait call's result, `WAIT_FAILED` on error
    pub fn code_of(result: &Win32Result<WaitResult>) -> u32 {
        match result {
            Ok(wait) => wait.code(),
            Err(_) => WAIT_FAILED,
        }
    }
}

impl From<WaitOutcome> for WaitResult {
    fn from(outcome: WaitOutcome) -> Self {
        match outcome {
            WaitOutcome::Satisfied(index) => WaitResult::Object(index),
            WaitOutcome::TimedOut => WaitResult::Timeout,
        }
    }
}

/// Records `error` as the thread's last error and returns it
fn fail<T>(error: Win32Error) -> Win32Result<T> {
    set_last_error(error);
    Err(error)
}

/// Translates an NT result, recording the last error on failure
fn check<T>(result: NtResult<T>) -> Win32Result<T> {
    result.or_else(|error| fail(error.win32_error()))
}

fn reject_named(attributes: Option<&SecurityAttributes>, name: Option<&str>) -> Win32Result<()> {
    if attributes.is_some() || name.is_some() {
        debug!("named or secured object requested: {:?}", name);
        return fail(Win32Error::INVALID_FUNCTION);
    }
    Ok(())
}

/// The Win32 calls, bound to one facility
#[derive(Debug)]
pub struct Win32<F, C = SystemClock> {
    nt: NtSync<F, C>,
}

impl<F: SyncFacility> Win32<F> {
    /// Wraps a facility
    pub fn new(facility: F) -> Self {
        Self {
            nt: NtSync::new(facility),
        }
    }
}

impl Win32<NtsyncDevice> {
    /// Opens the ntsync device
    pub fn init(config: &DeviceConfig) -> Result<Self, DeviceError> {
        NtSync::open(config).map(Self::from_nt)
    }

    /// Closes the ntsync device
    pub fn exit(self) -> Result<(), DeviceError> {
        self.nt.shutdown()
    }
}

impl<F: SyncFacility, C: Clock> Win32<F, C> {
    /// Wraps an existing NT context
    pub fn from_nt(nt: NtSync<F, C>) -> Self {
        Self { nt }
    }

    /// The NT context the calls go through
    pub fn nt(&self) -> &NtSync<F, C> {
        &self.nt
    }

    /// `CreateSemaphoreA`, with `SEMAPHORE_ALL_ACCESS`
    pub fn create_semaphore(
        &self,
        attributes: Option<&SecurityAttributes>,
        initial_count: i32,
        maximum_count: i32,
        name: Option<&str>,
    ) -> Win32Result<Handle> {
        self.create_semaphore_ex(
            attributes,
            initial_count,
            maximum_count,
            name,
            0,
            AccessMask::SEMAPHORE_ALL_ACCESS,
        )
    }

    /// `CreateSemaphoreExA`; `flags` is reserved and must be zero
    pub fn create_semaphore_ex(
        &self,
        attributes: Option<&SecurityAttributes>,
        initial_count: i32,
        maximum_count: i32,
        name: Option<&str>,
        flags: u32,
        access: AccessMask,
    ) -> Win32Result<Handle> {
        reject_named(attributes, name)?;
        if flags != 0 {
            return fail(Win32Error::INVALID_PARAMETER);
        }
        check(
            self.nt
                .create_semaphore(access, None, initial_count, maximum_count),
        )
    }

    /// `ReleaseSemaphore`, returning the previous count
    pub fn release_semaphore(&self, semaphore: &Handle, release_count: i32) -> Win32Result<i32> {
        check(self.nt.release_semaphore(semaphore, release_count))
    }

    /// `CreateEventA`, with `EVENT_ALL_ACCESS`
    pub fn create_event(
        &self,
        attributes: Option<&SecurityAttributes>,
        manual_reset: bool,
        initial_state: bool,
        name: Option<&str>,
    ) -> Win32Result<Handle> {
        let mut flags = 0;
        if manual_reset {
            flags |= CREATE_EVENT_MANUAL_RESET;
        }
        if initial_state {
            flags |= CREATE_EVENT_INITIAL_SET;
        }
        self.create_event_ex(attributes, name, flags, AccessMask::EVENT_ALL_ACCESS)
    }

    /// `CreateEventExA`
    pub fn create_event_ex(
        &self,
        attributes: Option<&SecurityAttributes>,
        name: Option<&str>,
        flags: u32,
        access: AccessMask,
    ) -> Win32Result<Handle> {
        reject_named(attributes, name)?;
        if flags & !(CREATE_EVENT_MANUAL_RESET | CREATE_EVENT_INITIAL_SET) != 0 {
            return fail(Win32Error::INVALID_PARAMETER);
        }

        let event_type = EventType::from_manual_reset(flags & CREATE_EVENT_MANUAL_RESET != 0);
        let initial_state = flags & CREATE_EVENT_INITIAL_SET != 0;
        check(self.nt.create_event(access, None, event_type, initial_state))
    }

    /// `SetEvent`
    pub fn set_event(&self, event: &Handle) -> Win32Result<()> {
        check(self.nt.set_event(event)).map(drop)
    }

    /// `ResetEvent`
    pub fn reset_event(&self, event: &Handle) -> Win32Result<()> {
        check(self.nt.reset_event(event)).map(drop)
    }

    /// `PulseEvent`
    #[deprecated(note = "pulsing races with waiters that are not yet queued; use set_event")]
    #[allow(deprecated)]
    pub fn pulse_event(&self, event: &Handle) -> Win32Result<()> {
        check(self.nt.pulse_event(event)).map(drop)
    }

    /// `WaitForSingleObject`
    pub fn wait_for_single_object(
        &self,
        handle: &Handle,
        milliseconds: u32,
    ) -> Win32Result<WaitResult> {
        self.wait_for_single_object_ex(handle, milliseconds, false)
    }

    /// `WaitForSingleObjectEx`
    pub fn wait_for_single_object_ex(
        &self,
        handle: &Handle,
        milliseconds: u32,
        alertable: bool,
    ) -> Win32Result<WaitResult> {
        let timeout = NtTimeout::from_win32_millis(milliseconds);
        check(self.nt.wait_for_single_object(handle, alertable, timeout)).map(WaitResult::from)
    }

    /// `WaitForMultipleObjects`
    pub fn wait_for_multiple_objects(
        &self,
        handles: &[&Handle],
        wait_all: bool,
        milliseconds: u32,
    ) -> Win32Result<WaitResult> {
        self.wait_for_multiple_objects_ex(handles, wait_all, milliseconds, false)
    }

    /// `WaitForMultipleObjectsEx`
    pub fn wait_for_multiple_objects_ex(
        &self,
        handles: &[&Handle],
        wait_all: bool,
        milliseconds: u32,
        alertable: bool,
    ) -> Win32Result<WaitResult> {
        let wait_type = if wait_all {
            WaitType::WaitAll
        } else {
            WaitType::WaitAny
        };
        let timeout = NtTimeout::from_win32_millis(milliseconds);
        check(
            self.nt
                .wait_for_multiple_objects(handles, wait_type, alertable, timeout),
        )
        .map(WaitResult::from)
    }

    /// `CloseHandle`
    pub fn close_handle(&self, handle: Handle) -> Win32Result<()> {
        check(self.nt.close(handle))
    }
}
