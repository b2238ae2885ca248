//! Events
//!
//! `NtCreateEvent`, `NtSetEvent`, `NtResetEvent`, `NtPulseEvent` and
//! `NtQueryEvent`. A notification event is manual-reset, a synchronization
//! event is auto-reset and is unsignaled by the wait it satisfies.

use crate::{AccessMask, Handle, NtError, NtResult, NtSync, ObjectAttributes};
use log::debug;
use ntsync_api::{Clock, EventArgs, SyncFacility};
use serde::{Deserialize, Serialize};

/// `EventBasicInformation`, the only event information class
pub const EVENT_BASIC_INFORMATION_CLASS: u32 = 0;

/// `EVENT_TYPE`
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Manual-reset: stays signaled until reset
    Notification = 0,
    /// Auto-reset: releases one waiter, then unsignals
    Synchronization = 1,
}

impl EventType {
    pub fn is_manual_reset(self) -> bool {
        self == EventType::Notification
    }

    pub fn from_manual_reset(manual: bool) -> Self {
        if manual {
            EventType::Notification
        } else {
            EventType::Synchronization
        }
    }
}

/// `EVENT_BASIC_INFORMATION`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBasicInformation {
    pub event_type: EventType,
    /// Non-zero if signaled
    pub event_state: i32,
}

impl EventBasicInformation {
    /// Size of the structure in bytes
    pub const SIZE: usize = core::mem::size_of::<Self>();

    /// The structure in native byte order, as written to a caller buffer
    pub fn to_ne_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[..4].copy_from_slice(&(self.event_type as u32).to_ne_bytes());
        bytes[4..].copy_from_slice(&self.event_state.to_ne_bytes());
        bytes
    }
}

impl From<EventArgs> for EventBasicInformation {
    fn from(args: EventArgs) -> Self {
        Self {
            event_type: EventType::from_manual_reset(args.manual != 0),
            event_state: i32::from(args.signaled != 0),
        }
    }
}

impl<F: SyncFacility, C: Clock> NtSync<F, C> {
    /// Creates an event (`NtCreateEvent`)
    pub fn create_event(
        &self,
        access: AccessMask,
        attributes: Option<&ObjectAttributes>,
        event_type: EventType,
        initial_state: bool,
    ) -> NtResult<Handle> {
        if attributes.is_some() {
            return Err(NtError::NotImplemented);
        }

        let args = EventArgs {
            manual: u32::from(event_type.is_manual_reset()),
            signaled: u32::from(initial_state),
        };
        let object = self.facility().create_event(args)?;
        debug!(
            "created {:?} event {} (signaled={}), access {:#x}",
            event_type,
            object,
            initial_state,
            access.bits()
        );
        Ok(Handle::new(object, access))
    }

    /// Signals an event (`NtSetEvent`), returning the previous state
    pub fn set_event(&self, event: &Handle) -> NtResult<bool> {
        event.require(AccessMask::EVENT_MODIFY_STATE)?;
        Ok(self.facility().set_event(event.object())?)
    }

    /// Unsignals an event (`NtResetEvent`), returning the previous state
    pub fn reset_event(&self, event: &Handle) -> NtResult<bool> {
        event.require(AccessMask::EVENT_MODIFY_STATE)?;
        Ok(self.facility().reset_event(event.object())?)
    }

    /// Releases the threads currently waiting on an event (`NtPulseEvent`)
    ///
    /// Returns the previous state. Waiters that arrive just after the pulse
    /// miss it, which is why the call is deprecated on Windows too.
    #[deprecated(note = "pulsing races with waiters that are not yet queued; use set_event")]
    pub fn pulse_event(&self, event: &Handle) -> NtResult<bool> {
        event.require(AccessMask::EVENT_MODIFY_STATE)?;
        Ok(self.facility().pulse_event(event.object())?)
    }

    /// Reads an event's type and state (`NtQueryEvent`)
    pub fn query_event(&self, event: &Handle) -> NtResult<EventBasicInformation> {
        event.require(AccessMask::EVENT_QUERY_STATE)?;
        let args = self.facility().read_event(event.object())?;
        Ok(EventBasicInformation::from(args))
    }

    /// Raw-buffer form of [`query_event`](Self::query_event)
    ///
    /// `class` must be [`EVENT_BASIC_INFORMATION_CLASS`] and `buffer`
    /// exactly [`EventBasicInformation::SIZE`] bytes; both are checked
    /// before the handle's rights. Returns the number of bytes written.
    pub fn query_event_into(
        &self,
        event: &Handle,
        class: u32,
        buffer: &mut [u8],
    ) -> NtResult<u32> {
        if class != EVENT_BASIC_INFORMATION_CLASS {
            return Err(NtError::InvalidParameter(2));
        }
        if buffer.len() != EventBasicInformation::SIZE {
            return Err(NtError::InvalidParameter(4));
        }

        let info = self.query_event(event)?;
        buffer.copy_from_slice(&info.to_ne_bytes());
        Ok(EventBasicInformation::SIZE as u32)
    }
}
