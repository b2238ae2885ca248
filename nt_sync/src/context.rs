//! The facility connection
//!
//! Every NT operation is a method on [`NtSync`], which owns the facility
//! and the clock used to encode timeouts. Open one per process and share it
//! by reference.

use crate::{Handle, NtResult};
use log::debug;
use ntsync_api::{Clock, SyncFacility, SystemClock};
use ntsync_device::{DeviceConfig, DeviceError, NtsyncDevice};

/// An open synchronization facility
#[derive(Debug)]
pub struct NtSync<F, C = SystemClock> {
    facility: F,
    clock: C,
}

impl<F: SyncFacility> NtSync<F> {
    /// Wraps a facility, reading the host realtime clock for timeouts
    pub fn new(facility: F) -> Self {
        Self {
            facility,
            clock: SystemClock,
        }
    }
}

impl NtSync<NtsyncDevice> {
    /// Opens the ntsync device described by `config`
    pub fn open(config: &DeviceConfig) -> Result<Self, DeviceError> {
        NtsyncDevice::open(config).map(Self::new)
    }

    /// Closes the device, reporting a failing `close(2)`
    pub fn shutdown(self) -> Result<(), DeviceError> {
        self.facility.shutdown()
    }
}

impl<F: SyncFacility, C: Clock> NtSync<F, C> {
    /// Replaces the clock used to encode timeouts
    pub fn with_clock<C2: Clock>(self, clock: C2) -> NtSync<F, C2> {
        NtSync {
            facility: self.facility,
            clock,
        }
    }

    /// Returns the underlying facility
    pub fn facility(&self) -> &F {
        &self.facility
    }

    /// Returns the clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Closes a handle (`NtClose`)
    ///
    /// The handle is consumed whether or not the facility reports an error.
    pub fn close(&self, handle: Handle) -> NtResult<()> {
        debug!("closing {}", handle);
        self.facility.close(handle.object())?;
        Ok(())
    }
}
