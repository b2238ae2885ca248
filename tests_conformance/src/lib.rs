//! Conformance Test Utilities
//!
//! This crate provides shared setup for the cross-crate conformance tests.
//!
//! ## Test Philosophy
//!
//! - **Driver semantics**: The simulated facility behaves like `/dev/ntsync`,
//!   so every test here should also hold against the real device
//! - **No side effects on rejection**: Argument and access failures are
//!   proven local by checking the request audit
//! - **Real concurrency**: Blocking tests use real threads, ordered through
//!   the facility's waiter count rather than sleeps

use nt_sync::{AccessMask, EventType, Handle, NtSync};
use ntsync_device::{DeviceConfig, NtsyncDevice};
use sim_ntsync::SimulatedFacility;

/// The context every conformance test runs against
pub type TestNt = NtSync<SimulatedFacility>;

/// Bootstrap helper for tests
///
/// Creates an NT context over a fresh simulated facility.
pub fn test_bootstrap() -> TestNt {
    NtSync::new(SimulatedFacility::new())
}

/// Opens the real device for tests that can use it
///
/// Returns `None`, after printing why, when the device is unavailable.
pub fn device_bootstrap() -> Option<NtSync<NtsyncDevice>> {
    match NtSync::open(&DeviceConfig::from_env()) {
        Ok(nt) => Some(nt),
        Err(e) => {
            eprintln!("skipping device test: {}", e);
            None
        }
    }
}

/// Creates a semaphore with full access
pub fn full_semaphore<F, C>(nt: &NtSync<F, C>, initial: i32, maximum: i32) -> Handle
where
    F: ntsync_api::SyncFacility,
    C: ntsync_api::Clock,
{
    match nt.create_semaphore(AccessMask::SEMAPHORE_ALL_ACCESS, None, initial, maximum) {
        Ok(handle) => handle,
        Err(e) => panic!("semaphore ({}/{}) creation failed: {}", initial, maximum, e),
    }
}

/// Creates an event with full access
pub fn full_event<F, C>(nt: &NtSync<F, C>, event_type: EventType, signaled: bool) -> Handle
where
    F: ntsync_api::SyncFacility,
    C: ntsync_api::Clock,
{
    match nt.create_event(AccessMask::EVENT_ALL_ACCESS, None, event_type, signaled) {
        Ok(handle) => handle,
        Err(e) => panic!("{:?} event creation failed: {}", event_type, e),
    }
}
