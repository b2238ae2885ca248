//! # Win32 Synchronization
//!
//! `CreateSemaphore`, `CreateEvent`, `WaitForMultipleObjects` and friends,
//! as thin wrappers over [`nt_sync`].
//!
//! Calls return `Result`s; the Win32 error of a failure is also stored in a
//! per-thread slot read by [`get_last_error`], so code ported from Win32
//! can keep its error handling shape.
//!
//! ## Example
//!
//! ```
//! use win32_sync::{Win32, WaitResult, INFINITE};
//! use sim_ntsync::SimulatedFacility;
//!
//! let win32 = Win32::new(SimulatedFacility::new());
//! let event = win32.create_event(None, true, false, None).unwrap();
//!
//! win32.set_event(&event).unwrap();
//! assert_eq!(win32.wait_for_single_object(&event, INFINITE), Ok(WaitResult::Object(0)));
//! win32.close_handle(event).unwrap();
//! ```

pub mod constants;
pub mod facade;
pub mod last_error;

pub use constants::{
    CREATE_EVENT_INITIAL_SET, CREATE_EVENT_MANUAL_RESET, INFINITE, MAXIMUM_WAIT_OBJECTS,
    WAIT_FAILED, WAIT_OBJECT_0, WAIT_TIMEOUT,
};
pub use facade::{SecurityAttributes, WaitResult, Win32, Win32Result};
pub use last_error::{get_last_error, set_last_error};
pub use nt_sync::{AccessMask, Handle, Win32Error};
