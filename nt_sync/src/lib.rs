//! # NT Synchronization
//!
//! NT semaphores, events and waits on top of the Linux `ntsync` driver.
//!
//! ## Philosophy
//!
//! The driver already implements the hard parts: counting limits, atomic
//! multi-object acquisition, auto-reset consumption and pulses. This crate
//! supplies the NT policy around it:
//! - Handles carry the rights granted at creation, checked before any
//!   request is submitted
//! - Arguments are validated with NT's positional parameter statuses
//! - Timeouts are converted from NT 100 ns units to realtime deadlines
//! - Facility errnos are translated to NTSTATUS and Win32 error codes
//!
//! ## Example
//!
//! ```
//! use nt_sync::{AccessMask, NtSync, NtTimeout, WaitOutcome};
//! use sim_ntsync::SimulatedFacility;
//!
//! let nt = NtSync::new(SimulatedFacility::new());
//! let sem = nt.create_semaphore(AccessMask::SEMAPHORE_ALL_ACCESS, None, 0, 2).unwrap();
//!
//! assert_eq!(nt.release_semaphore(&sem, 1).unwrap(), 0);
//! let outcome = nt.wait_for_single_object(&sem, false, Some(NtTimeout::POLL)).unwrap();
//! assert_eq!(outcome, WaitOutcome::Satisfied(0));
//!
//! nt.close(sem).unwrap();
//! ```
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - An object manager (no names, no security descriptors)
//! - A mutex or timer implementation
//! - An APC mechanism (alertable waits are rejected)

pub mod access;
pub mod context;
pub mod error;
pub mod event;
pub mod handle;
pub mod semaphore;
pub mod status;
pub mod timeout;
pub mod wait;
pub mod win32_error;

pub use access::AccessMask;
pub use context::NtSync;
pub use error::{NtError, NtResult};
pub use event::{EventBasicInformation, EventType, EVENT_BASIC_INFORMATION_CLASS};
pub use handle::{Handle, ObjectAttributes};
pub use semaphore::{SemaphoreBasicInformation, SEMAPHORE_BASIC_INFORMATION_CLASS};
pub use status::NtStatus;
pub use timeout::{encode_deadline, NtTimeout, INFINITE, NT_EPOCH_OFFSET};
pub use wait::{WaitOutcome, WaitType};
pub use win32_error::Win32Error;
