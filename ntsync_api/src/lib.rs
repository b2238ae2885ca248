//! # ntsync API
//!
//! This crate defines the boundary between the NT emulation layer and the
//! Linux `ntsync` driver.
//!
//! ## Philosophy
//!
//! The driver provides **mechanisms**, the layer above provides NT policy:
//! - Object creation (semaphores, events) returning kernel identifiers
//! - Per-object requests (release, set, reset, pulse, read state)
//! - A single atomic wait over up to 64 objects
//!
//! ## Design Goals
//!
//! 1. **Testability**: The facility is a trait, so a simulated driver can
//!    stand in for `/dev/ntsync`
//! 2. **Explicitness**: Deadlines, clocks and errnos are values, not ambient
//!    process state
//! 3. **Binary fidelity**: The argument structures match `<linux/ntsync.h>`
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - An NT API (no access rights, no NTSTATUS)
//! - A mutex interface (the driver's mutex objects are not exposed)

pub mod error;
pub mod facility;
pub mod time;
pub mod uapi;

pub use error::{ClockError, FacilityError};
pub use facility::{FacilityResult, ObjectId, SyncFacility, WaitMode};
pub use time::{Clock, Deadline, Duration, Instant, SystemClock};
pub use uapi::{EventArgs, SemaphoreArgs, WaitArgs, MAX_WAIT_OBJECTS};
