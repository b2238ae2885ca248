//! `<linux/ntsync.h>` ABI
//!
//! Argument structures and ioctl request numbers, laid out exactly as the
//! driver expects them.

use core::mem::size_of;
use serde::{Deserialize, Serialize};

/// Maximum number of objects in a single wait request
pub const MAX_WAIT_OBJECTS: usize = 64;

/// Interpret the wait deadline against `CLOCK_REALTIME` instead of
/// `CLOCK_MONOTONIC`
pub const NTSYNC_WAIT_REALTIME: u32 = 0x1;

/// Semaphore state, used both to create and to read a semaphore
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemaphoreArgs {
    /// Current count
    pub count: u32,
    /// Maximum count
    pub max: u32,
}

/// Event state, used both to create and to read an event
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventArgs {
    /// Non-zero for a manual-reset event
    pub manual: u32,
    /// Non-zero if the event is signaled
    pub signaled: u32,
}

/// Wait request
///
/// `objs` is a user pointer to `count` object descriptors. On success the
/// driver stores the satisfying index in `index`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitArgs {
    /// Absolute deadline in nanoseconds, `u64::MAX` for none
    pub timeout: u64,
    /// Pointer to the object descriptor array
    pub objs: u64,
    /// Number of descriptors
    pub count: u32,
    /// Satisfying index (out)
    pub index: u32,
    /// `NTSYNC_WAIT_*` flags
    pub flags: u32,
    /// Owner identifier for mutex objects
    pub owner: u32,
    /// Optional alert event descriptor
    pub alert: u32,
    /// Padding
    pub pad: u32,
}

const NTSYNC_IOC_MAGIC: u32 = b'N' as u32;

const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = 8;
const IOC_SIZESHIFT: u32 = 16;
const IOC_DIRSHIFT: u32 = 30;

const IOC_WRITE: u32 = 1;
const IOC_READ: u32 = 2;

/// Encodes an ioctl request number (asm-generic layout)
const fn ioc(dir: u32, nr: u32, size: usize) -> u32 {
    (dir << IOC_DIRSHIFT)
        | (NTSYNC_IOC_MAGIC << IOC_TYPESHIFT)
        | (nr << IOC_NRSHIFT)
        | ((size as u32) << IOC_SIZESHIFT)
}

const fn iow(nr: u32, size: usize) -> u32 {
    ioc(IOC_WRITE, nr, size)
}

const fn ior(nr: u32, size: usize) -> u32 {
    ioc(IOC_READ, nr, size)
}

const fn iowr(nr: u32, size: usize) -> u32 {
    ioc(IOC_READ | IOC_WRITE, nr, size)
}

// Device requests
pub const NTSYNC_IOC_CREATE_SEM: u32 = iow(0x80, size_of::<SemaphoreArgs>());
pub const NTSYNC_IOC_WAIT_ANY: u32 = iowr(0x82, size_of::<WaitArgs>());
pub const NTSYNC_IOC_WAIT_ALL: u32 = iowr(0x83, size_of::<WaitArgs>());
pub const NTSYNC_IOC_CREATE_EVENT: u32 = iow(0x87, size_of::<EventArgs>());

// Object requests
pub const NTSYNC_IOC_SEM_RELEASE: u32 = iowr(0x81, size_of::<u32>());
pub const NTSYNC_IOC_EVENT_SET: u32 = ior(0x88, size_of::<u32>());
pub const NTSYNC_IOC_EVENT_RESET: u32 = ior(0x89, size_of::<u32>());
pub const NTSYNC_IOC_EVENT_PULSE: u32 = ior(0x8a, size_of::<u32>());
pub const NTSYNC_IOC_SEM_READ: u32 = ior(0x8b, size_of::<SemaphoreArgs>());
pub const NTSYNC_IOC_EVENT_READ: u32 = ior(0x8d, size_of::<EventArgs>());
