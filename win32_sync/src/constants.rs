//! Win32 constants

/// First object index returned by a satisfied wait
pub const WAIT_OBJECT_0: u32 = 0x0000_0000;
/// The wait timed out
pub const WAIT_TIMEOUT: u32 = 0x0000_0102;
/// The wait failed; see [`get_last_error`](crate::get_last_error)
pub const WAIT_FAILED: u32 = 0xFFFF_FFFF;

pub use nt_sync::INFINITE;

/// `CreateEventEx` flag: manual-reset event
pub const CREATE_EVENT_MANUAL_RESET: u32 = 0x0000_0001;
/// `CreateEventEx` flag: initially signaled
pub const CREATE_EVENT_INITIAL_SET: u32 = 0x0000_0002;

/// Win32 `MAXIMUM_WAIT_OBJECTS`
pub const MAXIMUM_WAIT_OBJECTS: usize = ntsync_api::MAX_WAIT_OBJECTS;
