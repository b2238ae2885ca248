//! Per-thread last error
//!
//! Every failing facade call stores its code here. Successful calls leave
//! it alone, so the value is only meaningful right after a failure.

use nt_sync::Win32Error;
use std::cell::Cell;

thread_local! {
    static LAST_ERROR: Cell<u32> = const { Cell::new(0) };
}

/// Returns the calling thread's last error (`GetLastError`)
pub fn get_last_error() -> Win32Error {
    Win32Error::from_raw(LAST_ERROR.with(Cell::get))
}

/// Sets the calling thread's last error (`SetLastError`)
pub fn set_last_error(error: Win32Error) {
    LAST_ERROR.with(|slot| slot.set(error.code()));
}
