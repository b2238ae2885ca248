//! Device configuration

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default location of the ntsync character device
pub const DEFAULT_DEVICE_PATH: &str = "/dev/ntsync";

/// Environment variable overriding the device path
pub const DEVICE_PATH_ENV: &str = "NTSYNC_DEVICE";

/// How to open the ntsync device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Path of the character device
    pub path: PathBuf,
    /// Open with `O_NONBLOCK`
    pub nonblocking: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DEVICE_PATH),
            nonblocking: true,
        }
    }
}

impl DeviceConfig {
    /// Builds the default configuration, honouring `NTSYNC_DEVICE`
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var_os(DEVICE_PATH_ENV))
    }

    fn from_env_value(value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => Self::default().with_path(path),
            _ => Self::default(),
        }
    }

    /// Sets the device path
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets whether the device is opened non-blocking
    pub fn with_nonblocking(mut self, nonblocking: bool) -> Self {
        self.nonblocking = nonblocking;
        self
    }

    /// Returns the device path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the `open(2)` flags beyond `O_RDWR`
    pub(crate) fn custom_flags(&self) -> i32 {
        let mut flags = libc::O_CLOEXEC;
        if self.nonblocking {
            flags |= libc::O_NONBLOCK;
        }
        flags
    }
}
