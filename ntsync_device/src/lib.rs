//! # ntsync Device
//!
//! The [`SyncFacility`](ntsync_api::SyncFacility) implementation backed by
//! the Linux `/dev/ntsync` character device.
//!
//! The device is opened once per process and closed at teardown. Every
//! request is a single `ioctl`; the errno of a failing request is captured
//! immediately and returned as a [`FacilityError`](ntsync_api::FacilityError).

pub mod config;
pub mod device;

pub use config::{DeviceConfig, DEFAULT_DEVICE_PATH, DEVICE_PATH_ENV};
pub use device::{DeviceError, NtsyncDevice};
