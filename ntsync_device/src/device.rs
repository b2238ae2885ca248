//! `/dev/ntsync` backend

use crate::DeviceConfig;
use log::{debug, trace, warn};
use ntsync_api::uapi::{
    NTSYNC_IOC_CREATE_EVENT, NTSYNC_IOC_CREATE_SEM, NTSYNC_IOC_EVENT_PULSE,
    NTSYNC_IOC_EVENT_READ, NTSYNC_IOC_EVENT_RESET, NTSYNC_IOC_EVENT_SET,
    NTSYNC_IOC_SEM_READ, NTSYNC_IOC_SEM_RELEASE, NTSYNC_IOC_WAIT_ALL, NTSYNC_IOC_WAIT_ANY,
    NTSYNC_WAIT_REALTIME,
};
use ntsync_api::{
    Deadline, EventArgs, FacilityError, FacilityResult, ObjectId, SemaphoreArgs, SyncFacility,
    WaitArgs, WaitMode,
};
use std::fs::OpenOptions;
use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors opening or closing the device
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device could not be opened
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Closing the device descriptor failed
    #[error("Failed to close ntsync device: {0}")]
    Close(FacilityError),
}

/// An open `/dev/ntsync` control descriptor
///
/// Object-creation and wait requests go to this descriptor; per-object
/// requests go to the object descriptors it hands out.
#[derive(Debug)]
pub struct NtsyncDevice {
    fd: OwnedFd,
    path: PathBuf,
}

impl NtsyncDevice {
    /// Opens the device described by `config`
    pub fn open(config: &DeviceConfig) -> Result<Self, DeviceError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(config.custom_flags())
            .open(config.path())
            .map_err(|source| {
                warn!("cannot open {}: {}", config.path().display(), source);
                DeviceError::Open {
                    path: config.path().to_path_buf(),
                    source,
                }
            })?;

        let fd = OwnedFd::from(file);
        debug!("opened {} as fd {}", config.path().display(), fd.as_raw_fd());

        Ok(Self {
            fd,
            path: config.path().to_path_buf(),
        })
    }

    /// Returns the device path
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Closes the control descriptor, reporting a failing `close(2)`
    ///
    /// Dropping the device also closes it, but silently.
    pub fn shutdown(self) -> Result<(), DeviceError> {
        let raw = self.fd.into_raw_fd();
        debug!("closing {} (fd {})", self.path.display(), raw);
        close_raw(raw).map_err(DeviceError::Close)
    }

    fn ioctl<T>(&self, fd: RawFd, request: u32, arg: &mut T) -> FacilityResult<i32> {
        // SAFETY: `arg` is a live, exclusively borrowed value whose layout is
        // the one encoded in `request`.
        let ret = unsafe { libc::ioctl(fd, request as _, arg as *mut T) };
        if ret == -1 {
            return Err(FacilityError::last_os_error());
        }
        Ok(ret)
    }
}

fn close_raw(fd: RawFd) -> FacilityResult<()> {
    // SAFETY: the caller gives up ownership of `fd`.
    if unsafe { libc::close(fd) } == -1 {
        return Err(FacilityError::last_os_error());
    }
    Ok(())
}

impl AsRawFd for NtsyncDevice {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl SyncFacility for NtsyncDevice {
    fn create_semaphore(&self, args: SemaphoreArgs) -> FacilityResult<ObjectId> {
        let mut args = args;
        let fd = self.ioctl(self.fd.as_raw_fd(), NTSYNC_IOC_CREATE_SEM, &mut args)?;
        trace!("create_sem count={} max={} -> fd {}", args.count, args.max, fd);
        Ok(ObjectId::from_raw(fd))
    }

    fn release_semaphore(&self, semaphore: ObjectId, count: u32) -> FacilityResult<u32> {
        // In: amount to add. Out: count before the release.
        let mut value = count;
        self.ioctl(semaphore.as_raw(), NTSYNC_IOC_SEM_RELEASE, &mut value)?;
        trace!("sem_release {} by {} (previous {})", semaphore, count, value);
        Ok(value)
    }

    fn read_semaphore(&self, semaphore: ObjectId) -> FacilityResult<SemaphoreArgs> {
        let mut args = SemaphoreArgs::default();
        self.ioctl(semaphore.as_raw(), NTSYNC_IOC_SEM_READ, &mut args)?;
        trace!("sem_read {} -> {:?}", semaphore, args);
        Ok(args)
    }

    fn create_event(&self, args: EventArgs) -> FacilityResult<ObjectId> {
        let mut args = args;
        let fd = self.ioctl(self.fd.as_raw_fd(), NTSYNC_IOC_CREATE_EVENT, &mut args)?;
        trace!("create_event manual={} signaled={} -> fd {}", args.manual, args.signaled, fd);
        Ok(ObjectId::from_raw(fd))
    }

    fn set_event(&self, event: ObjectId) -> FacilityResult<bool> {
        let mut previous: u32 = 0;
        self.ioctl(event.as_raw(), NTSYNC_IOC_EVENT_SET, &mut previous)?;
        trace!("event_set {} (previous {})", event, previous);
        Ok(previous != 0)
    }

    fn reset_event(&self, event: ObjectId) -> FacilityResult<bool> {
        let mut previous: u32 = 0;
        self.ioctl(event.as_raw(), NTSYNC_IOC_EVENT_RESET, &mut previous)?;
        trace!("event_reset {} (previous {})", event, previous);
        Ok(previous != 0)
    }

    fn pulse_event(&self, event: ObjectId) -> FacilityResult<bool> {
        let mut previous: u32 = 0;
        self.ioctl(event.as_raw(), NTSYNC_IOC_EVENT_PULSE, &mut previous)?;
        trace!("event_pulse {} (previous {})", event, previous);
        Ok(previous != 0)
    }

    fn read_event(&self, event: ObjectId) -> FacilityResult<EventArgs> {
        let mut args = EventArgs::default();
        self.ioctl(event.as_raw(), NTSYNC_IOC_EVENT_READ, &mut args)?;
        trace!("event_read {} -> {:?}", event, args);
        Ok(args)
    }

    fn wait(
        &self,
        objects: &[ObjectId],
        mode: WaitMode,
        deadline: Deadline,
    ) -> FacilityResult<u32> {
        let count = u32::try_from(objects.len()).map_err(|_| FacilityError::InvalidArgument)?;
        let mut args = WaitArgs {
            timeout: deadline.as_raw(),
            objs: objects.as_ptr() as u64,
            count,
            flags: NTSYNC_WAIT_REALTIME,
            ..WaitArgs::default()
        };
        let request = match mode {
            WaitMode::Any => NTSYNC_IOC_WAIT_ANY,
            WaitMode::All => NTSYNC_IOC_WAIT_ALL,
        };

        trace!("wait {:?} on {} objects, deadline {}", mode, count, deadline.as_raw());
        self.ioctl(self.fd.as_raw_fd(), request, &mut args)?;
        Ok(args.index)
    }

    fn close(&self, object: ObjectId) -> FacilityResult<()> {
        trace!("close {}", object);
        close_raw(object.as_raw())
    }
}
