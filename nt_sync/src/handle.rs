//! Handles
//!
//! A handle pairs the facility's object identifier with the rights granted
//! when it was created. Rights are checked here, before any request is
//! submitted.

use crate::{AccessMask, NtError, NtResult};
use log::debug;
use ntsync_api::ObjectId;
use std::fmt;

/// An owned reference to a facility object
///
/// Handles are not `Clone`: each one owns its object identifier and is
/// consumed by [`NtSync::close`](crate::NtSync::close). Share one between
/// threads by reference or through an `Arc`.
#[derive(Debug, PartialEq, Eq)]
pub struct Handle {
    object: ObjectId,
    access: AccessMask,
}

impl Handle {
    pub(crate) fn new(object: ObjectId, access: AccessMask) -> Self {
        Self { object, access }
    }

    /// Builds a handle around an existing object identifier
    ///
    /// This is how several handles with different rights can refer to one
    /// object.
    ///
    /// # Safety
    ///
    /// `object` must name an open facility object for as long as the handle
    /// is used. Closing any handle to the object closes it for all of them,
    /// after which the identifier may be reused by an unrelated descriptor.
    pub unsafe fn from_raw(object: ObjectId, access: AccessMask) -> Self {
        Self { object, access }
    }

    /// The facility object identifier
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// The rights granted at creation
    pub fn access(&self) -> AccessMask {
        self.access
    }

    /// Returns true if every right in `rights` was granted
    pub fn has_access(&self, rights: AccessMask) -> bool {
        self.access.contains(rights)
    }

    /// Fails with [`NtError::AccessDenied`] unless `rights` were granted
    pub(crate) fn require(&self, rights: AccessMask) -> NtResult<()> {
        if self.has_access(rights) {
            Ok(())
        } else {
            debug!(
                "{} denied: needs {:#x}, has {:#x}",
                self,
                rights.bits(),
                self.access.bits()
            );
            Err(NtError::AccessDenied)
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle({}, {:#x})", self.object, self.access.bits())
    }
}

/// Object attributes for named or secured objects
///
/// Creation accepts these for signature fidelity; passing any is rejected
/// with [`NtError::NotImplemented`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectAttributes {
    /// Object name in the object-manager namespace
    pub name: Option<String>,
    /// Self-relative security descriptor
    pub security_descriptor: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        let handle = Handle::new(ObjectId::from_raw(3), AccessMask::SYNCHRONIZE);
        assert_eq!(handle.require(AccessMask::SYNCHRONIZE), Ok(()));
        assert_eq!(
            handle.require(AccessMask::MODIFY_STATE),
            Err(NtError::AccessDenied)
        );
        assert_eq!(
            handle.require(AccessMask::SYNCHRONIZE | AccessMask::QUERY_STATE),
            Err(NtError::AccessDenied)
        );
    }

    #[test]
    fn test_aliased_handles() {
        let object = ObjectId::from_raw(5);
        // SAFETY: never used against a facility.
        let reader = unsafe { Handle::from_raw(object, AccessMask::QUERY_STATE) };
        let writer = unsafe { Handle::from_raw(object, AccessMask::MODIFY_STATE) };

        assert_eq!(reader.object(), writer.object());
        assert!(reader.has_access(AccessMask::QUERY_STATE));
        assert!(!writer.has_access(AccessMask::QUERY_STATE));
    }

    #[test]
    fn test_display() {
        let handle = Handle::new(ObjectId::from_raw(3), AccessMask::EVENT_ALL_ACCESS);
        assert_eq!(handle.to_string(), "handle(obj#3, 0x1f0003)");
    }

    #[test]
    fn test_handle_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Handle>();
    }
}
