//! Access rights

use bitflags::bitflags;

bitflags! {
    /// Rights granted to a handle
    ///
    /// The object-specific bits mean the same for semaphores and events.
    /// Masks are stored as requested, unknown bits included.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessMask: u32 {
        /// Read the object's state
        const QUERY_STATE = 0x0000_0001;
        /// Release, set, reset or pulse the object
        const MODIFY_STATE = 0x0000_0002;

        const DELETE = 0x0001_0000;
        const READ_CONTROL = 0x0002_0000;
        const WRITE_DAC = 0x0004_0000;
        const WRITE_OWNER = 0x0008_0000;
        /// Wait on the object
        const SYNCHRONIZE = 0x0010_0000;

        const STANDARD_RIGHTS_REQUIRED = Self::DELETE.bits()
            | Self::READ_CONTROL.bits()
            | Self::WRITE_DAC.bits()
            | Self::WRITE_OWNER.bits();
    }
}

impl AccessMask {
    pub const SEMAPHORE_QUERY_STATE: AccessMask = AccessMask::QUERY_STATE;
    pub const SEMAPHORE_MODIFY_STATE: AccessMask = AccessMask::MODIFY_STATE;
    pub const SEMAPHORE_ALL_ACCESS: AccessMask = AccessMask::QUERY_STATE
        .union(AccessMask::MODIFY_STATE)
        .union(AccessMask::STANDARD_RIGHTS_REQUIRED)
        .union(AccessMask::SYNCHRONIZE);

    pub const EVENT_QUERY_STATE: AccessMask = AccessMask::QUERY_STATE;
    pub const EVENT_MODIFY_STATE: AccessMask = AccessMask::MODIFY_STATE;
    pub const EVENT_ALL_ACCESS: AccessMask = AccessMask::QUERY_STATE
        .union(AccessMask::MODIFY_STATE)
        .union(AccessMask::STANDARD_RIGHTS_REQUIRED)
        .union(AccessMask::SYNCHRONIZE);

    /// Builds a mask from a raw `ACCESS_MASK`, keeping unknown bits
    pub const fn from_raw(raw: u32) -> Self {
        AccessMask::from_bits_retain(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_access_values() {
        assert_eq!(AccessMask::STANDARD_RIGHTS_REQUIRED.bits(), 0x000F_0000);
        assert_eq!(AccessMask::SEMAPHORE_ALL_ACCESS.bits(), 0x001F_0003);
        assert_eq!(AccessMask::EVENT_ALL_ACCESS.bits(), 0x001F_0003);
    }

    #[test]
    fn test_raw_mask_is_kept_verbatim() {
        let mask = AccessMask::from_raw(0x8000_0001);
        assert_eq!(mask.bits(), 0x8000_0001);
        assert!(mask.contains(AccessMask::QUERY_STATE));
        assert!(!mask.contains(AccessMask::SYNCHRONIZE));
    }
}
