//! Deterministic fault injection for testing
//!
//! This module lets tests make the simulated facility fail specific
//! requests with specific errnos, to exercise the error translation paths
//! without a misbehaving driver.
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Faults fire in request order, no randomness
//! - **Composable**: Several faults can be combined in one plan
//! - **Test-focused**: Not intended for production use
//!
//! ## Example
//!
//! ```
//! use sim_ntsync::fault_injection::{FacilityFault, FaultPlan};
//! use sim_ntsync::request_audit::RequestKind;
//! use ntsync_api::FacilityError;
//!
//! let plan = FaultPlan::new()
//!     .with_fault(FacilityFault::FailNext {
//!         kind: RequestKind::CreateSemaphore,
//!         count: 1,
//!         error: FacilityError::Other(libc::EMFILE),
//!     });
//! ```

use crate::request_audit::RequestKind;
use ntsync_api::FacilityError;

/// A fault to inject into facility requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacilityFault {
    /// Fail the next `count` requests of `kind` with `error`
    FailNext {
        kind: RequestKind,
        count: usize,
        error: FacilityError,
    },

    /// Fail every request of `kind` with `error`
    FailAlways {
        kind: RequestKind,
        error: FacilityError,
    },
}

/// A plan describing all faults to inject
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    faults: Vec<FacilityFault>,
}

impl FaultPlan {
    /// Creates a new empty fault plan
    pub fn new() -> Self {
        Self { faults: Vec::new() }
    }

    /// Adds a fault to the plan
    pub fn with_fault(mut self, fault: FacilityFault) -> Self {
        self.faults.push(fault);
        self
    }

    /// Returns the faults in the plan
    pub fn faults(&self) -> &[FacilityFault] {
        &self.faults
    }
}

#[derive(Debug)]
struct ArmedFault {
    kind: RequestKind,
    remaining: Option<usize>,
    error: FacilityError,
}

/// Applies a [`FaultPlan`] to incoming requests
///
/// Faults are checked in plan order; the first armed fault matching the
/// request kind fires.
#[derive(Debug)]
pub struct FaultInjector {
    armed: Vec<ArmedFault>,
    injected: usize,
}

impl FaultInjector {
    /// Creates a new fault injector with the given plan
    pub fn new(plan: FaultPlan) -> Self {
        let armed = plan
            .faults
            .into_iter()
            .map(|fault| match fault {
                FacilityFault::FailNext { kind, count, error } => ArmedFault {
                    kind,
                    remaining: Some(count),
                    error,
                },
                FacilityFault::FailAlways { kind, error } => ArmedFault {
                    kind,
                    remaining: None,
                    error,
                },
            })
            .collect();

        Self { armed, injected: 0 }
    }

    /// Checks whether a request of `kind` should fail
    pub fn check(&mut self, kind: RequestKind) -> Result<(), FacilityError> {
        for fault in self.armed.iter_mut().filter(|f| f.kind == kind) {
            match &mut fault.remaining {
                Some(0) => continue,
                Some(remaining) => *remaining -= 1,
                None => {}
            }
            self.injected += 1;
            return Err(fault.error);
        }
        Ok(())
    }

    /// Returns the number of faults injected so far
    pub fn injected(&self) -> usize {
        self.injected
    }
}
