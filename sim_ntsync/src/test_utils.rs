//! Test utilities for concurrency tests
//!
//! This module provides helper functions for driving the simulated facility
//! from several threads.

use crate::fault_injection::FaultPlan;
use crate::SimulatedFacility;
use ntsync_api::{Deadline, FacilityResult, ObjectId, SyncFacility, WaitMode};
use std::thread::{Scope, ScopedJoinHandle};

/// How long helpers poll before giving up on a waiter
pub const SETTLE_LIMIT: std::time::Duration = std::time::Duration::from_secs(5);

/// Runs a test with a fault plan applied
///
/// This is a convenience helper that creates a facility with the given
/// fault plan and passes it to the test closure.
///
/// # Example
///
/// ```
/// use sim_ntsync::test_utils::with_fault_plan;
/// use sim_ntsync::fault_injection::{FacilityFault, FaultPlan};
/// use sim_ntsync::request_audit::RequestKind;
/// use ntsync_api::{FacilityError, SemaphoreArgs, SyncFacility};
///
/// with_fault_plan(
///     FaultPlan::new().with_fault(FacilityFault::FailNext {
///         kind: RequestKind::CreateSemaphore,
///         count: 1,
///         error: FacilityError::Fault,
///     }),
///     |facility| {
///         let args = SemaphoreArgs { count: 0, max: 1 };
///         assert_eq!(facility.create_semaphore(args), Err(FacilityError::Fault));
///         assert!(facility.create_semaphore(args).is_ok());
///     },
/// );
/// ```
pub fn with_fault_plan<F>(plan: FaultPlan, f: F)
where
    F: FnOnce(&SimulatedFacility),
{
    let facility = SimulatedFacility::new().with_fault_plan(plan);
    f(&facility);
}

/// Polls until `count` waiters are blocked in the facility
///
/// Returns false if that does not happen within `limit`. Tests use this to
/// order a state change after another thread has started waiting.
pub fn wait_for_waiters(
    facility: &SimulatedFacility,
    count: usize,
    limit: std::time::Duration,
) -> bool {
    const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(1);
    let start = std::time::Instant::now();

    while facility.waiter_count() < count {
        if start.elapsed() >= limit {
            return false;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    true
}

/// Spawns a thread that waits on `objects` without a deadline
///
/// Returns once the new waiter is blocked in the facility (or after
/// [`SETTLE_LIMIT`]), so a state change made afterwards is guaranteed to be
/// seen by it. Meant for waits that are expected to block.
pub fn spawn_waiter<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    facility: &'env SimulatedFacility,
    objects: Vec<ObjectId>,
    mode: WaitMode,
) -> ScopedJoinHandle<'scope, FacilityResult<u32>> {
    let queued = facility.waiter_count();
    let handle = scope.spawn(move || facility.wait(&objects, mode, Deadline::NEVER));
    wait_for_waiters(facility, queued + 1, SETTLE_LIMIT);
    handle
}
