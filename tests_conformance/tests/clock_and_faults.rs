//! Clock and Fault Conformance Tests
//!
//! These tests validate how external failures surface:
//! - Timed waits read the context clock; a failing clock fails only those
//! - Driver errnos translate to fixed NT status and Win32 error codes
//! - A driver reporting an impossible wait index is refused

use nt_sync::{EventType, NtError, NtStatus, NtSync, NtTimeout, WaitOutcome, Win32Error};
use ntsync_api::{
    ClockError, Deadline, Duration, EventArgs, FacilityError, FacilityResult, Instant, ObjectId,
    SemaphoreArgs, SyncFacility, WaitMode,
};
use sim_ntsync::clock::{FailingClock, FixedClock};
use sim_ntsync::fault_injection::{FacilityFault, FaultPlan};
use sim_ntsync::request_audit::{Request, RequestKind};
use sim_ntsync::test_utils::with_fault_plan;
use sim_ntsync::SimulatedFacility;
use tests_conformance::{full_event, full_semaphore};
use win32_sync::{WaitResult, Win32, WAIT_FAILED};

const NOW_SECS: u64 = 1_700_000_000;

#[test]
fn test_deadline_derived_from_context_clock() {
    let nt = NtSync::new(SimulatedFacility::new())
        .with_clock(FixedClock::at_unix_secs(NOW_SECS));
    let sem = full_semaphore(&nt, 1, 1);

    let timeout = NtTimeout::relative(Duration::from_millis(5));
    assert_eq!(
        nt.wait_for_single_object(&sem, false, Some(timeout)),
        Ok(WaitOutcome::Satisfied(0))
    );

    let now = Instant::EPOCH + Duration::from_secs(NOW_SECS);
    let expected = Deadline::at(now + Duration::from_millis(5));
    assert!(nt.facility().audit().has_request(|r| matches!(
        r,
        Request::Wait { deadline, mode: WaitMode::Any, .. } if *deadline == expected
    )));
}

#[test]
fn test_absolute_deadline_ignores_clock_value() {
    let nt = NtSync::new(SimulatedFacility::new())
        .with_clock(FixedClock::at_unix_secs(NOW_SECS));
    let event = full_event(&nt, EventType::Notification, true);

    let at = Instant::EPOCH + Duration::from_secs(NOW_SECS + 60);
    nt.wait_for_single_object(&event, false, Some(NtTimeout::absolute(at)))
        .unwrap();

    assert!(nt.facility().audit().has_request(|r| matches!(
        r,
        Request::Wait { deadline, .. } if deadline.as_raw() == at.as_nanos()
    )));
}

#[test]
fn test_failing_clock_fails_timed_waits_only() {
    let nt = NtSync::new(SimulatedFacility::new())
        .with_clock(FailingClock(ClockError::BeforeEpoch));
    let sem = full_semaphore(&nt, 2, 2);

    let err = nt
        .wait_for_single_object(&sem, false, Some(NtTimeout::POLL))
        .unwrap_err();
    assert_eq!(err, NtError::Clock(ClockError::BeforeEpoch));
    assert_eq!(err.status(), NtStatus::UNSUCCESSFUL);
    assert_eq!(err.win32_error(), Win32Error::GEN_FAILURE);
    assert_eq!(nt.facility().audit().count_kind(RequestKind::Wait), 0);

    // No timeout means no clock read
    assert_eq!(
        nt.wait_for_single_object(&sem, false, None),
        Ok(WaitOutcome::Satisfied(0))
    );
}

#[test]
fn test_errno_translation_table() {
    let table = [
        (libc::EBADF, NtStatus::INVALID_HANDLE, Win32Error::INVALID_HANDLE),
        (libc::EFAULT, NtStatus::ACCESS_VIOLATION, Win32Error::NOACCESS),
        (libc::EINVAL, NtStatus::INVALID_PARAMETER, Win32Error::INVALID_PARAMETER),
        (libc::EOVERFLOW, NtStatus::INTEGER_OVERFLOW, Win32Error::TOO_MANY_POSTS),
        (libc::EPERM, NtStatus::ACCESS_DENIED, Win32Error::ACCESS_DENIED),
        (libc::ENOSYS, NtStatus::NOT_IMPLEMENTED, Win32Error::INVALID_FUNCTION),
        (libc::EIO, NtStatus::UNSUCCESSFUL, Win32Error::GEN_FAILURE),
    ];

    for (errno, status, win32_error) in table {
        let plan = FaultPlan::new().with_fault(FacilityFault::FailNext {
            kind: RequestKind::SetEvent,
            count: 1,
            error: FacilityError::from_errno(errno),
        });
        with_fault_plan(plan, |facility| {
            let nt = NtSync::new(facility);
            let event = full_event(&nt, EventType::Synchronization, false);

            let err = nt.set_event(&event).unwrap_err();
            assert_eq!(err.status(), status, "errno {}", errno);
            assert_eq!(err.win32_error(), win32_error, "errno {}", errno);

            // The fault fired once
            assert_eq!(nt.set_event(&event), Ok(false));
        });
    }
}

#[test]
fn test_injected_wait_failure_through_win32() {
    let plan = FaultPlan::new().with_fault(FacilityFault::FailAlways {
        kind: RequestKind::Wait,
        error: FacilityError::Other(libc::EINTR),
    });
    let win32 = Win32::new(SimulatedFacility::new().with_fault_plan(plan));
    let event = win32.create_event(None, true, true, None).unwrap();

    let result = win32.wait_for_single_object(&event, 0);
    assert_eq!(result, Err(Win32Error::GEN_FAILURE));
    assert_eq!(WaitResult::code_of(&result), WAIT_FAILED);
    assert_eq!(win32_sync::get_last_error(), Win32Error::GEN_FAILURE);
}

/// Forwards to the simulator but reports a fixed wait index
struct MisreportingFacility {
    inner: SimulatedFacility,
    index: u32,
}

impl SyncFacility for MisreportingFacility {
    fn create_semaphore(&self, args: SemaphoreArgs) -> FacilityResult<ObjectId> {
        self.inner.create_semaphore(args)
    }

    fn release_semaphore(&self, semaphore: ObjectId, count: u32) -> FacilityResult<u32> {
        self.inner.release_semaphore(semaphore, count)
    }

    fn read_semaphore(&self, semaphore: ObjectId) -> FacilityResult<SemaphoreArgs> {
        self.inner.read_semaphore(semaphore)
    }

    fn create_event(&self, args: EventArgs) -> FacilityResult<ObjectId> {
        self.inner.create_event(args)
    }

    fn set_event(&self, event: ObjectId) -> FacilityResult<bool> {
        self.inner.set_event(event)
    }

    fn reset_event(&self, event: ObjectId) -> FacilityResult<bool> {
        self.inner.reset_event(event)
    }

    fn pulse_event(&self, event: ObjectId) -> FacilityResult<bool> {
        self.inner.pulse_event(event)
    }

    fn read_event(&self, event: ObjectId) -> FacilityResult<EventArgs> {
        self.inner.read_event(event)
    }

    fn wait(
        &self,
        objects: &[ObjectId],
        mode: WaitMode,
        deadline: Deadline,
    ) -> FacilityResult<u32> {
        self.inner.wait(objects, mode, deadline).map(|_| self.index)
    }

    fn close(&self, object: ObjectId) -> FacilityResult<()> {
        self.inner.close(object)
    }
}

#[test]
fn test_out_of_range_wait_index_refused() {
    let nt = NtSync::new(MisreportingFacility {
        inner: SimulatedFacility::new(),
        index: 2,
    });
    let a = full_event(&nt, EventType::Notification, true);
    let b = full_event(&nt, EventType::Notification, true);

    let err = nt
        .wait_for_multiple_objects(&[&a, &b], nt_sync::WaitType::WaitAny, false, None)
        .unwrap_err();
    assert_eq!(err, NtError::WaitIndexOutOfRange { index: 2, count: 2 });
    assert_eq!(err.status(), NtStatus::UNSUCCESSFUL);
    assert_eq!(err.win32_error(), Win32Error::GEN_FAILURE);
}
