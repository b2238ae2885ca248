//! Access Rights Conformance Tests
//!
//! These tests validate that rights are enforced locally:
//! - Each operation checks its right before touching the facility
//! - A denied call leaves no trace in the request audit
//! - Aliased handles with different rights see the same object

#![allow(deprecated)]

use nt_sync::{
    AccessMask, EventType, Handle, NtError, NtStatus, NtTimeout, WaitOutcome, WaitType,
};
use sim_ntsync::request_audit::RequestKind;
use tests_conformance::{full_semaphore, test_bootstrap};

#[test]
fn test_denied_calls_have_no_facility_side_effect() {
    let nt = test_bootstrap();
    let sem = nt.create_semaphore(AccessMask::empty(), None, 1, 2).unwrap();
    let event = nt
        .create_event(AccessMask::empty(), None, EventType::Notification, true)
        .unwrap();
    let created = nt.facility().audit().len();

    let results = [
        nt.release_semaphore(&sem, 1).map(drop),
        nt.query_semaphore(&sem).map(drop),
        nt.set_event(&event).map(drop),
        nt.reset_event(&event).map(drop),
        nt.pulse_event(&event).map(drop),
        nt.query_event(&event).map(drop),
        nt.wait_for_single_object(&sem, false, None).map(drop),
        nt.wait_for_single_object(&event, false, None).map(drop),
    ];
    for result in results {
        assert_eq!(result, Err(NtError::AccessDenied));
    }
    assert_eq!(NtStatus::from(NtError::AccessDenied), NtStatus::ACCESS_DENIED);

    // Nothing beyond the two creations was submitted
    assert_eq!(nt.facility().audit().len(), created);
}

#[test]
fn test_first_missing_synchronize_fails_whole_wait() {
    let nt = test_bootstrap();
    let ready = full_semaphore(&nt, 1, 1);
    let locked = nt
        .create_semaphore(AccessMask::SEMAPHORE_QUERY_STATE, None, 1, 1)
        .unwrap();

    let result =
        nt.wait_for_multiple_objects(&[&ready, &locked], WaitType::WaitAny, false, None);
    assert_eq!(result, Err(NtError::AccessDenied));

    assert_eq!(nt.facility().audit().count_kind(RequestKind::Wait), 0);
    assert_eq!(nt.query_semaphore(&ready).unwrap().current_count, 1);
}

#[test]
fn test_each_right_unlocks_its_operation() {
    let nt = test_bootstrap();

    let modify_only = nt
        .create_semaphore(AccessMask::SEMAPHORE_MODIFY_STATE, None, 0, 5)
        .unwrap();
    assert_eq!(nt.release_semaphore(&modify_only, 1), Ok(0));
    assert_eq!(nt.query_semaphore(&modify_only), Err(NtError::AccessDenied));

    let sync_only = nt
        .create_event(AccessMask::SYNCHRONIZE, None, EventType::Notification, true)
        .unwrap();
    assert_eq!(nt.set_event(&sync_only), Err(NtError::AccessDenied));
    assert_eq!(
        nt.wait_for_single_object(&sync_only, false, Some(NtTimeout::POLL)),
        Ok(WaitOutcome::Satisfied(0))
    );
}

#[test]
fn test_aliased_handles_share_object() {
    let nt = test_bootstrap();
    let owner = full_semaphore(&nt, 0, 3);

    // SAFETY: `owner` keeps the object open for the lifetime of the alias,
    // and only `owner` is closed.
    let releaser = unsafe { Handle::from_raw(owner.object(), AccessMask::SEMAPHORE_MODIFY_STATE) };
    let reader = unsafe { Handle::from_raw(owner.object(), AccessMask::SEMAPHORE_QUERY_STATE) };

    assert_eq!(nt.release_semaphore(&releaser, 2), Ok(0));
    assert_eq!(nt.query_semaphore(&reader).unwrap().current_count, 2);
    assert_eq!(nt.query_semaphore(&releaser), Err(NtError::AccessDenied));
    assert_eq!(nt.release_semaphore(&reader, 1), Err(NtError::AccessDenied));

    drop((releaser, reader));
    nt.close(owner).unwrap();
}

#[test]
fn test_handles_shared_across_threads() {
    let nt = test_bootstrap();
    let sem = full_semaphore(&nt, 0, 8);

    std::thread::scope(|s| {
        for _ in 0..8 {
            let (nt, sem) = (&nt, &sem);
            s.spawn(move || nt.release_semaphore(sem, 1).unwrap());
        }
    });

    assert_eq!(nt.query_semaphore(&sem).unwrap().current_count, 8);
}
