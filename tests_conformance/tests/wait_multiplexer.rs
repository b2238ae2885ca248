//! Wait Multiplexer Conformance Tests
//!
//! These tests validate single and multi-object waits:
//! - ANY reports the satisfying index, ALL completes only when every
//!   object is available at once
//! - Zero timeouts poll, relative timeouts expire, infinite waits block
//! - Request limits are enforced before submission

use nt_sync::{EventType, NtError, NtStatus, NtTimeout, WaitOutcome, WaitType};
use ntsync_api::{Duration, MAX_WAIT_OBJECTS};
use sim_ntsync::request_audit::{Request, RequestKind};
use sim_ntsync::test_utils::{wait_for_waiters, SETTLE_LIMIT};
use tests_conformance::{full_event, full_semaphore, test_bootstrap};

#[test]
fn test_zero_timeout_on_unsignaled_object_is_timeout() {
    let nt = test_bootstrap();
    let sem = full_semaphore(&nt, 0, 1);
    let event = full_event(&nt, EventType::Notification, false);

    for handle in [&sem, &event] {
        let outcome = nt
            .wait_for_single_object(handle, false, Some(NtTimeout::POLL))
            .unwrap();
        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert_eq!(outcome.status(), NtStatus::TIMEOUT);
    }
}

#[test]
fn test_any_returns_first_available_index() {
    let nt = test_bootstrap();
    let handles: Vec<_> = (0..5).map(|_| full_semaphore(&nt, 0, 1)).collect();
    let refs: Vec<_> = handles.iter().collect();

    nt.release_semaphore(&handles[3], 1).unwrap();
    nt.release_semaphore(&handles[4], 1).unwrap();

    let outcome = nt
        .wait_for_multiple_objects(&refs, WaitType::WaitAny, false, Some(NtTimeout::POLL))
        .unwrap();
    assert_eq!(outcome, WaitOutcome::Satisfied(3));
    assert_eq!(outcome.status(), NtStatus::wait(3));

    // Only the satisfying object was consumed
    assert_eq!(nt.query_semaphore(&handles[3]).unwrap().current_count, 0);
    assert_eq!(nt.query_semaphore(&handles[4]).unwrap().current_count, 1);
}

#[test]
fn test_all_over_two_objects_waits_for_both() {
    let nt = test_bootstrap();
    let a = full_semaphore(&nt, 0, 1);
    let b = full_event(&nt, EventType::Synchronization, false);

    std::thread::scope(|s| {
        let waiter = s.spawn(|| {
            nt.wait_for_multiple_objects(&[&a, &b], WaitType::WaitAll, false, None)
        });
        assert!(wait_for_waiters(nt.facility(), 1, SETTLE_LIMIT));

        // One object is not enough
        nt.release_semaphore(&a, 1).unwrap();
        assert_eq!(nt.facility().waiter_count(), 1);
        assert_eq!(nt.query_semaphore(&a).unwrap().current_count, 1);

        nt.set_event(&b).unwrap();
        assert_eq!(waiter.join().unwrap(), Ok(WaitOutcome::Satisfied(0)));
    });

    // Both were acquired together
    assert_eq!(nt.query_semaphore(&a).unwrap().current_count, 0);
    assert_eq!(nt.query_event(&b).unwrap().event_state, 0);
}

#[test]
fn test_all_does_not_starve_any_waiter_of_partial_objects() {
    let nt = test_bootstrap();
    let a = full_semaphore(&nt, 0, 1);
    let b = full_semaphore(&nt, 0, 1);

    std::thread::scope(|s| {
        let all = s.spawn(|| {
            nt.wait_for_multiple_objects(&[&a, &b], WaitType::WaitAll, false, None)
        });
        assert!(wait_for_waiters(nt.facility(), 1, SETTLE_LIMIT));
        let any = s.spawn(|| nt.wait_for_single_object(&a, false, None));
        assert!(wait_for_waiters(nt.facility(), 2, SETTLE_LIMIT));

        // `a` alone satisfies the single-object waiter, not the wait-all
        nt.release_semaphore(&a, 1).unwrap();
        assert_eq!(any.join().unwrap(), Ok(WaitOutcome::Satisfied(0)));
        assert_eq!(nt.facility().waiter_count(), 1);

        nt.release_semaphore(&a, 1).unwrap();
        nt.release_semaphore(&b, 1).unwrap();
        assert_eq!(all.join().unwrap(), Ok(WaitOutcome::Satisfied(0)));
    });
}

#[test]
fn test_relative_timeout_expires() {
    let nt = test_bootstrap();
    let sem = full_semaphore(&nt, 0, 1);

    let timeout = NtTimeout::relative(Duration::from_millis(30));
    let outcome = nt.wait_for_single_object(&sem, false, Some(timeout)).unwrap();

    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert_eq!(nt.facility().waiter_count(), 0);
}

#[test]
fn test_timeout_encoding_reaches_facility() {
    let nt = test_bootstrap();
    let sem = full_semaphore(&nt, 1, 1);

    nt.wait_for_single_object(&sem, false, None).unwrap();

    let audit = nt.facility().audit();
    assert!(audit.has_request(|r| matches!(
        r,
        Request::Wait { deadline, objects, .. } if deadline.is_never() && objects.len() == 1
    )));
}

#[test]
fn test_request_size_limits() {
    let nt = test_bootstrap();
    let sem = full_semaphore(&nt, 1, 1);

    let empty = nt.wait_for_multiple_objects(&[], WaitType::WaitAny, false, None);
    assert_eq!(empty.unwrap_err().status(), NtStatus::INVALID_PARAMETER_1);

    let oversized = vec![&sem; MAX_WAIT_OBJECTS + 1];
    let result = nt.wait_for_multiple_objects(&oversized, WaitType::WaitAny, false, None);
    assert_eq!(result, Err(NtError::InvalidParameter(1)));

    assert_eq!(nt.facility().audit().count_kind(RequestKind::Wait), 0);
}

#[test]
fn test_alertable_wait_rejected() {
    let nt = test_bootstrap();
    let sem = full_semaphore(&nt, 1, 1);

    let err = nt.wait_for_single_object(&sem, true, None).unwrap_err();
    assert_eq!(err.status(), NtStatus::NOT_IMPLEMENTED);
    assert_eq!(nt.facility().audit().count_kind(RequestKind::Wait), 0);
}

#[test]
fn test_semaphore_handoff_between_threads() {
    let nt = test_bootstrap();
    let sem = full_semaphore(&nt, 0, 1);
    const ROUNDS: usize = 20;

    std::thread::scope(|s| {
        let consumer = s.spawn(|| {
            for _ in 0..ROUNDS {
                assert_eq!(
                    nt.wait_for_single_object(&sem, false, None),
                    Ok(WaitOutcome::Satisfied(0))
                );
            }
        });

        for _ in 0..ROUNDS {
            // Wait for the consumer to take the previous unit
            while nt.query_semaphore(&sem).unwrap().current_count != 0 {
                std::thread::yield_now();
            }
            nt.release_semaphore(&sem, 1).unwrap();
        }
        consumer.join().unwrap();
    });

    assert_eq!(nt.query_semaphore(&sem).unwrap().current_count, 0);
}
