//! Event Protocol Conformance Tests
//!
//! These tests validate event creation, signaling and query:
//! - Notification events are manual-reset, synchronization events auto-reset
//! - Set/reset/pulse report the previous state
//! - Pulse releases only waiters that are already queued

#![allow(deprecated)]

use nt_sync::{
    EventBasicInformation, EventType, NtTimeout, WaitOutcome, EVENT_BASIC_INFORMATION_CLASS,
};
use sim_ntsync::test_utils::{wait_for_waiters, SETTLE_LIMIT};
use tests_conformance::{full_event, test_bootstrap, TestNt};

fn signaled(nt: &TestNt, event: &nt_sync::Handle) -> bool {
    nt.query_event(event).unwrap().event_state != 0
}

#[test]
fn test_create_query_roundtrip() {
    let nt = test_bootstrap();

    for event_type in [EventType::Notification, EventType::Synchronization] {
        for initial in [false, true] {
            let event = full_event(&nt, event_type, initial);
            assert_eq!(
                nt.query_event(&event).unwrap(),
                EventBasicInformation {
                    event_type,
                    event_state: i32::from(initial),
                }
            );
            nt.close(event).unwrap();
        }
    }
}

#[test]
fn test_auto_reset_unsignals_after_one_wait() {
    let nt = test_bootstrap();
    let event = full_event(&nt, EventType::Synchronization, true);

    let first = nt.wait_for_single_object(&event, false, Some(NtTimeout::POLL));
    let second = nt.wait_for_single_object(&event, false, Some(NtTimeout::POLL));

    assert_eq!(first, Ok(WaitOutcome::Satisfied(0)));
    assert_eq!(second, Ok(WaitOutcome::TimedOut));
    assert!(!signaled(&nt, &event));
}

#[test]
fn test_manual_reset_stays_signaled_until_reset() {
    let nt = test_bootstrap();
    let event = full_event(&nt, EventType::Notification, false);

    assert_eq!(nt.set_event(&event), Ok(false));
    for _ in 0..5 {
        assert_eq!(
            nt.wait_for_single_object(&event, false, Some(NtTimeout::POLL)),
            Ok(WaitOutcome::Satisfied(0))
        );
    }
    assert!(signaled(&nt, &event));

    assert_eq!(nt.reset_event(&event), Ok(true));
    assert_eq!(
        nt.wait_for_single_object(&event, false, Some(NtTimeout::POLL)),
        Ok(WaitOutcome::TimedOut)
    );
}

#[test]
fn test_set_wakes_blocked_waiters() {
    let nt = test_bootstrap();
    let event = full_event(&nt, EventType::Notification, false);

    std::thread::scope(|s| {
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let (nt, event) = (&nt, &event);
                s.spawn(move || nt.wait_for_single_object(event, false, None))
            })
            .collect();
        assert!(wait_for_waiters(nt.facility(), 3, SETTLE_LIMIT));

        nt.set_event(&event).unwrap();
        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), Ok(WaitOutcome::Satisfied(0)));
        }
    });
}

#[test]
fn test_pulse_manual_releases_queued_waiters_only() {
    let nt = test_bootstrap();
    let event = full_event(&nt, EventType::Notification, false);

    std::thread::scope(|s| {
        let waiters: Vec<_> = (0..2)
            .map(|_| {
                let (nt, event) = (&nt, &event);
                s.spawn(move || nt.wait_for_single_object(event, false, None))
            })
            .collect();
        assert!(wait_for_waiters(nt.facility(), 2, SETTLE_LIMIT));

        assert_eq!(nt.pulse_event(&event), Ok(false));
        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), Ok(WaitOutcome::Satisfied(0)));
        }
    });

    // A wait after the pulse does not see it
    assert!(!signaled(&nt, &event));
    assert_eq!(
        nt.wait_for_single_object(&event, false, Some(NtTimeout::POLL)),
        Ok(WaitOutcome::TimedOut)
    );
}

#[test]
fn test_pulse_auto_reset_releases_one() {
    let nt = test_bootstrap();
    let event = full_event(&nt, EventType::Synchronization, false);

    std::thread::scope(|s| {
        let waiters: Vec<_> = (0..2)
            .map(|_| {
                let (nt, event) = (&nt, &event);
                s.spawn(move || nt.wait_for_single_object(event, false, None))
            })
            .collect();
        assert!(wait_for_waiters(nt.facility(), 2, SETTLE_LIMIT));

        nt.pulse_event(&event).unwrap();
        assert_eq!(nt.facility().waiter_count(), 1);

        // Release the other one
        nt.set_event(&event).unwrap();
        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), Ok(WaitOutcome::Satisfied(0)));
        }
    });
    assert!(!signaled(&nt, &event));
}

#[test]
fn test_query_into() {
    let nt = test_bootstrap();
    let event = full_event(&nt, EventType::Notification, true);

    let mut buffer = [0u8; EventBasicInformation::SIZE];
    assert_eq!(
        nt.query_event_into(&event, EVENT_BASIC_INFORMATION_CLASS, &mut buffer),
        Ok(8)
    );
    assert_eq!(buffer, nt.query_event(&event).unwrap().to_ne_bytes());
    assert_eq!(buffer[..4], 0u32.to_ne_bytes());
}
