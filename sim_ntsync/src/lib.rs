//! # Simulated ntsync Facility
//!
//! This crate provides an in-process implementation of the
//! [`SyncFacility`] request interface.
//!
//! ## Purpose
//!
//! The simulated facility allows testing the NT layer without the kernel
//! driver:
//! - Runs under `cargo test` on any host
//! - Real blocking: waiters park on a condition variable, so concurrency
//!   tests exercise genuine cross-thread wakeups
//! - Inspectable: every request is recorded, faults can be injected
//!
//! ## Semantics
//!
//! Objects follow the driver's rules. A semaphore is signaled while its
//! count is non-zero and each satisfied wait consumes one unit. An event is
//! signaled while set; an auto-reset event is unsignaled by the wait it
//! satisfies. A wait-all acquires every object at once or none of them.
//! Blocked waiters are served in arrival order after each state change.

pub mod clock;
pub mod fault_injection;
pub mod request_audit;
pub mod test_utils;

use fault_injection::{FaultInjector, FaultPlan};
use log::{debug, trace};
use ntsync_api::{
    Clock, Deadline, EventArgs, FacilityError, FacilityResult, Instant, ObjectId, SemaphoreArgs,
    SyncFacility, SystemClock, WaitMode, MAX_WAIT_OBJECTS,
};
use request_audit::{Request, RequestAudit};
use std::collections::{HashMap, VecDeque};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// First identifier handed out, mirroring the first free descriptor after
/// the standard streams.
const FIRST_OBJECT_ID: i32 = 3;

/// Simulated facility state
///
/// All objects and blocked waiters live behind one lock, which is what makes
/// multi-object acquisition atomic.
pub struct SimulatedFacility {
    state: Mutex<SimState>,
    wakeup: Condvar,
    clock: Box<dyn Clock + Send + Sync>,
}

struct SimState {
    next_id: i32,
    objects: HashMap<ObjectId, SimObject>,
    waiters: VecDeque<Waiter>,
    next_waiter: u64,
    fault_injector: Option<FaultInjector>,
    audit: RequestAudit,
}

#[derive(Debug, Clone, Copy)]
enum SimObject {
    Semaphore { count: u32, max: u32 },
    Event { manual: bool, signaled: bool },
}

#[derive(Debug)]
struct Waiter {
    id: u64,
    objects: Vec<ObjectId>,
    mode: WaitMode,
    /// Set by the waker once the objects have been acquired on our behalf
    satisfied: Option<u32>,
}

impl SimObject {
    fn is_signaled(&self) -> bool {
        match self {
            SimObject::Semaphore { count, .. } => *count > 0,
            SimObject::Event { signaled, .. } => *signaled,
        }
    }

    /// Applies the side effect of satisfying a wait
    fn consume(&mut self) {
        match self {
            SimObject::Semaphore { count, .. } => *count = count.saturating_sub(1),
            SimObject::Event { manual, signaled } => {
                if !*manual {
                    *signaled = false;
                }
            }
        }
    }
}

/// Acquires `ids` in `mode` if the wait can be satisfied right now
fn try_acquire(
    objects: &mut HashMap<ObjectId, SimObject>,
    ids: &[ObjectId],
    mode: WaitMode,
) -> Option<u32> {
    match mode {
        WaitMode::Any => {
            let index = ids
                .iter()
                .position(|id| objects.get(id).is_some_and(SimObject::is_signaled))?;
            if let Some(object) = objects.get_mut(&ids[index]) {
                object.consume();
            }
            u32::try_from(index).ok()
        }
        WaitMode::All => {
            let all_signaled = ids
                .iter()
                .all(|id| objects.get(id).is_some_and(SimObject::is_signaled));
            if !all_signaled {
                return None;
            }
            for id in ids {
                if let Some(object) = objects.get_mut(id) {
                    object.consume();
                }
            }
            Some(0)
        }
    }
}

impl SimState {
    /// Records the request and applies any injected fault
    fn begin(&mut self, request: Request) -> FacilityResult<()> {
        let kind = request.kind();
        self.audit.record(request);
        if let Some(injector) = &mut self.fault_injector {
            injector.check(kind)?;
        }
        Ok(())
    }

    fn allocate(&mut self, object: SimObject) -> ObjectId {
        let id = ObjectId::from_raw(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        id
    }

    fn object_mut(&mut self, id: ObjectId) -> FacilityResult<&mut SimObject> {
        self.objects.get_mut(&id).ok_or(FacilityError::BadDescriptor)
    }

    fn semaphore_mut(&mut self, id: ObjectId) -> FacilityResult<(&mut u32, u32)> {
        match self.object_mut(id)? {
            SimObject::Semaphore { count, max } => Ok((count, *max)),
            SimObject::Event { .. } => Err(FacilityError::Other(libc::ENOTTY)),
        }
    }

    fn event_mut(&mut self, id: ObjectId) -> FacilityResult<(bool, &mut bool)> {
        match self.object_mut(id)? {
            SimObject::Event { manual, signaled } => Ok((*manual, signaled)),
            SimObject::Semaphore { .. } => Err(FacilityError::Other(libc::ENOTTY)),
        }
    }

    /// Serves blocked waiters in arrival order
    fn wake_waiters(&mut self) -> usize {
        let mut woken = 0;
        for waiter in self.waiters.iter_mut().filter(|w| w.satisfied.is_none()) {
            if let Some(index) = try_acquire(&mut self.objects, &waiter.objects, waiter.mode) {
                trace!("waiter {} satisfied at index {}", waiter.id, index);
                waiter.satisfied = Some(index);
                woken += 1;
            }
        }
        woken
    }

    fn enqueue(&mut self, objects: &[ObjectId], mode: WaitMode) -> u64 {
        let id = self.next_waiter;
        self.next_waiter += 1;
        self.waiters.push_back(Waiter {
            id,
            objects: objects.to_vec(),
            mode,
            satisfied: None,
        });
        id
    }

    /// Removes the waiter, returning its result if it was satisfied
    fn dequeue(&mut self, id: u64) -> Option<u32> {
        let position = self.waiters.iter().position(|w| w.id == id)?;
        self.waiters.remove(position).and_then(|w| w.satisfied)
    }

    fn is_satisfied(&self, id: u64) -> bool {
        self.waiters
            .iter()
            .any(|w| w.id == id && w.satisfied.is_some())
    }

    fn blocked_waiters(&self) -> usize {
        self.waiters.iter().filter(|w| w.satisfied.is_none()).count()
    }
}

fn validate_wait(
    state: &SimState,
    objects: &[ObjectId],
    mode: WaitMode,
) -> FacilityResult<()> {
    if objects.len() > MAX_WAIT_OBJECTS {
        return Err(FacilityError::InvalidArgument);
    }
    if let Some(missing) = objects.iter().find(|id| !state.objects.contains_key(id)) {
        debug!("wait on unknown object {}", missing);
        return Err(FacilityError::BadDescriptor);
    }
    if mode == WaitMode::All {
        for (i, id) in objects.iter().enumerate() {
            if objects[..i].contains(id) {
                return Err(FacilityError::InvalidArgument);
            }
        }
    }
    Ok(())
}

impl SimulatedFacility {
    /// Creates a new simulated facility reading the host realtime clock
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                next_id: FIRST_OBJECT_ID,
                objects: HashMap::new(),
                waiters: VecDeque::new(),
                next_waiter: 0,
                fault_injector: None,
                audit: RequestAudit::new(),
            }),
            wakeup: Condvar::new(),
            clock: Box::new(SystemClock),
        }
    }

    /// Sets the clock deadlines are measured against
    ///
    /// A wait converts its absolute deadline into a remaining time using
    /// this clock when it starts, then blocks for that long.
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Sets the fault injector for this facility
    pub fn with_fault_injector(self, injector: FaultInjector) -> Self {
        self.lock().fault_injector = Some(injector);
        self
    }

    /// Sets the fault plan for this facility
    pub fn with_fault_plan(self, plan: FaultPlan) -> Self {
        self.with_fault_injector(FaultInjector::new(plan))
    }

    /// Returns a snapshot of the request audit trail
    pub fn audit(&self) -> RequestAudit {
        self.lock().audit.clone()
    }

    /// Clears the request audit trail
    pub fn clear_audit(&self) {
        self.lock().audit.clear();
    }

    /// Returns the number of live objects
    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    /// Returns the number of threads blocked in a wait
    pub fn waiter_count(&self) -> usize {
        self.lock().blocked_waiters()
    }

    /// Returns true if no objects are live and no thread is waiting
    pub fn is_idle(&self) -> bool {
        let state = self.lock();
        state.objects.is_empty() && state.waiters.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Converts an absolute deadline into time left to block
    ///
    /// `None` means no limit. A clock failure is treated as an expired
    /// deadline.
    fn remaining(&self, deadline: Deadline) -> Option<std::time::Duration> {
        let at = deadline.instant()?;
        let now = self
            .clock
            .now()
            .unwrap_or(Instant::from_nanos(u64::MAX));
        Some(at.duration_since(now).into())
    }

    fn wake(&self, state: &mut SimState) {
        if state.wake_waiters() > 0 {
            self.wakeup.notify_all();
        }
    }
}

impl Default for SimulatedFacility {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncFacility for SimulatedFacility {
    fn create_semaphore(&self, args: SemaphoreArgs) -> FacilityResult<ObjectId> {
        let mut state = self.lock();
        state.begin(Request::CreateSemaphore { args })?;

        if args.count > args.max {
            return Err(FacilityError::InvalidArgument);
        }
        let id = state.allocate(SimObject::Semaphore {
            count: args.count,
            max: args.max,
        });
        trace!("created semaphore {} ({}/{})", id, args.count, args.max);
        Ok(id)
    }

    fn release_semaphore(&self, semaphore: ObjectId, count: u32) -> FacilityResult<u32> {
        let mut state = self.lock();
        state.begin(Request::ReleaseSemaphore {
            object: semaphore,
            count,
        })?;

        let (current, max) = state.semaphore_mut(semaphore)?;
        let previous = *current;
        *current = previous
            .checked_add(count)
            .filter(|new| *new <= max)
            .ok_or(FacilityError::Overflow)?;

        self.wake(&mut state);
        Ok(previous)
    }

    fn read_semaphore(&self, semaphore: ObjectId) -> FacilityResult<SemaphoreArgs> {
        let mut state = self.lock();
        state.begin(Request::ReadSemaphore { object: semaphore })?;

        let (count, max) = state.semaphore_mut(semaphore)?;
        Ok(SemaphoreArgs { count: *count, max })
    }

    fn create_event(&self, args: EventArgs) -> FacilityResult<ObjectId> {
        let mut state = self.lock();
        state.begin(Request::CreateEvent { args })?;

        let id = state.allocate(SimObject::Event {
            manual: args.manual != 0,
            signaled: args.signaled != 0,
        });
        trace!(
            "created event {} (manual={}, signaled={})",
            id,
            args.manual,
            args.signaled
        );
        Ok(id)
    }

    fn set_event(&self, event: ObjectId) -> FacilityResult<bool> {
        let mut state = self.lock();
        state.begin(Request::SetEvent { object: event })?;

        let (_, signaled) = state.event_mut(event)?;
        let previous = std::mem::replace(signaled, true);

        self.wake(&mut state);
        Ok(previous)
    }

    fn reset_event(&self, event: ObjectId) -> FacilityResult<bool> {
        let mut state = self.lock();
        state.begin(Request::ResetEvent { object: event })?;

        let (_, signaled) = state.event_mut(event)?;
        Ok(std::mem::replace(signaled, false))
    }

    fn pulse_event(&self, event: ObjectId) -> FacilityResult<bool> {
        let mut state = self.lock();
        state.begin(Request::PulseEvent { object: event })?;

        let (_, signaled) = state.event_mut(event)?;
        let previous = std::mem::replace(signaled, true);

        // Only waiters already queued see the pulse.
        self.wake(&mut state);
        let (_, signaled) = state.event_mut(event)?;
        *signaled = false;
        Ok(previous)
    }

    fn read_event(&self, event: ObjectId) -> FacilityResult<EventArgs> {
        let mut state = self.lock();
        state.begin(Request::ReadEvent { object: event })?;

        let (manual, signaled) = state.event_mut(event)?;
        Ok(EventArgs {
            manual: u32::from(manual),
            signaled: u32::from(*signaled),
        })
    }

    fn wait(
        &self,
        objects: &[ObjectId],
        mode: WaitMode,
        deadline: Deadline,
    ) -> FacilityResult<u32> {
        let remaining = self.remaining(deadline);
        let started = std::time::Instant::now();

        let mut state = self.lock();
        state.begin(Request::Wait {
            objects: objects.to_vec(),
            mode,
            deadline,
        })?;
        validate_wait(&state, objects, mode)?;

        if let Some(index) = try_acquire(&mut state.objects, objects, mode) {
            return Ok(index);
        }

        let waiter = state.enqueue(objects, mode);
        trace!("waiter {} blocked on {} objects ({:?})", waiter, objects.len(), mode);

        loop {
            if state.is_satisfied(waiter) {
                return state.dequeue(waiter).ok_or(FacilityError::Fault);
            }

            state = match remaining {
                None => self
                    .wakeup
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(limit) => {
                    let elapsed = started.elapsed();
                    if elapsed >= limit {
                        state.dequeue(waiter);
                        trace!("waiter {} timed out", waiter);
                        return Err(FacilityError::TimedOut);
                    }
                    let (guard, _) = self
                        .wakeup
                        .wait_timeout(state, limit - elapsed)
                        .unwrap_or_else(PoisonError::into_inner);
                    guard
                }
            };
        }
    }

    fn close(&self, object: ObjectId) -> FacilityResult<()> {
        let mut state = self.lock();
        state.begin(Request::Close { object })?;

        state
            .objects
            .remove(&object)
            .map(|_| ())
            .ok_or(FacilityError::BadDescriptor)
    }
}
