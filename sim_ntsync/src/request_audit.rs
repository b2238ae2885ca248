//! Request Audit Trail
//!
//! This module records every request that reaches the simulated facility.
//!
//! ## Philosophy
//!
//! - Test-only: This is NOT production logging, it's for test verification
//! - Deterministic: Requests are recorded in arrival order
//! - Queryable: Tests assert on the trail to prove that a rejected call
//!   never reached the driver
//!
//! ## Example
//!
//! ```
//! use sim_ntsync::request_audit::{Request, RequestAudit, RequestKind};
//! use ntsync_api::{ObjectId, SemaphoreArgs};
//!
//! let mut audit = RequestAudit::new();
//! audit.record(Request::CreateSemaphore { args: SemaphoreArgs { count: 0, max: 1 } });
//! audit.record(Request::ReleaseSemaphore { object: ObjectId::from_raw(3), count: 1 });
//!
//! assert_eq!(audit.len(), 2);
//! assert_eq!(audit.count_kind(RequestKind::ReleaseSemaphore), 1);
//! ```

use ntsync_api::{Deadline, EventArgs, ObjectId, SemaphoreArgs, WaitMode};

/// A request as submitted to the facility
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CreateSemaphore { args: SemaphoreArgs },
    ReleaseSemaphore { object: ObjectId, count: u32 },
    ReadSemaphore { object: ObjectId },
    CreateEvent { args: EventArgs },
    SetEvent { object: ObjectId },
    ResetEvent { object: ObjectId },
    PulseEvent { object: ObjectId },
    ReadEvent { object: ObjectId },
    Wait {
        objects: Vec<ObjectId>,
        mode: WaitMode,
        deadline: Deadline,
    },
    Close { object: ObjectId },
}

/// Request type without its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    CreateSemaphore,
    ReleaseSemaphore,
    ReadSemaphore,
    CreateEvent,
    SetEvent,
    ResetEvent,
    PulseEvent,
    ReadEvent,
    Wait,
    Close,
}

impl Request {
    /// Returns the kind of this request
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::CreateSemaphore { .. } => RequestKind::CreateSemaphore,
            Request::ReleaseSemaphore { .. } => RequestKind::ReleaseSemaphore,
            Request::ReadSemaphore { .. } => RequestKind::ReadSemaphore,
            Request::CreateEvent { .. } => RequestKind::CreateEvent,
            Request::SetEvent { .. } => RequestKind::SetEvent,
            Request::ResetEvent { .. } => RequestKind::ResetEvent,
            Request::PulseEvent { .. } => RequestKind::PulseEvent,
            Request::ReadEvent { .. } => RequestKind::ReadEvent,
            Request::Wait { .. } => RequestKind::Wait,
            Request::Close { .. } => RequestKind::Close,
        }
    }

    /// Returns true if the request is a state change rather than a read
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self.kind(),
            RequestKind::ReadSemaphore | RequestKind::ReadEvent
        )
    }
}

/// Chronological record of facility requests
#[derive(Debug, Clone, Default)]
pub struct RequestAudit {
    requests: Vec<Request>,
}

impl RequestAudit {
    /// Creates a new empty audit trail
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
        }
    }

    /// Records a request
    pub fn record(&mut self, request: Request) {
        self.requests.push(request);
    }

    /// Returns all recorded requests
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Counts requests of a given kind
    pub fn count_kind(&self, kind: RequestKind) -> usize {
        self.requests.iter().filter(|r| r.kind() == kind).count()
    }

    /// Checks if any request matches the predicate
    pub fn has_request<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Request) -> bool,
    {
        self.requests.iter().any(predicate)
    }

    /// Clears all requests (useful for test reset)
    pub fn clear(&mut self) {
        self.requests.clear();
    }

    /// Returns the number of recorded requests
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Checks if the audit trail is empty
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
