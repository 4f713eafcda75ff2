//! Audit trail of scheduler decisions.
//!
//! Every submit, allocate and release is recorded as an [`AuditEvent`].
//! The in-memory sink keeps a bounded window; other sinks can forward the
//! events wherever they need to go.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::serde::TimestampMs;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Request accepted into the queue.
    Submit,
    /// Request bound to a resource.
    Allocate,
    /// Allocation released, resource freed.
    Release,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Submit => "submit",
            Self::Allocate => "allocate",
            Self::Release => "release",
        };
        f.write_str(s)
    }
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Action taken.
    pub action: AuditAction,
    /// Related request.
    pub request_id: u64,
    /// Related resource, when one is involved.
    pub resource_id: Option<u64>,
    /// Related allocation, when one is involved.
    pub allocation_id: Option<u64>,
    /// Scheduler time of the event.
    pub created_at_ms: TimestampMs,
    /// Additional JSON context.
    pub payload: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev. Clones share the same buffer,
/// so a caller can keep a handle after giving one to the scheduler.
#[derive(Debug, Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<VecDeque<AuditEvent>>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(1024)))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Stored events with the given action.
    pub fn events_for(&self, action: AuditAction) -> Vec<AuditEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.action == action)
            .cloned()
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Sink that drops everything. Used when no audit trail is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&mut self, _event: AuditEvent) {}
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    action: AuditAction,
    request_id: u64,
    resource_id: Option<u64>,
    allocation_id: Option<u64>,
    created_at_ms: TimestampMs,
    payload: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        action,
        request_id,
        resource_id,
        allocation_id,
        created_at_ms,
        payload,
    }
}
