//! Core scheduling abstractions: aging, queue, registry, ledger, allocator
//! and the service façade that serializes them.

pub mod aging;
pub mod allocator;
pub mod audit;
pub mod error;
pub mod ledger;
pub mod model;
pub mod queue;
pub mod registry;
pub mod scheduler;
pub mod state;
pub mod ticker;

pub use aging::{effective_priority, AgingPolicy, DEFAULT_AGING_INTERVAL_SECS, HIGHEST_PRIORITY};
pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, NoopAuditSink,
};
pub use error::{AppResult, SchedulerError};
pub use ledger::AllocationLedger;
pub use model::{
    Allocation, NewRequest, RankedRequest, Request, RequestStatus, Resource, ResourceStatus,
    Submission,
};
pub use queue::RequestQueue;
pub use registry::ResourceRegistry;
pub use scheduler::{PublishedConfig, SchedulerService, SchedulerSnapshot, SchedulerStats};
pub use state::SchedulerState;
pub use ticker::{Spawn, TickerHandle};
