//! Scheduler service: the one entry point for every mutation.
//!
//! Queue, registry, ledger and history live in a single [`SchedulerState`]
//! behind one `parking_lot::RwLock`. Submissions, releases and ticks take
//! the write lock and run a matching pass before letting go; listings take
//! the read lock and return owned snapshots, so a reader never sees a busy
//! resource without its allocation.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::core::aging::AgingPolicy;
use crate::core::allocator::run_pass;
use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::model::{Allocation, RankedRequest, Request, Resource, Submission};
use crate::core::queue::RequestQueue;
use crate::core::registry::ResourceRegistry;
use crate::core::state::SchedulerState;
use crate::core::ticker::{spawn_thread_ticker, TickerHandle};
use crate::core::SchedulerError;
use crate::infra::queue::InMemoryRequestQueue;
use crate::util::clock::Clock;
use crate::util::serde::{AllocationId, RequestId, TimestampMs};

/// Settings clients need to agree with the server, published as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedConfig {
    /// Seconds of waiting per unit of priority boost.
    pub aging_interval_secs: u64,
    /// Period of the re-evaluation tick in milliseconds.
    pub tick_interval_ms: u64,
}

impl PublishedConfig {
    /// Aging policy using the published interval.
    pub const fn aging_policy(&self) -> AgingPolicy {
        AgingPolicy::new(self.aging_interval_secs)
    }

    /// Tick period as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Point-in-time counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// Resources in the fleet.
    pub total_resources: usize,
    /// Resources currently free.
    pub free_resources: usize,
    /// Resources currently busy.
    pub busy_resources: usize,
    /// Requests waiting.
    pub queued_requests: usize,
    /// Active allocations.
    pub active_allocations: usize,
    /// Requests accepted since start.
    pub submitted_total: u64,
    /// Allocations released since start.
    pub released_total: u64,
}

/// Resources, allocations and queue captured under one read lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    /// Instant the snapshot was taken.
    pub taken_at: TimestampMs,
    /// All resources, ordered by id.
    pub resources: Vec<Resource>,
    /// Active allocations, ordered by id.
    pub allocations: Vec<Allocation>,
    /// Queued requests in matching order.
    pub queue: Vec<RankedRequest>,
}

impl SchedulerSnapshot {
    /// Check registry/ledger agreement: every busy resource is held by
    /// exactly one allocation of its own type, and every allocation points
    /// at a busy resource. Returns a description of the first violation.
    pub fn consistency_violation(&self) -> Option<String> {
        for resource in &self.resources {
            let holders: Vec<_> = self
                .allocations
                .iter()
                .filter(|a| a.resource_id == resource.id)
                .collect();
            match (resource.is_free(), holders.as_slice()) {
                (true, []) => {}
                (false, [holder]) => {
                    if holder.resource_type != resource.resource_type
                        || holder.required_resource != resource.resource_type
                    {
                        return Some(format!(
                            "allocation {} type mismatch on resource {}",
                            holder.id, resource.id
                        ));
                    }
                }
                (free, holders) => {
                    return Some(format!(
                        "resource {} free={} held by {} allocations",
                        resource.id,
                        free,
                        holders.len()
                    ));
                }
            }
        }
        self.allocations
            .iter()
            .find(|a| !self.resources.iter().any(|r| r.id == a.resource_id))
            .map(|a| format!("allocation {} references unknown resource {}", a.id, a.resource_id))
    }
}

struct Inner<Q> {
    state: RwLock<SchedulerState<Q>>,
    clock: Arc<dyn Clock>,
    published: PublishedConfig,
    audit: Mutex<Box<dyn AuditSink>>,
}

/// Thread-safe scheduler façade. Clones share the same state.
pub struct SchedulerService<Q = InMemoryRequestQueue> {
    inner: Arc<Inner<Q>>,
}

impl<Q> Clone for SchedulerService<Q> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Q: RequestQueue> SchedulerService<Q> {
    /// Assemble a service from its parts. See
    /// [`SchedulerBuilder`](crate::builders::SchedulerBuilder) for the
    /// config-driven path.
    pub fn new(
        registry: ResourceRegistry,
        queue: Q,
        clock: Arc<dyn Clock>,
        published: PublishedConfig,
        audit: Box<dyn AuditSink>,
    ) -> Self {
        tracing::info!(
            resources = registry.len(),
            aging_interval_secs = published.aging_interval_secs,
            tick_interval_ms = published.tick_interval_ms,
            "scheduler initialized"
        );
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(SchedulerState::new(registry, queue)),
                clock,
                published,
                audit: Mutex::new(audit),
            }),
        }
    }

    fn now(&self) -> TimestampMs {
        self.inner.clock.now_ms()
    }

    fn policy(&self) -> AgingPolicy {
        self.inner.published.aging_policy()
    }

    /// Submit one request. It is queued, then a matching pass runs; the
    /// returned value is the request as queued, even if that same pass
    /// allocated it.
    ///
    /// # Errors
    ///
    /// `Validation` for malformed input, `QueueFull` at max depth. Nothing
    /// is enqueued on error.
    pub fn submit(&self, submission: &Submission) -> Result<Request, SchedulerError> {
        let new = submission.validate()?;

        let mut state = self.inner.state.write();
        let now = self.now();
        let request = state.admit(new, now).inspect_err(|e| {
            tracing::warn!(error = %e, "submission rejected");
        })?;
        tracing::info!(
            request_id = request.id,
            priority = request.priority,
            resource_type = %request.required_resource,
            "request queued"
        );
        self.record_submit(&request);

        let created = run_pass(&mut *state, now, &self.policy());
        self.record_allocations(&created);
        Ok(request)
    }

    /// Submit several requests as one atomic unit: either all are queued
    /// with the same `requested_at`, or none are. One matching pass runs
    /// after all of them are in the queue.
    ///
    /// # Errors
    ///
    /// `Validation` if any submission is malformed, `QueueFull` if they do
    /// not all fit, or whatever the queue backend rejects with. Nothing is
    /// queued or audited on error.
    pub fn submit_batch(
        &self,
        submissions: &[Submission],
    ) -> Result<Vec<Request>, SchedulerError> {
        let validated = submissions
            .iter()
            .map(Submission::validate)
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = self.inner.state.write();
        if validated.len() > state.queue_capacity_left() {
            return Err(SchedulerError::QueueFull(state.queue.max_depth()));
        }
        let now = self.now();
        let admitted = state.admit_all(validated, now)?;
        for request in &admitted {
            self.record_submit(request);
        }
        tracing::info!(count = admitted.len(), "batch queued");

        let created = run_pass(&mut *state, now, &self.policy());
        self.record_allocations(&created);
        Ok(admitted)
    }

    /// Release an allocation, free its resource, and re-run matching before
    /// returning.
    ///
    /// # Errors
    ///
    /// `NotFound` if the allocation is unknown or already released.
    pub fn release(&self, allocation_id: AllocationId) -> Result<Allocation, SchedulerError> {
        let mut state = self.inner.state.write();
        let now = self.now();
        let released = state.release(allocation_id).inspect_err(|e| {
            tracing::warn!(allocation_id, error = %e, "release rejected");
        })?;
        tracing::info!(
            allocation_id,
            resource_id = released.resource_id,
            request_id = released.request_id,
            "allocation released"
        );
        self.record(
            AuditAction::Release,
            released.request_id,
            Some(released.resource_id),
            Some(released.id),
            now,
            None,
        );

        let created = run_pass(&mut *state, now, &self.policy());
        self.record_allocations(&created);
        Ok(released)
    }

    /// Run one matching pass. Idempotent when nothing can be matched.
    pub fn tick(&self) -> Vec<Allocation> {
        let mut state = self.inner.state.write();
        let now = self.now();
        let created = run_pass(&mut *state, now, &self.policy());
        if !created.is_empty() {
            tracing::debug!(allocated = created.len(), "tick allocated");
        }
        self.record_allocations(&created);
        created
    }

    /// All resources with current status, ordered by id.
    pub fn list_resources(&self) -> Vec<Resource> {
        self.inner.state.read().registry.list()
    }

    /// Active allocations, ordered by id.
    pub fn list_allocations(&self) -> Vec<Allocation> {
        self.inner.state.read().ledger.list()
    }

    /// Queued requests in current matching order.
    pub fn list_queue(&self) -> Vec<Request> {
        self.queue_preview().into_iter().map(|r| r.request).collect()
    }

    /// Queued requests with their effective priority right now, in matching
    /// order.
    pub fn queue_preview(&self) -> Vec<RankedRequest> {
        self.queue_snapshot().1
    }

    /// Like [`queue_preview`](Self::queue_preview), also returning the
    /// instant the ranking was computed at.
    pub fn queue_snapshot(&self) -> (TimestampMs, Vec<RankedRequest>) {
        let state = self.inner.state.read();
        let now = self.now();
        (now, state.queue.snapshot(now, &self.policy()))
    }

    /// Resources, allocations and queue as one consistent view.
    pub fn snapshot(&self) -> SchedulerSnapshot {
        let state = self.inner.state.read();
        let now = self.now();
        SchedulerSnapshot {
            taken_at: now,
            resources: state.registry.list(),
            allocations: state.ledger.list(),
            queue: state.queue.snapshot(now, &self.policy()),
        }
    }

    /// Every request ever submitted, queued or allocated.
    pub fn list_requests(&self) -> Vec<Request> {
        self.inner.state.read().history()
    }

    /// Look up one request by id.
    pub fn get_request(&self, id: RequestId) -> Option<Request> {
        self.inner.state.read().request(id).cloned()
    }

    /// Configuration shared with clients.
    pub fn published_config(&self) -> PublishedConfig {
        self.inner.published
    }

    /// Current time according to the service clock.
    pub fn current_time_ms(&self) -> TimestampMs {
        self.now()
    }

    /// Point-in-time counters.
    pub fn stats(&self) -> SchedulerStats {
        let state = self.inner.state.read();
        let total = state.registry.len();
        let busy = state.registry.busy_count();
        SchedulerStats {
            total_resources: total,
            free_resources: total - busy,
            busy_resources: busy,
            queued_requests: state.queue.len(),
            active_allocations: state.ledger.len(),
            submitted_total: state.submitted_total(),
            released_total: state.released_total(),
        }
    }

    fn record_submit(&self, request: &Request) {
        let payload = serde_json::json!({
            "name": request.name,
            "priority": request.priority,
            "resource_type": request.required_resource,
            "est_minutes": request.est_minutes,
        });
        self.record(
            AuditAction::Submit,
            request.id,
            None,
            None,
            request.requested_at,
            Some(payload.to_string()),
        );
    }

    fn record_allocations(&self, created: &[Allocation]) {
        for a in created {
            self.record(
                AuditAction::Allocate,
                a.request_id,
                Some(a.resource_id),
                Some(a.id),
                a.allocated_at,
                None,
            );
        }
    }

    fn record(
        &self,
        action: AuditAction,
        request_id: RequestId,
        resource_id: Option<u64>,
        allocation_id: Option<AllocationId>,
        at: TimestampMs,
        payload: Option<String>,
    ) {
        self.inner.audit.lock().record(build_audit_event(
            action,
            request_id,
            resource_id,
            allocation_id,
            at,
            payload,
        ));
    }
}

impl<Q: RequestQueue + 'static> SchedulerService<Q> {
    /// Start the periodic re-evaluation on a dedicated OS thread.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the thread cannot be spawned.
    pub fn start_ticker_thread(&self) -> std::io::Result<TickerHandle> {
        let service = self.clone();
        spawn_thread_ticker(self.inner.published.tick_interval(), move || {
            service.tick();
        })
    }

    /// Start the periodic re-evaluation as an async task.
    #[cfg(feature = "tokio-runtime")]
    pub fn spawn_ticker<S: crate::core::ticker::Spawn>(&self, spawner: &S) -> TickerHandle {
        let service = self.clone();
        let period = self.inner.published.tick_interval();
        crate::core::ticker::spawn_async_ticker(spawner, period, move || {
            service.tick();
        })
    }
}
