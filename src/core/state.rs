//! The single aggregate guarded by the scheduler lock.

use std::collections::BTreeMap;

use crate::core::ledger::AllocationLedger;
use crate::core::model::{Allocation, NewRequest, Request, RequestStatus};
use crate::core::queue::RequestQueue;
use crate::core::registry::ResourceRegistry;
use crate::core::SchedulerError;
use crate::util::serde::{AllocationId, RequestId, TimestampMs};

/// Queue, registry, ledger and request history, mutated only together
/// under one exclusive lock.
#[derive(Debug)]
pub struct SchedulerState<Q> {
    /// Resource fleet.
    pub registry: ResourceRegistry,
    /// Pending requests.
    pub queue: Q,
    /// Active allocations.
    pub ledger: AllocationLedger,
    history: BTreeMap<RequestId, Request>,
    next_request_id: RequestId,
    next_allocation_id: AllocationId,
    submitted_total: u64,
    released_total: u64,
}

impl<Q: RequestQueue> SchedulerState<Q> {
    /// Assemble state around a seeded registry and an empty queue.
    pub fn new(registry: ResourceRegistry, queue: Q) -> Self {
        Self {
            registry,
            queue,
            ledger: AllocationLedger::new(),
            history: BTreeMap::new(),
            next_request_id: 1,
            next_allocation_id: 1,
            submitted_total: 0,
            released_total: 0,
        }
    }

    /// Assign an id, stamp `requested_at`, and enqueue. Nothing changes if
    /// the queue rejects the request.
    ///
    /// # Errors
    ///
    /// Whatever the queue backend returns, typically `QueueFull`.
    pub fn admit(&mut self, new: NewRequest, now: TimestampMs) -> Result<Request, SchedulerError> {
        let request = Request::queued(self.next_request_id, new, now);
        self.queue.enqueue(request.clone())?;
        self.next_request_id += 1;
        self.submitted_total += 1;
        self.history.insert(request.id, request.clone());
        Ok(request)
    }

    /// Admit several requests with one `requested_at`, all or nothing. If
    /// the queue rejects any of them, the ones already admitted are taken
    /// back out and ids and counters are restored.
    ///
    /// # Errors
    ///
    /// The first error the queue backend returns.
    pub fn admit_all(
        &mut self,
        batch: Vec<NewRequest>,
        now: TimestampMs,
    ) -> Result<Vec<Request>, SchedulerError> {
        let mut admitted: Vec<Request> = Vec::with_capacity(batch.len());
        for new in batch {
            match self.admit(new, now) {
                Ok(request) => admitted.push(request),
                Err(e) => {
                    tracing::warn!(
                        admitted = admitted.len(),
                        error = %e,
                        "batch rejected by queue; rolling back"
                    );
                    self.unadmit(&admitted);
                    return Err(e);
                }
            }
        }
        Ok(admitted)
    }

    fn unadmit(&mut self, admitted: &[Request]) {
        for request in admitted.iter().rev() {
            self.queue.remove(request.id);
            self.history.remove(&request.id);
            self.submitted_total -= 1;
        }
        if let Some(first) = admitted.first() {
            self.next_request_id = first.id;
        }
    }

    /// Room left in the queue.
    pub fn queue_capacity_left(&self) -> usize {
        self.queue.max_depth().saturating_sub(self.queue.len())
    }

    /// Reserve the next allocation id.
    pub(crate) fn take_allocation_id(&mut self) -> AllocationId {
        let id = self.next_allocation_id;
        self.next_allocation_id += 1;
        id
    }

    /// Flip a request's history entry to allocated.
    pub(crate) fn mark_request_allocated(&mut self, id: RequestId, at: TimestampMs) {
        if let Some(entry) = self.history.get_mut(&id) {
            entry.status = RequestStatus::Allocated;
            entry.allocated_at = Some(at);
        }
    }

    /// Remove an allocation and free its resource as one unit.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown or already released allocation. If the
    /// resource cannot be freed the allocation is put back.
    pub fn release(&mut self, allocation_id: AllocationId) -> Result<Allocation, SchedulerError> {
        let allocation = self.ledger.remove(allocation_id)?;
        if let Err(e) = self.registry.mark_free(allocation.resource_id) {
            tracing::error!(
                allocation_id,
                resource_id = allocation.resource_id,
                error = %e,
                "release could not free resource; restoring allocation"
            );
            self.ledger.insert(allocation)?;
            return Err(e);
        }
        self.released_total += 1;
        Ok(allocation)
    }

    /// Every request ever submitted, ordered by submission.
    pub fn history(&self) -> Vec<Request> {
        let mut all: Vec<_> = self.history.values().cloned().collect();
        all.sort_by(|a, b| a.requested_at.cmp(&b.requested_at).then(a.id.cmp(&b.id)));
        all
    }

    /// Look up a request in the history.
    pub fn request(&self, id: RequestId) -> Option<&Request> {
        self.history.get(&id)
    }

    /// Requests accepted so far.
    pub const fn submitted_total(&self) -> u64 {
        self.submitted_total
    }

    /// Allocations released so far.
    pub const fn released_total(&self) -> u64 {
        self.released_total
    }
}
