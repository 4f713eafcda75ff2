//! Greedy matching pass.
//!
//! Walks the queue once in (effective priority, `requested_at`) order and
//! binds each request to the lowest-id free resource of its type. Requests
//! without a free resource stay queued. A request never loses its place to
//! a less urgent one, and freeing resources can only add matches, so one
//! ordered traversal per trigger suffices.

use crate::core::aging::AgingPolicy;
use crate::core::model::{Allocation, RankedRequest};
use crate::core::queue::RequestQueue;
use crate::core::state::SchedulerState;
use crate::core::SchedulerError;
use crate::util::serde::TimestampMs;

/// Run one pass and return the allocations it created, in bind order.
///
/// Bind failures are internal consistency errors: they are logged, the
/// failed bind is rolled back, and the pass moves on.
pub fn run_pass<Q: RequestQueue>(
    state: &mut SchedulerState<Q>,
    now: TimestampMs,
    policy: &AgingPolicy,
) -> Vec<Allocation> {
    if state.queue.is_empty() {
        return Vec::new();
    }

    let ranked = state.queue.snapshot(now, policy);
    let mut created = Vec::new();

    for candidate in ranked {
        match bind(state, &candidate, now) {
            Ok(Some(allocation)) => {
                tracing::info!(
                    allocation_id = allocation.id,
                    request_id = allocation.request_id,
                    resource_id = allocation.resource_id,
                    resource = %allocation.resource_label,
                    effective_priority = candidate.effective_priority,
                    "allocated"
                );
                created.push(allocation);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(
                    request_id = candidate.request.id,
                    error = %e,
                    "bind failed; request left queued"
                );
            }
        }
    }

    tracing::debug!(
        allocated = created.len(),
        still_queued = state.queue.len(),
        "allocation pass complete"
    );
    created
}

/// Bind one request if a resource of its type is free. All or nothing.
fn bind<Q: RequestQueue>(
    state: &mut SchedulerState<Q>,
    candidate: &RankedRequest,
    now: TimestampMs,
) -> Result<Option<Allocation>, SchedulerError> {
    let request = &candidate.request;
    let Some(resource) = state.registry.find_free(&request.required_resource) else {
        return Ok(None);
    };
    let (resource_id, resource_label, resource_type) = (
        resource.id,
        resource.label.clone(),
        resource.resource_type.clone(),
    );

    state.registry.mark_busy(resource_id)?;

    let Some(queued) = state.queue.remove(request.id) else {
        state.registry.mark_free(resource_id)?;
        return Err(SchedulerError::NotFound {
            kind: "request",
            id: request.id,
        });
    };

    let allocation = Allocation {
        id: state.take_allocation_id(),
        request_id: queued.id,
        name: queued.name.clone(),
        priority: queued.priority,
        required_resource: queued.required_resource.clone(),
        est_minutes: queued.est_minutes,
        resource_id,
        resource_label,
        resource_type,
        allocated_at: now,
    };

    if let Err(e) = state.ledger.insert(allocation.clone()) {
        state.registry.mark_free(resource_id)?;
        state.queue.enqueue(queued)?;
        return Err(e);
    }

    state.mark_request_allocated(allocation.request_id, now);
    Ok(Some(allocation))
}
