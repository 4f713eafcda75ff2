//! Request queue abstraction.

use crate::core::aging::AgingPolicy;
use crate::core::model::{RankedRequest, Request};
use crate::core::SchedulerError;
use crate::util::serde::{RequestId, TimestampMs};

/// Abstraction for queue backends holding status=queued requests.
pub trait RequestQueue: Send + Sync {
    /// Append a queued request if space permits.
    ///
    /// # Errors
    ///
    /// `QueueFull` at max depth; `Conflict` if the id is already queued.
    fn enqueue(&mut self, request: Request) -> Result<(), SchedulerError>;
    /// Remove a request by id, returning it if it was queued.
    fn remove(&mut self, id: RequestId) -> Option<Request>;
    /// Queued requests ranked by effective priority at `now` (most urgent
    /// first), ties broken by `requested_at` then id.
    fn snapshot(&self, now: TimestampMs, policy: &AgingPolicy) -> Vec<RankedRequest>;
    /// Maximum depth allowed for this queue.
    fn max_depth(&self) -> usize;
    /// Current depth.
    fn len(&self) -> usize;
    /// True when nothing is queued.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Matching order shared by every queue backend.
pub fn rank(
    requests: impl IntoIterator<Item = Request>,
    now: TimestampMs,
    policy: &AgingPolicy,
) -> Vec<RankedRequest> {
    let mut ranked: Vec<RankedRequest> = requests
        .into_iter()
        .map(|request| RankedRequest {
            effective_priority: policy.effective(request.priority, request.requested_at, now),
            request,
        })
        .collect();
    ranked.sort_by(|a, b| {
        a.effective_priority
            .cmp(&b.effective_priority)
            .then(a.request.requested_at.cmp(&b.request.requested_at))
            .then(a.request.id.cmp(&b.request.id))
    });
    ranked
}
