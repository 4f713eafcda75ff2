//! In-memory request queue ranked by aged priority.

use std::collections::BTreeMap;

use crate::core::aging::AgingPolicy;
use crate::core::model::{RankedRequest, Request, RequestStatus};
use crate::core::queue::{rank, RequestQueue};
use crate::core::SchedulerError;
use crate::util::serde::{RequestId, TimestampMs};

/// In-memory queue keyed by request id.
///
/// Effective priority moves with the clock, so no static heap order holds;
/// ranking happens per snapshot.
#[derive(Debug, Clone)]
pub struct InMemoryRequestQueue {
    max_depth: usize,
    requests: BTreeMap<RequestId, Request>,
}

impl InMemoryRequestQueue {
    /// Create a new in-memory queue with a maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            requests: BTreeMap::new(),
        }
    }

    /// Look up a queued request.
    pub fn get(&self, id: RequestId) -> Option<&Request> {
        self.requests.get(&id)
    }
}

impl RequestQueue for InMemoryRequestQueue {
    fn enqueue(&mut self, request: Request) -> Result<(), SchedulerError> {
        if self.len() >= self.max_depth() {
            return Err(SchedulerError::QueueFull(self.max_depth));
        }
        if request.status != RequestStatus::Queued {
            return Err(SchedulerError::Conflict(format!(
                "request {} is not in queued status",
                request.id
            )));
        }
        if self.requests.contains_key(&request.id) {
            return Err(SchedulerError::Conflict(format!(
                "request {} is already queued",
                request.id
            )));
        }
        self.requests.insert(request.id, request);
        Ok(())
    }

    fn remove(&mut self, id: RequestId) -> Option<Request> {
        self.requests.remove(&id)
    }

    fn snapshot(&self, now: TimestampMs, policy: &AgingPolicy) -> Vec<RankedRequest> {
        rank(self.requests.values().cloned(), now, policy)
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn len(&self) -> usize {
        self.requests.len()
    }
}
