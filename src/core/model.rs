//! Resources, requests and allocations.

use serde::{Deserialize, Serialize};

use crate::util::serde::{AllocationId, RequestId, ResourceId, ResourceType, TimestampMs};

/// Whether a resource is available for allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    /// Available for allocation.
    Free,
    /// Held by exactly one active allocation.
    Busy,
}

/// An allocatable resource (bed, bay, machine, station).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource identifier.
    pub id: ResourceId,
    /// Human-readable label, e.g. `ICU_BED-3`.
    pub label: String,
    /// Type tag matched against requests.
    pub resource_type: ResourceType,
    /// Current status.
    pub status: ResourceStatus,
}

impl Resource {
    /// True when the resource can be allocated.
    pub fn is_free(&self) -> bool {
        self.status == ResourceStatus::Free
    }
}

/// Lifecycle of a request. A request becomes `Allocated` at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Waiting in the queue.
    Queued,
    /// Bound to a resource; no longer schedulable.
    Allocated,
}

/// Validated fields of a submission, before an id and timestamp are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    /// Requester name.
    pub name: String,
    /// Base priority, smaller is more urgent.
    pub priority: u32,
    /// Type of resource needed.
    pub required_resource: ResourceType,
    /// Estimated minutes the resource will be held.
    pub est_minutes: u32,
}

/// A request for one resource of a given type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Request identifier.
    pub id: RequestId,
    /// Requester name.
    pub name: String,
    /// Base priority, smaller is more urgent.
    pub priority: u32,
    /// Type of resource needed.
    pub required_resource: ResourceType,
    /// Estimated minutes the resource will be held.
    pub est_minutes: u32,
    /// Submission time.
    pub requested_at: TimestampMs,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Set when the request is bound to a resource.
    pub allocated_at: Option<TimestampMs>,
}

impl Request {
    /// Materialize a queued request from a validated submission.
    pub fn queued(id: RequestId, new: NewRequest, requested_at: TimestampMs) -> Self {
        Self {
            id,
            name: new.name,
            priority: new.priority,
            required_resource: new.required_resource,
            est_minutes: new.est_minutes,
            requested_at,
            status: RequestStatus::Queued,
            allocated_at: None,
        }
    }
}

/// An active binding of a request to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocation identifier.
    pub id: AllocationId,
    /// Originating request.
    pub request_id: RequestId,
    /// Requester name at bind time.
    pub name: String,
    /// Base priority of the request.
    pub priority: u32,
    /// Type the request asked for.
    pub required_resource: ResourceType,
    /// Estimated minutes of the request.
    pub est_minutes: u32,
    /// Bound resource.
    pub resource_id: ResourceId,
    /// Label of the bound resource.
    pub resource_label: String,
    /// Type of the bound resource; always equals `required_resource`.
    pub resource_type: ResourceType,
    /// Bind time.
    pub allocated_at: TimestampMs,
}

/// A queued request alongside the effective priority it was ranked with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRequest {
    /// The queued request.
    pub request: Request,
    /// Effective priority at snapshot time.
    pub effective_priority: u32,
}

/// Default name for anonymous submissions.
pub const ANONYMOUS: &str = "Anonymous";

/// Raw submission as received from a caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Requester name; blank becomes [`ANONYMOUS`].
    pub name: String,
    /// Base priority; must be a positive integer.
    pub priority: i64,
    /// Requested resource type; must not be blank.
    pub resource_type: String,
    /// Estimated minutes; must not be negative.
    pub est_minutes: i64,
}

impl Submission {
    /// Convenience constructor.
    pub fn new(
        name: impl Into<String>,
        priority: i64,
        resource_type: impl Into<String>,
        est_minutes: i64,
    ) -> Self {
        Self {
            name: name.into(),
            priority,
            resource_type: resource_type.into(),
            est_minutes,
        }
    }

    /// Check the submission and normalize it.
    ///
    /// # Errors
    ///
    /// `Validation` if the priority is not a positive integer, the resource
    /// type is blank, or the estimate is negative.
    pub fn validate(&self) -> Result<NewRequest, crate::core::SchedulerError> {
        use crate::core::SchedulerError;

        let priority = u32::try_from(self.priority)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| {
                SchedulerError::Validation(format!(
                    "priority must be a positive integer, got {}",
                    self.priority
                ))
            })?;
        let required_resource = ResourceType::new(&self.resource_type);
        if required_resource.is_empty() {
            return Err(SchedulerError::Validation("resource_type must not be empty".into()));
        }
        let est_minutes = u32::try_from(self.est_minutes).map_err(|_| {
            SchedulerError::Validation(format!(
                "est_minutes must be a non-negative integer, got {}",
                self.est_minutes
            ))
        })?;
        let name = match self.name.trim() {
            "" => ANONYMOUS.to_string(),
            trimmed => trimmed.to_string(),
        };
        Ok(NewRequest {
            name,
            priority,
            required_resource,
            est_minutes,
        })
    }
}
