//! API-facing request/response models.
//!
//! Field names follow the JSON the dashboard already speaks, so an HTTP
//! binding only has to route and (de)serialize.

use serde::{Deserialize, Serialize};

use crate::core::model::ANONYMOUS;
use crate::core::{
    Allocation, RequestQueue, RequestStatus, SchedulerError, SchedulerService, Submission,
};
use crate::util::serde::{AllocationId, RequestId, ResourceType, TimestampMs};

/// Base priority used when a submission omits one.
pub const DEFAULT_PRIORITY: i64 = 3;
/// Resource type used when a submission omits one.
pub const DEFAULT_RESOURCE_TYPE: &str = "ICU_BED";
/// Estimate used when a submission omits one.
pub const DEFAULT_EST_MINUTES: i64 = 60;

/// An integer field as the dashboard form sends it: either a JSON number
/// or the raw text of the input, such as `"2"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    /// A JSON number.
    Int(i64),
    /// Text to be parsed as an integer.
    Text(String),
}

impl IntOrString {
    /// Resolve to an integer.
    ///
    /// # Errors
    ///
    /// `Validation` naming `field` when the text is not an integer.
    pub fn to_int(&self, field: &str) -> Result<i64, SchedulerError> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::Text(raw) => raw.trim().parse().map_err(|_| {
                SchedulerError::Validation(format!("{field} must be an integer, got `{raw}`"))
            }),
        }
    }
}

impl From<i64> for IntOrString {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

/// Submission payload; every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequestPayload {
    /// Requester name.
    pub name: Option<String>,
    /// Base priority.
    pub priority: Option<IntOrString>,
    /// Requested resource type.
    pub resource_type: Option<String>,
    /// Estimated minutes.
    pub est_minutes: Option<IntOrString>,
}

impl SubmitRequestPayload {
    /// Fill in defaults for missing fields and resolve numeric text.
    ///
    /// # Errors
    ///
    /// `Validation` if `priority` or `est_minutes` is text that does not
    /// parse as an integer.
    pub fn into_submission(self) -> Result<Submission, SchedulerError> {
        let priority = match &self.priority {
            Some(v) => v.to_int("priority")?,
            None => DEFAULT_PRIORITY,
        };
        let est_minutes = match &self.est_minutes {
            Some(v) => v.to_int("est_minutes")?,
            None => DEFAULT_EST_MINUTES,
        };
        Ok(Submission {
            name: self.name.unwrap_or_else(|| ANONYMOUS.to_string()),
            priority,
            resource_type: self
                .resource_type
                .unwrap_or_else(|| DEFAULT_RESOURCE_TYPE.to_string()),
            est_minutes,
        })
    }
}

/// Response to a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Assigned request id.
    pub request_id: RequestId,
    /// Always `queued` at submission time.
    pub status: RequestStatus,
    /// Assigned submission time.
    pub requested_at: TimestampMs,
}

/// Release command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasePayload {
    /// Allocation to release.
    pub allocation_id: AllocationId,
}

/// Response to a successful release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// Always `released`.
    pub status: String,
    /// The allocation that was released.
    pub allocation: Allocation,
}

/// Error body with a status code suitable for HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error class (`validation`, `not_found`, `conflict`, `queue_full`).
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// Suggested HTTP status code.
    pub status_code: u16,
}

impl From<&SchedulerError> for ErrorResponse {
    fn from(err: &SchedulerError) -> Self {
        let status_code = match err {
            SchedulerError::Validation(_) => 400,
            SchedulerError::NotFound { .. } => 404,
            SchedulerError::Conflict(_) => 409,
            SchedulerError::QueueFull(_) => 503,
        };
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            status_code,
        }
    }
}

/// One queued request as a dashboard row, with the aged priority the
/// server computed using its published interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntryView {
    /// Request id.
    pub id: RequestId,
    /// Requester name.
    pub name: String,
    /// Requested resource type.
    pub required_resource: ResourceType,
    /// Base priority.
    pub priority: u32,
    /// Whole seconds waited so far.
    pub wait_seconds: u64,
    /// Effective priority now.
    pub effective_priority: u32,
    /// Submission time.
    pub requested_at: TimestampMs,
}

/// Health response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Submit a payload.
///
/// # Errors
///
/// The scheduler error mapped to an [`ErrorResponse`].
pub fn submit<Q: RequestQueue>(
    service: &SchedulerService<Q>,
    payload: SubmitRequestPayload,
) -> Result<SubmitResponse, ErrorResponse> {
    let request = payload
        .into_submission()
        .and_then(|submission| service.submit(&submission))
        .map_err(|e| ErrorResponse::from(&e))?;
    Ok(SubmitResponse {
        request_id: request.id,
        status: request.status,
        requested_at: request.requested_at,
    })
}

/// Release an allocation.
///
/// # Errors
///
/// The scheduler error mapped to an [`ErrorResponse`].
pub fn release<Q: RequestQueue>(
    service: &SchedulerService<Q>,
    payload: ReleasePayload,
) -> Result<ReleaseResponse, ErrorResponse> {
    let allocation = service
        .release(payload.allocation_id)
        .map_err(|e| ErrorResponse::from(&e))?;
    Ok(ReleaseResponse {
        status: "released".into(),
        allocation,
    })
}

/// Queue rows in matching order with wait time and aged priority.
pub fn queue_view<Q: RequestQueue>(service: &SchedulerService<Q>) -> Vec<QueueEntryView> {
    let (now, ranked) = service.queue_snapshot();
    ranked
        .into_iter()
        .map(|ranked| QueueEntryView {
            id: ranked.request.id,
            wait_seconds: crate::core::aging::wait_seconds(ranked.request.requested_at, now),
            effective_priority: ranked.effective_priority,
            name: ranked.request.name,
            required_resource: ranked.request.required_resource,
            priority: ranked.request.priority,
            requested_at: ranked.request.requested_at,
        })
        .collect()
}

/// Return a health payload.
pub const fn health() -> Health {
    Health { ok: true }
}
