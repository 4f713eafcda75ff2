//! Tests for the API models

use std::sync::Arc;
use std::time::Duration;

use aging_scheduler::builders::SchedulerBuilder;
use aging_scheduler::config::{ResourceFleetConfig, SchedulerConfig};
use aging_scheduler::core::{RequestStatus, SchedulerError};
use aging_scheduler::runtime::api::{
    self, ErrorResponse, IntOrString, ReleasePayload, SubmitRequestPayload, DEFAULT_EST_MINUTES,
};
use aging_scheduler::util::ManualClock;

fn service(clock: Arc<ManualClock>) -> aging_scheduler::core::SchedulerService {
    SchedulerBuilder::new(SchedulerConfig {
        resources: vec![ResourceFleetConfig::new("ICU_BED", 1)],
        ..SchedulerConfig::default()
    })
    .with_clock(clock)
    .build()
    .unwrap()
}

#[test]
fn test_payload_defaults() {
    let payload: SubmitRequestPayload = serde_json::from_str("{}").unwrap();
    let submission = payload.into_submission().unwrap();
    assert_eq!(submission.name, "Anonymous");
    assert_eq!(submission.priority, 3);
    assert_eq!(submission.resource_type, "ICU_BED");
    assert_eq!(submission.est_minutes, DEFAULT_EST_MINUTES);
}

#[test]
fn test_submit_release_roundtrip_through_api() {
    let clock = Arc::new(ManualClock::new(0));
    let svc = service(Arc::clone(&clock));

    let first = api::submit(&svc, SubmitRequestPayload::default()).unwrap();
    assert_eq!(first.status, RequestStatus::Queued);
    let second = api::submit(
        &svc,
        SubmitRequestPayload {
            name: Some("Grace".into()),
            priority: Some(5.into()),
            ..SubmitRequestPayload::default()
        },
    )
    .unwrap();

    clock.advance(Duration::from_secs(95));
    let rows = api::queue_view(&svc);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, second.request_id);
    assert_eq!(rows[0].wait_seconds, 95);
    assert_eq!(rows[0].effective_priority, 2);

    let allocation_id = svc.list_allocations()[0].id;
    let released = api::release(&svc, ReleasePayload { allocation_id }).unwrap();
    assert_eq!(released.status, "released");
    assert_eq!(released.allocation.request_id, first.request_id);
    assert!(api::queue_view(&svc).is_empty());
}

#[test]
fn test_errors_map_to_status_codes() {
    let svc = service(Arc::new(ManualClock::new(0)));

    let err = api::submit(
        &svc,
        SubmitRequestPayload {
            priority: Some(0.into()),
            ..SubmitRequestPayload::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.status_code, 400);
    assert_eq!(err.kind, "validation");

    let err = api::release(&svc, ReleasePayload { allocation_id: 99 }).unwrap_err();
    assert_eq!(err.status_code, 404);

    let conflict = ErrorResponse::from(&SchedulerError::Conflict("x".into()));
    assert_eq!(conflict.status_code, 409);
    let full = ErrorResponse::from(&SchedulerError::QueueFull(1));
    assert_eq!(full.status_code, 503);
}

#[test]
fn test_release_payload_wire_format() {
    let payload: ReleasePayload = serde_json::from_str(r#"{"allocation_id": 3}"#).unwrap();
    assert_eq!(payload.allocation_id, 3);
    assert!(api::health().ok);
}

#[test]
fn test_dashboard_form_body_with_numeric_strings() {
    let clock = Arc::new(ManualClock::new(0));
    let svc = service(Arc::clone(&clock));

    // The dashboard posts form values verbatim, numbers included.
    let body = r#"{"name":"Ada","priority":"2","resource_type":"ICU_BED","est_minutes":"60"}"#;
    let payload: SubmitRequestPayload = serde_json::from_str(body).unwrap();
    assert_eq!(payload.priority, Some(IntOrString::Text("2".into())));

    let submission = payload.clone().into_submission().unwrap();
    assert_eq!(submission.priority, 2);
    assert_eq!(submission.est_minutes, 60);

    let accepted = api::submit(&svc, payload).unwrap();
    let request = svc.get_request(accepted.request_id).unwrap();
    assert_eq!(request.name, "Ada");
    assert_eq!(request.priority, 2);
    assert_eq!(request.est_minutes, 60);
}

#[test]
fn test_numbers_and_padded_text_both_accepted() {
    let body = r#"{"priority": 4, "est_minutes": " 15 "}"#;
    let payload: SubmitRequestPayload = serde_json::from_str(body).unwrap();
    let submission = payload.into_submission().unwrap();
    assert_eq!(submission.priority, 4);
    assert_eq!(submission.est_minutes, 15);
}

#[test]
fn test_non_numeric_text_is_a_validation_error() {
    let svc = service(Arc::new(ManualClock::new(0)));

    let payload: SubmitRequestPayload =
        serde_json::from_str(r#"{"name":"Ada","priority":"urgent"}"#).unwrap();
    let err = api::submit(&svc, payload).unwrap_err();
    assert_eq!(err.status_code, 400);
    assert_eq!(err.kind, "validation");
    assert!(err.message.contains("priority"));

    let payload: SubmitRequestPayload = serde_json::from_str(r#"{"est_minutes":""}"#).unwrap();
    assert!(matches!(
        payload.into_submission(),
        Err(SchedulerError::Validation(_))
    ));
    assert!(svc.list_requests().is_empty());
}
