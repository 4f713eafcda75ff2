//! Tests for error types

use aging_scheduler::core::SchedulerError;

#[test]
fn test_validation_error() {
    let err = SchedulerError::Validation("priority must be a positive integer, got 0".to_string());
    assert_eq!(
        format!("{}", err),
        "validation failed: priority must be a positive integer, got 0"
    );
    assert_eq!(err.kind(), "validation");
}

#[test]
fn test_not_found_error() {
    let err = SchedulerError::allocation_not_found(42);
    assert_eq!(format!("{}", err), "allocation 42 not found");
    assert_eq!(err.kind(), "not_found");

    let err = SchedulerError::resource_not_found(7);
    assert_eq!(format!("{}", err), "resource 7 not found");
}

#[test]
fn test_conflict_error() {
    let err = SchedulerError::Conflict("resource 1 (MRI-1) is already busy".to_string());
    assert_eq!(format!("{}", err), "conflict: resource 1 (MRI-1) is already busy");
}

#[test]
fn test_queue_full_error() {
    let err = SchedulerError::QueueFull(10);
    assert_eq!(format!("{}", err), "queue full: max depth 10 reached");
    assert_eq!(err.kind(), "queue_full");
}
