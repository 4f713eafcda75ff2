//! Tests for audit sink

use aging_scheduler::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(
        AuditAction::Submit,
        1,
        None,
        None,
        1_000,
        Some("{\"name\":\"Ada\"}".to_string()),
    );

    sink.record(event);
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].request_id, 1);
    assert_eq!(events[0].action, AuditAction::Submit);
    assert_eq!(events[0].created_at_ms, 1_000);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(AuditAction::Submit, 1, None, None, 1, None));
    sink.record(build_audit_event(AuditAction::Allocate, 1, Some(3), Some(1), 2, None));
    sink.record(build_audit_event(AuditAction::Release, 1, Some(3), Some(1), 3, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, AuditAction::Allocate); // First one popped
    assert_eq!(events[1].action, AuditAction::Release);
}

#[test]
fn test_clones_share_buffer() {
    let sink = InMemoryAuditSink::new(8);
    let mut writer = sink.clone();
    writer.record(build_audit_event(AuditAction::Allocate, 4, Some(2), Some(9), 5, None));
    assert_eq!(sink.events_for(AuditAction::Allocate).len(), 1);
    assert!(sink.events_for(AuditAction::Release).is_empty());
}

#[test]
fn test_event_ids_are_unique() {
    let a = build_audit_event(AuditAction::Submit, 1, None, None, 0, None);
    let b = build_audit_event(AuditAction::Submit, 1, None, None, 0, None);
    assert_ne!(a.event_id, b.event_id);
    assert_eq!(AuditAction::Release.to_string(), "release");
}
