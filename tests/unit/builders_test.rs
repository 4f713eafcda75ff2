//! Tests for builder modules

use std::sync::Arc;

use aging_scheduler::builders::{build_registry, SchedulerBuilder};
use aging_scheduler::config::{ResourceFleetConfig, SchedulerConfig};
use aging_scheduler::core::ResourceStatus;
use aging_scheduler::infra::InMemoryRequestQueue;
use aging_scheduler::util::ManualClock;

#[test]
fn test_registry_seeding_labels_and_ids() {
    let cfg = SchedulerConfig::default();
    let registry = build_registry(&cfg);
    let labels: Vec<_> = registry.list().into_iter().map(|r| r.label).collect();
    assert_eq!(
        labels,
        vec![
            "ICU_BED-1",
            "ICU_BED-2",
            "ICU_BED-3",
            "ICU_BED-4",
            "ICU_BED-5",
            "VENTILATOR-6",
            "VENTILATOR-7"
        ]
    );
    assert!(registry.list().iter().all(|r| r.status == ResourceStatus::Free));
}

#[test]
fn test_builder_uses_config_and_clock() {
    let clock = Arc::new(ManualClock::new(42_000));
    let cfg = SchedulerConfig {
        aging_interval_secs: 12,
        tick_interval_ms: 100,
        resources: vec![ResourceFleetConfig::new("MRI", 1)],
        ..SchedulerConfig::default()
    };
    let builder = SchedulerBuilder::new(cfg).with_clock(clock);
    assert_eq!(builder.config().aging_interval_secs, 12);

    let service = builder.build().unwrap();
    assert_eq!(service.published_config().aging_interval_secs, 12);
    assert_eq!(service.published_config().tick_interval_ms, 100);
    assert_eq!(service.current_time_ms(), 42_000);
    assert_eq!(service.list_resources().len(), 1);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let cfg = SchedulerConfig {
        aging_interval_secs: 0,
        ..SchedulerConfig::default()
    };
    assert!(SchedulerBuilder::new(cfg).build().is_err());
}

#[test]
fn test_builder_with_custom_queue_depth() {
    let service = SchedulerBuilder::new(SchedulerConfig {
        resources: Vec::new(),
        ..SchedulerConfig::default()
    })
    .build_with_queue(InMemoryRequestQueue::new(1))
    .unwrap();

    let s = aging_scheduler::core::Submission::new("a", 1, "MRI", 5);
    assert!(service.submit(&s).is_ok());
    assert!(service.submit(&s).is_err());
}
