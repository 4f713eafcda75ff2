//! Tests for configuration validation

use std::collections::HashMap;

use aging_scheduler::config::{ConfigError, ResourceFleetConfig, SchedulerConfig};

#[test]
fn test_default_config_is_valid() {
    let cfg = SchedulerConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.aging_interval_secs, 30);
    assert_eq!(cfg.tick_interval_ms, 5_000);
    assert_eq!(cfg.total_resources(), 7);
}

#[test]
fn test_zero_aging_interval_rejected() {
    let cfg = SchedulerConfig {
        aging_interval_secs: 0,
        ..SchedulerConfig::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::Invalid { field: "aging_interval_secs", .. })
    ));
}

#[test]
fn test_zero_tick_and_depth_rejected() {
    let cfg = SchedulerConfig {
        tick_interval_ms: 0,
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = SchedulerConfig {
        max_queue_depth: 0,
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_duplicate_or_blank_fleet_types_rejected() {
    let cfg = SchedulerConfig {
        resources: vec![ResourceFleetConfig::new("MRI", 1), ResourceFleetConfig::new(" MRI ", 2)],
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = SchedulerConfig {
        resources: vec![ResourceFleetConfig::new("  ", 1)],
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_empty_fleet_is_allowed() {
    let cfg = SchedulerConfig {
        resources: Vec::new(),
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "aging_interval_secs": 10,
        "resources": [
            { "resource_type": "MRI", "count": 2 },
            { "resource_type": "CT", "count": 1 }
        ]
    }"#;

    let cfg = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.aging_interval_secs, 10);
    assert_eq!(cfg.tick_interval_ms, 5_000);
    assert_eq!(cfg.total_resources(), 3);
    assert_eq!(cfg.published().aging_interval_secs, 10);
}

#[test]
fn test_scheduler_config_from_bad_json() {
    assert!(matches!(
        SchedulerConfig::from_json_str("{ not json"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        SchedulerConfig::from_json_str(r#"{"aging_interval_secs": 0}"#),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn test_config_from_lookup() {
    let vars: HashMap<&str, &str> = [
        ("SCHEDULER_AGING_INTERVAL_SECS", "45"),
        ("SCHEDULER_TICK_INTERVAL_MS", "250"),
        ("SCHEDULER_MAX_QUEUE_DEPTH", "8"),
        ("SCHEDULER_LOG_LEVEL", "debug"),
        ("SCHEDULER_RESOURCES", "XRAY=2,BAY=3"),
    ]
    .into_iter()
    .collect();

    let cfg = SchedulerConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
    assert_eq!(cfg.aging_interval_secs, 45);
    assert_eq!(cfg.tick_interval_ms, 250);
    assert_eq!(cfg.max_queue_depth, 8);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(
        cfg.resources,
        vec![ResourceFleetConfig::new("XRAY", 2), ResourceFleetConfig::new("BAY", 3)]
    );
}

#[test]
fn test_config_from_lookup_rejects_garbage() {
    let err = SchedulerConfig::from_lookup(|k| {
        (k == "SCHEDULER_AGING_INTERVAL_SECS").then(|| "soon".to_string())
    });
    assert!(err.is_err());

    let err = SchedulerConfig::from_lookup(|k| {
        (k == "SCHEDULER_RESOURCES").then(|| "MRI".to_string())
    });
    assert!(err.is_err());
}

#[test]
fn test_config_from_empty_lookup_is_default() {
    let cfg = SchedulerConfig::from_lookup(|_| None).unwrap();
    assert_eq!(cfg, SchedulerConfig::default());
}

#[test]
fn test_unparsable_log_level_rejected() {
    let cfg = SchedulerConfig {
        log_level: "aging_scheduler=loud".into(),
        ..SchedulerConfig::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::Invalid { field: "log_level", .. })
    ));

    let cfg = SchedulerConfig {
        log_level: "warn,aging_scheduler=debug".into(),
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_ok());
}
