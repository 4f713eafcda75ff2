//! Builder to construct a scheduler service from configuration.

use std::sync::Arc;

use crate::config::{ConfigError, SchedulerConfig};
use crate::core::{AuditSink, NoopAuditSink, RequestQueue, ResourceRegistry, SchedulerService};
use crate::infra::queue::InMemoryRequestQueue;
use crate::util::clock::{Clock, SystemClock};
use crate::util::serde::ResourceType;

/// Seed a registry from the fleet definition. Ids run from 1 in
/// configuration order and labels are `{TYPE}-{id}`.
pub fn build_registry(cfg: &SchedulerConfig) -> ResourceRegistry {
    let mut registry = ResourceRegistry::new();
    let mut next_id = 1;
    for fleet in &cfg.resources {
        let resource_type = ResourceType::new(&fleet.resource_type);
        for _ in 0..fleet.count {
            registry.insert(next_id, format!("{resource_type}-{next_id}"), resource_type.clone());
            next_id += 1;
        }
    }
    registry
}

/// Config-driven construction with optional overrides for clock and audit.
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    clock: Option<Arc<dyn Clock>>,
    audit: Option<Box<dyn AuditSink>>,
}

impl SchedulerBuilder {
    /// Start from a configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            clock: None,
            audit: None,
        }
    }

    /// The configuration being built.
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Use a specific clock instead of the system clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Build with the in-memory queue sized from `max_queue_depth`.
    ///
    /// # Errors
    ///
    /// Configuration that fails validation.
    pub fn build(self) -> Result<SchedulerService<InMemoryRequestQueue>, ConfigError> {
        let queue = InMemoryRequestQueue::new(self.config.max_queue_depth);
        self.build_with_queue(queue)
    }

    /// Build around a caller-supplied queue backend.
    ///
    /// # Errors
    ///
    /// Configuration that fails validation.
    pub fn build_with_queue<Q: RequestQueue>(
        self,
        queue: Q,
    ) -> Result<SchedulerService<Q>, ConfigError> {
        self.config.validate()?;
        let registry = build_registry(&self.config);
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let audit = self.audit.unwrap_or_else(|| Box::new(NoopAuditSink));
        Ok(SchedulerService::new(
            registry,
            queue,
            clock,
            self.config.published(),
            audit,
        ))
    }
}
