//! Scheduler configuration structures.

use std::collections::HashSet;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::core::aging::DEFAULT_AGING_INTERVAL_SECS;
use crate::core::PublishedConfig;
use crate::core::AppResult;
use crate::util::telemetry::init_tracing_with_default;

/// Errors raised while parsing or validating configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A field has an unusable value.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// Input could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// A group of identical resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFleetConfig {
    /// Type tag shared by the group.
    pub resource_type: String,
    /// How many resources of this type exist.
    pub count: u32,
}

impl ResourceFleetConfig {
    /// Convenience constructor.
    pub fn new(resource_type: impl Into<String>, count: u32) -> Self {
        Self {
            resource_type: resource_type.into(),
            count,
        }
    }
}

/// Root scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds of waiting per unit of priority boost.
    pub aging_interval_secs: u64,
    /// Period of the re-evaluation tick in milliseconds.
    pub tick_interval_ms: u64,
    /// Maximum queued requests before submissions are rejected.
    pub max_queue_depth: usize,
    /// Fallback log level when `RUST_LOG` is unset.
    pub log_level: String,
    /// Resource fleet, seeded in this order.
    pub resources: Vec<ResourceFleetConfig>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            aging_interval_secs: DEFAULT_AGING_INTERVAL_SECS,
            tick_interval_ms: 5_000,
            max_queue_depth: 10_000,
            log_level: "info".into(),
            resources: vec![
                ResourceFleetConfig::new("ICU_BED", 5),
                ResourceFleetConfig::new("VENTILATOR", 2),
            ],
        }
    }
}

impl SchedulerConfig {
    /// Validate values and the fleet definition.
    ///
    /// # Errors
    ///
    /// The first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aging_interval_secs == 0 {
            return Err(ConfigError::invalid("aging_interval_secs", "must be greater than 0"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::invalid("tick_interval_ms", "must be greater than 0"));
        }
        if self.max_queue_depth == 0 {
            return Err(ConfigError::invalid("max_queue_depth", "must be greater than 0"));
        }
        if let Err(e) = EnvFilter::try_new(&self.log_level) {
            return Err(ConfigError::invalid("log_level", e.to_string()));
        }
        let mut seen = HashSet::new();
        for fleet in &self.resources {
            let tag = fleet.resource_type.trim();
            if tag.is_empty() {
                return Err(ConfigError::invalid("resources", "resource_type must not be empty"));
            }
            if !seen.insert(tag.to_string()) {
                return Err(ConfigError::invalid(
                    "resources",
                    format!("resource_type `{tag}` listed more than once"),
                ));
            }
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed JSON, `Invalid` for bad values.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the environment (and `.env`, if present),
    /// starting from defaults.
    ///
    /// Recognized variables: `SCHEDULER_AGING_INTERVAL_SECS`,
    /// `SCHEDULER_TICK_INTERVAL_MS`, `SCHEDULER_MAX_QUEUE_DEPTH`,
    /// `SCHEDULER_LOG_LEVEL`, and `SCHEDULER_RESOURCES` as
    /// `TYPE=count,TYPE=count`.
    ///
    /// # Errors
    ///
    /// Unparsable values or a configuration that fails validation.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from any lookup,
    /// which keeps tests independent of process environment.
    ///
    /// # Errors
    ///
    /// Unparsable values or a configuration that fails validation.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("SCHEDULER_AGING_INTERVAL_SECS") {
            cfg.aging_interval_secs = v
                .trim()
                .parse()
                .context("SCHEDULER_AGING_INTERVAL_SECS must be an integer (seconds).")?;
        }
        if let Some(v) = lookup("SCHEDULER_TICK_INTERVAL_MS") {
            cfg.tick_interval_ms = v
                .trim()
                .parse()
                .context("SCHEDULER_TICK_INTERVAL_MS must be an integer (milliseconds).")?;
        }
        if let Some(v) = lookup("SCHEDULER_MAX_QUEUE_DEPTH") {
            cfg.max_queue_depth = v
                .trim()
                .parse()
                .context("SCHEDULER_MAX_QUEUE_DEPTH must be an integer.")?;
        }
        if let Some(v) = lookup("SCHEDULER_LOG_LEVEL") {
            cfg.log_level = v.trim().to_string();
        }
        if let Some(v) = lookup("SCHEDULER_RESOURCES") {
            cfg.resources = parse_fleet(&v)
                .context("SCHEDULER_RESOURCES must look like `TYPE=count,TYPE=count`.")?;
        }

        cfg.validate().context("invalid scheduler configuration")?;
        Ok(cfg)
    }

    /// Install the default tracing subscriber, using `log_level` when
    /// `RUST_LOG` is unset. Returns `false` if a subscriber was already
    /// installed, in which case nothing changes.
    pub fn init_tracing(&self) -> bool {
        init_tracing_with_default(&self.log_level)
    }

    /// Total number of resources the fleet defines.
    pub fn total_resources(&self) -> u64 {
        self.resources.iter().map(|f| u64::from(f.count)).sum()
    }

    /// The subset of configuration clients must share.
    pub const fn published(&self) -> PublishedConfig {
        PublishedConfig {
            aging_interval_secs: self.aging_interval_secs,
            tick_interval_ms: self.tick_interval_ms,
        }
    }
}

fn parse_fleet(input: &str) -> Result<Vec<ResourceFleetConfig>, ConfigError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (tag, count) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::Parse(format!("missing `=` in `{entry}`")))?;
            let count = count
                .trim()
                .parse()
                .map_err(|e| ConfigError::Parse(format!("bad count in `{entry}`: {e}")))?;
            Ok(ResourceFleetConfig::new(tag.trim(), count))
        })
        .collect()
}
