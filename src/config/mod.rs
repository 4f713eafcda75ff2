//! Configuration models for the scheduler and its resource fleet.

pub mod scheduler;

pub use scheduler::{ConfigError, ResourceFleetConfig, SchedulerConfig};
