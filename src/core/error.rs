//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Malformed submission, rejected before it reaches the queue.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Unknown allocation or resource id.
    #[error("{kind} {id} not found")]
    NotFound {
        /// What was looked up (`allocation`, `resource`, `request`).
        kind: &'static str,
        /// The id that was not found.
        id: u64,
    },
    /// Internal consistency failure, such as marking a busy resource busy.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Queue is at its configured depth.
    #[error("queue full: max depth {0} reached")]
    QueueFull(usize),
}

impl SchedulerError {
    /// Shorthand for a missing allocation.
    pub const fn allocation_not_found(id: u64) -> Self {
        Self::NotFound {
            kind: "allocation",
            id,
        }
    }

    /// Shorthand for a missing resource.
    pub const fn resource_not_found(id: u64) -> Self {
        Self::NotFound {
            kind: "resource",
            id,
        }
    }

    /// Short machine-readable label for the error class.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Conflict(_) => "conflict",
            Self::QueueFull(_) => "queue_full",
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
