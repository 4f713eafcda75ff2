//! Allocation ledger: who holds what.

use std::collections::BTreeMap;

use crate::core::model::Allocation;
use crate::core::SchedulerError;
use crate::util::serde::{AllocationId, ResourceId};

/// Active allocations keyed by id.
#[derive(Debug, Default, Clone)]
pub struct AllocationLedger {
    active: BTreeMap<AllocationId, Allocation>,
}

impl AllocationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new allocation.
    ///
    /// # Errors
    ///
    /// `Conflict` if the id is taken or the resource is already held.
    pub fn insert(&mut self, allocation: Allocation) -> Result<(), SchedulerError> {
        if self.active.contains_key(&allocation.id) {
            return Err(SchedulerError::Conflict(format!(
                "allocation {} already exists",
                allocation.id
            )));
        }
        if let Some(holder) = self.holder_of(allocation.resource_id) {
            return Err(SchedulerError::Conflict(format!(
                "resource {} already held by allocation {}",
                allocation.resource_id, holder.id
            )));
        }
        self.active.insert(allocation.id, allocation);
        Ok(())
    }

    /// Remove an allocation, returning it.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is not active.
    pub fn remove(&mut self, id: AllocationId) -> Result<Allocation, SchedulerError> {
        self.active
            .remove(&id)
            .ok_or(SchedulerError::allocation_not_found(id))
    }

    /// Look up an active allocation.
    pub fn get(&self, id: AllocationId) -> Option<&Allocation> {
        self.active.get(&id)
    }

    /// The active allocation holding `resource_id`, if any.
    pub fn holder_of(&self, resource_id: ResourceId) -> Option<&Allocation> {
        self.active.values().find(|a| a.resource_id == resource_id)
    }

    /// Active allocations ordered by id.
    pub fn list(&self) -> Vec<Allocation> {
        self.active.values().cloned().collect()
    }

    /// Number of active allocations.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// True when nothing is allocated.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
