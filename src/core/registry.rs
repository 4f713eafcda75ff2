//! Resource registry: the fleet and its busy/free state.

use std::collections::BTreeMap;

use crate::core::model::{Resource, ResourceStatus};
use crate::core::SchedulerError;
use crate::util::serde::{ResourceId, ResourceType};

/// Fixed set of resources keyed by id. Iteration order is id order, which
/// makes "lowest free id" selection deterministic.
#[derive(Debug, Default, Clone)]
pub struct ResourceRegistry {
    resources: BTreeMap<ResourceId, Resource>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a free resource. Replaces any resource with the same id.
    pub fn insert(
        &mut self,
        id: ResourceId,
        label: impl Into<String>,
        resource_type: ResourceType,
    ) {
        self.resources.insert(
            id,
            Resource {
                id,
                label: label.into(),
                resource_type,
                status: ResourceStatus::Free,
            },
        );
    }

    /// All resources with their current status, ordered by id.
    pub fn list(&self) -> Vec<Resource> {
        self.resources.values().cloned().collect()
    }

    /// Look up a resource.
    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(&id)
    }

    /// Lowest-id free resource of the given type.
    pub fn find_free(&self, resource_type: &ResourceType) -> Option<&Resource> {
        self.resources
            .values()
            .find(|r| r.is_free() && &r.resource_type == resource_type)
    }

    /// Mark a free resource busy.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown, `Conflict` if it is already busy.
    pub fn mark_busy(&mut self, id: ResourceId) -> Result<(), SchedulerError> {
        let resource = self
            .resources
            .get_mut(&id)
            .ok_or(SchedulerError::resource_not_found(id))?;
        if resource.status == ResourceStatus::Busy {
            return Err(SchedulerError::Conflict(format!(
                "resource {} ({}) is already busy",
                id, resource.label
            )));
        }
        resource.status = ResourceStatus::Busy;
        Ok(())
    }

    /// Mark a resource free. Freeing a free resource is a logged no-op.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown.
    pub fn mark_free(&mut self, id: ResourceId) -> Result<(), SchedulerError> {
        let resource = self
            .resources
            .get_mut(&id)
            .ok_or(SchedulerError::resource_not_found(id))?;
        if resource.status == ResourceStatus::Free {
            tracing::warn!(resource_id = id, "resource already free");
        }
        resource.status = ResourceStatus::Free;
        Ok(())
    }

    /// Distinct resource types in the fleet.
    pub fn resource_types(&self) -> Vec<ResourceType> {
        let mut types: Vec<_> = self.resources.values().map(|r| r.resource_type.clone()).collect();
        types.sort();
        types.dedup();
        types
    }

    /// Number of free resources of a type.
    pub fn free_count(&self, resource_type: &ResourceType) -> usize {
        self.resources
            .values()
            .filter(|r| r.is_free() && &r.resource_type == resource_type)
            .count()
    }

    /// Total number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// True when the fleet is empty.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Number of busy resources.
    pub fn busy_count(&self) -> usize {
        self.resources.values().filter(|r| !r.is_free()).count()
    }
}
