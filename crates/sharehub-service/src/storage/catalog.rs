//! In-memory resource catalog.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use sharehub_core::result::AppResult;
use sharehub_core::traits::ResourceCatalog;
use sharehub_core::types::id::ResourceId;
use sharehub_entity::resource::ResourceHandle;

/// Resource catalog backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryResourceCatalog {
    resources: DashMap<ResourceId, ResourceHandle>,
}

impl MemoryResourceCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stored resource and returns its handle.
    pub fn insert(&self, handle: ResourceHandle) -> ResourceHandle {
        debug!(resource_id = %handle.id, name = %handle.name, "Resource registered");
        self.resources.insert(handle.id, handle.clone());
        handle
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[async_trait]
impl ResourceCatalog<ResourceHandle> for MemoryResourceCatalog {
    async fn get(&self, id: ResourceId) -> AppResult<Option<ResourceHandle>> {
        Ok(self.resources.get(&id).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, id: ResourceId) -> AppResult<Option<ResourceHandle>> {
        Ok(self.resources.remove(&id).map(|(_, handle)| handle))
    }
}
