//! Storage collaborator seen from the core: a catalog of stored resources.
//!
//! The byte layout behind a resource is not the core's concern; the core
//! only needs to know whether a resource exists, what its handle looks
//! like, and when it goes away.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::ResourceId;

/// Lookup and deletion of stored resources.
///
/// `H` is the handle type returned for a resource. It is generic so that
/// `sharehub-core` stays free of entity types.
#[async_trait]
pub trait ResourceCatalog<H>: Send + Sync + std::fmt::Debug + 'static
where
    H: Send + Sync + 'static,
{
    /// Return the handle for a resource, if it is stored.
    async fn get(&self, id: ResourceId) -> AppResult<Option<H>>;

    /// Whether a resource is stored.
    async fn exists(&self, id: ResourceId) -> AppResult<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Delete a resource, returning its handle if it existed.
    async fn delete(&self, id: ResourceId) -> AppResult<Option<H>>;
}
