//! Share link registry: concurrency-safe store of share links keyed by
//! token, with atomic evaluate-and-commit access.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use sharehub_core::error::AppError;
use sharehub_core::result::AppResult;
use sharehub_core::types::id::{ResourceId, UserId};
use sharehub_entity::resource::ResourceHandle;
use sharehub_entity::share::{DeactivationReason, NewShareLink, ShareLink};

use super::gate::{AccessDenied, AccessGate};
use super::link::LinkService;

/// Outcome of a granted access.
#[derive(Debug, Clone, Serialize)]
pub struct AccessGrant {
    /// The token that was used.
    pub token: String,
    /// The resource to serve.
    pub resource: ResourceHandle,
    /// Access count after this access.
    pub access_count: u32,
    /// Accesses left, `None` when unlimited.
    pub remaining: Option<u32>,
    /// Whether this access used up the link.
    pub exhausted: bool,
}

/// Store of share links owning their lifecycle.
///
/// Every mutation of a link happens inside that link's own critical
/// section, so unrelated tokens never serialize against each other.
#[async_trait]
pub trait ShareLinkRegistry: Send + Sync + fmt::Debug + 'static {
    /// Stores a new active link under a freshly generated unique token.
    async fn create(&self, new: NewShareLink) -> AppResult<ShareLink>;

    async fn try_access(
        &self,
        token: &str,
        now: DateTime<Utc>,
        presented_password: Option<&str>,
    ) -> Result<AccessGrant, AccessDenied>;

    /// Deactivates a link. Revoking an inactive link is not an error.
    async fn revoke(&self, token: &str) -> Result<ShareLink, AccessDenied>;

    /// Deactivates every link pointing at a deleted resource.
    async fn invalidate_for_resource(&self, resource_id: ResourceId) -> usize;

    /// Marks expired links that are still flagged active as inactive.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> usize;

    /// Returns a copy of a link.
    async fn get(&self, token: &str) -> Option<ShareLink>;

    /// Lists links created by `user`, newest first.
    async fn list_by_creator(
        &self,
        user: UserId,
        include_inactive: bool,
        now: DateTime<Utc>,
    ) -> Vec<ShareLink>;

    /// Number of stored links, active or not.
    fn len(&self) -> usize;

    /// Whether the registry holds no links.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tokens of the links sharing one resource.
#[derive(Debug, Default)]
struct ResourceLinks {
    tokens: Vec<String>,
    /// Set once the resource is deleted; no link may be created for it after.
    deleted: bool,
}

/// Produces candidate tokens.
pub type TokenSource = Arc<dyn Fn() -> String + Send + Sync>;

/// In-memory [`ShareLinkRegistry`].
pub struct MemoryShareRegistry {
    /// Token → link, each behind its own lock.
    links: DashMap<String, Arc<Mutex<ShareLink>>>,
    /// Resource → tokens of links sharing it.
    by_resource: DashMap<ResourceId, ResourceLinks>,
    /// Access policy.
    gate: AccessGate,
    /// Token generator.
    tokens: TokenSource,
    /// Attempts before giving up on a unique token.
    max_token_attempts: u32,
}

impl fmt::Debug for MemoryShareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryShareRegistry")
            .field("links", &self.links.len())
            .field("max_token_attempts", &self.max_token_attempts)
            .finish()
    }
}

impl MemoryShareRegistry {
    /// Creates an empty registry drawing tokens from `link_service`.
    pub fn new(gate: AccessGate, link_service: Arc<LinkService>, max_token_attempts: u32) -> Self {
        let tokens: TokenSource = Arc::new(move || link_service.generate_token());
        Self::with_token_source(gate, tokens, max_token_attempts)
    }

    /// Creates an empty registry with a custom token source.
    pub fn with_token_source(
        gate: AccessGate,
        tokens: TokenSource,
        max_token_attempts: u32,
    ) -> Self {
        Self {
            links: DashMap::new(),
            by_resource: DashMap::new(),
            gate,
            tokens,
            max_token_attempts: max_token_attempts.max(1),
        }
    }

    /// Clones the slot for a token so no map guard is held across an await.
    fn slot(&self, token: &str) -> Option<Arc<Mutex<ShareLink>>> {
        self.links.get(token).map(|entry| Arc::clone(entry.value()))
    }

    fn all_slots(&self) -> Vec<Arc<Mutex<ShareLink>>> {
        self.links
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }
}

#[async_trait]
impl ShareLinkRegistry for MemoryShareRegistry {
    async fn create(&self, new: NewShareLink) -> AppResult<ShareLink> {
        let resource_id = new.resource.id;
        // Held until the token is indexed so a concurrent deletion either
        // sees the new token or is seen by this call.
        let mut index = self.by_resource.entry(resource_id).or_default();
        if index.deleted {
            debug!(resource_id = %resource_id, "Refusing share link for deleted resource");
            return Err(AppError::not_found("Resource not found"));
        }

        for attempt in 1..=self.max_token_attempts {
            let token = (self.tokens)();
            match self.links.entry(token.clone()) {
                Entry::Occupied(_) => {
                    warn!(attempt, "Share token collision, regenerating");
                }
                Entry::Vacant(slot) => {
                    let link = ShareLink::from_new(token.clone(), new, Utc::now());
                    slot.insert(Arc::new(Mutex::new(link.clone())));
                    index.tokens.push(token);

                    info!(
                        token = %link.token,
                        resource_id = %resource_id,
                        created_by = %link.created_by,
                        expires_at = %link.expires_at,
                        max_access = link.max_access,
                        protected = link.is_protected(),
                        "Share link created"
                    );
                    return Ok(link);
                }
            }
        }

        Err(AppError::internal(format!(
            "Could not generate a unique share token after {} attempts",
            self.max_token_attempts
        )))
    }

    async fn try_access(
        &self,
        token: &str,
        now: DateTime<Utc>,
        presented_password: Option<&str>,
    ) -> Result<AccessGrant, AccessDenied> {
        let slot = self.slot(token).ok_or(AccessDenied::NotFound)?;
        let mut link = slot.lock().await;

        match self.gate.evaluate(&link, now, presented_password) {
            Ok(()) => {
                let exhausted = link.record_access(now);
                info!(
                    token = %link.token,
                    access_count = link.access_count,
                    max_access = link.max_access,
                    exhausted,
                    "Share link access granted"
                );
                Ok(AccessGrant {
                    token: link.token.clone(),
                    resource: link.resource.clone(),
                    access_count: link.access_count,
                    remaining: link.remaining_accesses(),
                    exhausted,
                })
            }
            Err(AccessDenied::Expired) => {
                if link.deactivate(DeactivationReason::Expired) {
                    info!(token = %link.token, "Share link expired");
                }
                Err(AccessDenied::Expired)
            }
            Err(denied) => {
                debug!(token = %link.token, reason = %denied, "Share link access denied");
                Err(denied)
            }
        }
    }

    async fn revoke(&self, token: &str) -> Result<ShareLink, AccessDenied> {
        let slot = self.slot(token).ok_or(AccessDenied::NotFound)?;
        let mut link = slot.lock().await;
        if link.revoke() {
            info!(token = %link.token, "Share link revoked");
        }
        Ok(link.clone())
    }

    async fn invalidate_for_resource(&self, resource_id: ResourceId) -> usize {
        let tokens = {
            let mut index = self.by_resource.entry(resource_id).or_default();
            index.deleted = true;
            std::mem::take(&mut index.tokens)
        };

        let mut invalidated = 0;
        for token in &tokens {
            if let Some(slot) = self.slot(token) {
                if slot.lock().await.deactivate(DeactivationReason::ResourceDeleted) {
                    invalidated += 1;
                }
            }
        }

        if invalidated > 0 {
            info!(
                resource_id = %resource_id,
                count = invalidated,
                "Share links invalidated for deleted resource"
            );
        }
        invalidated
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut swept = 0;
        for slot in self.all_slots() {
            let mut link = slot.lock().await;
            if link.active
                && link.is_expired_at(now)
                && link.deactivate(DeactivationReason::Expired)
            {
                swept += 1;
            }
        }
        debug!(count = swept, "Expired share links swept");
        swept
    }

    async fn get(&self, token: &str) -> Option<ShareLink> {
        let slot = self.slot(token)?;
        let link = slot.lock().await;
        Some(link.clone())
    }

    async fn list_by_creator(
        &self,
        user: UserId,
        include_inactive: bool,
        now: DateTime<Utc>,
    ) -> Vec<ShareLink> {
        let mut links = Vec::new();
        for slot in self.all_slots() {
            let link = slot.lock().await;
            if link.created_by != user {
                continue;
            }
            if include_inactive || (link.active && !link.is_expired_at(now)) {
                links.push(link.clone());
            }
        }
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        links
    }

    fn len(&self) -> usize {
        self.links.len()
    }
}
