//! Share link service: the operations a transport wraps.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use sharehub_auth::password::PasswordHasher;
use sharehub_core::config::ShareConfig;
use sharehub_core::error::AppError;
use sharehub_core::traits::ResourceCatalog;
use sharehub_core::types::id::ResourceId;
use sharehub_entity::resource::ResourceHandle;
use sharehub_entity::share::{NewShareLink, ShareLinkView};

use super::gate::AccessDenied;
use super::registry::{AccessGrant, ShareLinkRegistry};
use crate::context::RequestContext;

/// Manages share link creation, access, listing, and revocation.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Link registry.
    registry: Arc<dyn ShareLinkRegistry>,
    /// Resource catalog.
    catalog: Arc<dyn ResourceCatalog<ResourceHandle>>,
    /// Password hasher for protected links.
    hasher: Arc<PasswordHasher>,
    /// Share settings.
    config: ShareConfig,
}

/// Request to create a new share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareRequest {
    /// Resource to share.
    pub resource_id: ResourceId,
    /// Lifetime in hours. `None` or `0` applies the default.
    #[serde(default)]
    pub ttl_hours: Option<u64>,
    /// Maximum accesses (`0` = unlimited).
    #[serde(default)]
    pub max_access: u32,
    /// Access password. Empty means no password.
    #[serde(default)]
    pub password: Option<String>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        registry: Arc<dyn ShareLinkRegistry>,
        catalog: Arc<dyn ResourceCatalog<ResourceHandle>>,
        hasher: Arc<PasswordHasher>,
        config: ShareConfig,
    ) -> Self {
        Self {
            registry,
            catalog,
            hasher,
            config,
        }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<dyn ShareLinkRegistry> {
        &self.registry
    }

    /// Creates a share link for a stored resource.
    pub async fn create_share_link(
        &self,
        ctx: &RequestContext,
        req: CreateShareRequest,
    ) -> Result<ShareLinkView, AppError> {
        let resource = self
            .catalog
            .get(req.resource_id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;

        let ttl_hours = match req.ttl_hours {
            Some(hours) if hours > 0 => hours.min(self.config.max_ttl_hours),
            _ => self.config.default_ttl_hours,
        };
        let expires_at = i64::try_from(ttl_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|ttl| ctx.request_time.checked_add_signed(ttl))
            .ok_or_else(|| AppError::validation("ttl_hours is out of range"))?;

        let password_hash = match req.password.as_deref() {
            Some(password) if !password.is_empty() => Some(self.hasher.hash_password(password)?),
            _ => None,
        };

        let link = self
            .registry
            .create(NewShareLink {
                resource,
                created_by: ctx.user_id,
                expires_at,
                password_hash,
                max_access: req.max_access,
            })
            .await?;

        Ok(ShareLinkView::from_link(&link, &self.config.public_base_url))
    }

    /// Attempts to access a shared resource by token.
    ///
    /// Refusals carry the full [`AccessDenied`] reason; `AppError::from`
    /// collapses it into a transport status when needed.
    pub async fn access_shared_resource(
        &self,
        token: &str,
        password: Option<&str>,
    ) -> Result<AccessGrant, AccessDenied> {
        self.registry.try_access(token, Utc::now(), password).await
    }

    /// Revokes a link. Only its creator may do so.
    pub async fn revoke_share_link(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<ShareLinkView, AppError> {
        let link = self
            .registry
            .get(token)
            .await
            .ok_or_else(|| AppError::not_found("Share link not found"))?;

        if link.created_by != ctx.user_id {
            return Err(AppError::authorization(
                "You can only revoke your own share links",
            ));
        }

        let link = self.registry.revoke(token).await?;
        info!(user_id = %ctx.user_id, token = %token, "Share link revoked by owner");

        Ok(ShareLinkView::from_link(&link, &self.config.public_base_url))
    }

    /// Lists the caller's share links, newest first.
    pub async fn list_share_links(
        &self,
        ctx: &RequestContext,
        include_inactive: bool,
    ) -> Vec<ShareLinkView> {
        self.registry
            .list_by_creator(ctx.user_id, include_inactive, Utc::now())
            .await
            .iter()
            .map(|link| ShareLinkView::from_link(link, &self.config.public_base_url))
            .collect()
    }

    /// Deletes a stored resource and invalidates every link to it.
    ///
    /// Returns the number of links that were invalidated.
    pub async fn delete_resource(
        &self,
        ctx: &RequestContext,
        resource_id: ResourceId,
    ) -> Result<usize, AppError> {
        self.catalog
            .delete(resource_id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;

        let invalidated = self.registry.invalidate_for_resource(resource_id).await;
        info!(
            user_id = %ctx.user_id,
            resource_id = %resource_id,
            invalidated,
            "Resource deleted"
        );
        Ok(invalidated)
    }

    /// Marks every expired but still active link inactive.
    pub async fn sweep_expired_links(&self) -> usize {
        self.registry.sweep_expired(Utc::now()).await
    }
}
