//! Share link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sharehub_core::types::id::UserId;

use crate::resource::ResourceHandle;

/// Why a share link stopped being usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeactivationReason {
    /// The expiry time passed.
    Expired,
    /// The last permitted access was granted.
    LimitReached,
    /// The owner revoked the link.
    Revoked,
    /// The shared resource was deleted.
    ResourceDeleted,
}

/// A time- and count-limited link granting access to one resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    /// Opaque token, primary key.
    pub token: String,
    /// The shared resource.
    pub resource: ResourceHandle,
    /// User who created the link.
    pub created_by: UserId,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// When the link stops granting access.
    pub expires_at: DateTime<Utc>,
    /// Argon2 hash of the access password, if one is required.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Maximum number of granted accesses; `0` means unlimited.
    pub max_access: u32,
    /// Number of granted accesses so far.
    pub access_count: u32,
    /// Whether the link may still grant access. Terminal once false.
    pub active: bool,
    /// Why the link was deactivated, if it was.
    pub deactivation: Option<DeactivationReason>,
    /// Last time access was granted.
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl ShareLink {
    /// Builds an active link from creation parameters.
    pub fn from_new(token: String, new: NewShareLink, now: DateTime<Utc>) -> Self {
        Self {
            token,
            resource: new.resource,
            created_by: new.created_by,
            created_at: now,
            expires_at: new.expires_at,
            password_hash: new.password_hash,
            max_access: new.max_access,
            access_count: 0,
            active: true,
            deactivation: None,
            last_accessed_at: None,
        }
    }

    /// Whether the link has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether a password must be presented.
    pub fn is_protected(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }

    /// Whether the link has a finite access budget.
    pub fn has_access_limit(&self) -> bool {
        self.max_access > 0
    }

    /// Whether the access budget is used up.
    pub fn is_exhausted(&self) -> bool {
        self.has_access_limit() && self.access_count >= self.max_access
    }

    /// Remaining accesses, or `None` when unlimited.
    pub fn remaining_accesses(&self) -> Option<u32> {
        self.has_access_limit()
            .then(|| self.max_access.saturating_sub(self.access_count))
    }

    /// Marks the link inactive. Returns `false` if it already was; the first
    /// recorded reason is kept.
    pub fn deactivate(&mut self, reason: DeactivationReason) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.deactivation = Some(reason);
        true
    }

    /// Revokes the link. An owner revocation overrides an earlier
    /// exhaustion so later attempts report the link as inactive. Returns
    /// whether the link was active before.
    pub fn revoke(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.deactivation = Some(DeactivationReason::Revoked);
        was_active
    }

    /// Commits one granted access. Deactivates the link when the access
    /// budget is used up and returns whether that happened.
    pub fn record_access(&mut self, now: DateTime<Utc>) -> bool {
        self.access_count = self.access_count.saturating_add(1);
        self.last_accessed_at = Some(now);
        if self.is_exhausted() {
            return self.deactivate(DeactivationReason::LimitReached);
        }
        false
    }
}

/// Data required to create a new share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShareLink {
    /// The resource being shared.
    pub resource: ResourceHandle,
    /// User creating the link.
    pub created_by: UserId,
    /// Expiry time (already defaulted by the caller).
    pub expires_at: DateTime<Utc>,
    /// Password hash, if protected.
    pub password_hash: Option<String>,
    /// Max accesses (`0` = unlimited).
    pub max_access: u32,
}
