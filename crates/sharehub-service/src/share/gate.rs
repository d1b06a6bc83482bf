//! Access gate: decides whether a single access attempt against a share
//! link is permitted.
//!
//! Checks run from the most terminal reason to the least, so a caller
//! always learns the strongest reason first: expiry, then inactivity, then
//! the access budget, then the password. A link deactivated by using up
//! its budget reports the budget rather than plain inactivity.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use sharehub_auth::password::PasswordHasher;
use sharehub_core::error::{AppError, ErrorKind};
use sharehub_entity::share::{DeactivationReason, ShareLink};

/// Reason an access attempt was refused. Terminal for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDenied {
    /// No link exists for the token.
    #[error("Share link not found")]
    NotFound,
    /// The link's expiry time has passed.
    #[error("Share link has expired")]
    Expired,
    /// The link was deactivated.
    #[error("Share link is no longer active")]
    Inactive,
    /// Every permitted access was already granted.
    #[error("Share link has reached its access limit")]
    AccessLimitReached,
    /// The link is protected and no password was presented.
    #[error("Share link requires a password")]
    PasswordRequired,
    /// The presented password is wrong.
    #[error("Share link password is incorrect")]
    PasswordMismatch,
}

impl AccessDenied {
    /// The unified error kind a transport translates into a status.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Expired | Self::Inactive => ErrorKind::Gone,
            Self::AccessLimitReached => ErrorKind::Authorization,
            Self::PasswordRequired | Self::PasswordMismatch => ErrorKind::Authentication,
        }
    }
}

impl From<AccessDenied> for AppError {
    fn from(denied: AccessDenied) -> Self {
        AppError::new(denied.kind(), denied.to_string())
    }
}

/// Stateless evaluator for share link access attempts.
#[derive(Debug, Clone)]
pub struct AccessGate {
    /// Verifies presented passwords against stored hashes.
    hasher: Arc<PasswordHasher>,
}

impl AccessGate {
    /// Creates a new access gate.
    pub fn new(hasher: Arc<PasswordHasher>) -> Self {
        Self { hasher }
    }

    /// Evaluates an access attempt against `link` at `now`.
    ///
    /// Has no side effects on the link; committing a granted access is the
    /// caller's job.
    pub fn evaluate(
        &self,
        link: &ShareLink,
        now: DateTime<Utc>,
        presented_password: Option<&str>,
    ) -> Result<(), AccessDenied> {
        if link.is_expired_at(now) {
            return Err(AccessDenied::Expired);
        }

        if !link.active {
            return Err(match link.deactivation {
                Some(DeactivationReason::LimitReached) => AccessDenied::AccessLimitReached,
                _ => AccessDenied::Inactive,
            });
        }

        if link.is_exhausted() {
            return Err(AccessDenied::AccessLimitReached);
        }

        if let Some(hash) = link.password_hash.as_deref().filter(|h| !h.is_empty()) {
            let presented = presented_password.unwrap_or_default();
            if presented.is_empty() {
                return Err(AccessDenied::PasswordRequired);
            }
            if !self.password_matches(&link.token, presented, hash) {
                return Err(AccessDenied::PasswordMismatch);
            }
        }

        Ok(())
    }

    /// A hash that cannot be parsed never matches.
    fn password_matches(&self, token: &str, presented: &str, hash: &str) -> bool {
        match self.hasher.verify_password(presented, hash) {
            Ok(valid) => valid,
            Err(e) => {
                error!(token = %token, error = %e, "Stored share password hash is unusable");
                false
            }
        }
    }
}
