//! Share link response view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::ShareLink;

/// What a link owner sees about a share link. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLinkView {
    /// The share token.
    pub token: String,
    /// Name of the shared file.
    pub file_name: String,
    /// Full URL for accessing the share.
    pub share_url: String,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// When the link expires.
    pub expires_at: DateTime<Utc>,
    /// Granted accesses so far.
    pub access_count: u32,
    /// Access limit (`0` = unlimited).
    pub max_access: u32,
    /// Whether the link is password-protected.
    pub is_protected: bool,
    /// Whether the link can still grant access.
    pub active: bool,
}

impl ShareLinkView {
    /// Renders a link against the public base URL.
    pub fn from_link(link: &ShareLink, base_url: &str) -> Self {
        Self {
            token: link.token.clone(),
            file_name: link.resource.name.clone(),
            share_url: format!("{}/{}", base_url.trim_end_matches('/'), link.token),
            created_at: link.created_at,
            expires_at: link.expires_at,
            access_count: link.access_count,
            max_access: link.max_access,
            is_protected: link.is_protected(),
            active: link.active,
        }
    }
}
