//! Stored resource handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sharehub_core::types::id::ResourceId;

/// Identifies a stored, shareable file.
///
/// The content behind `content_key` is opaque to the core. A handle is
/// immutable once the resource is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHandle {
    /// Resource identifier.
    pub id: ResourceId,
    /// Display file name.
    pub name: String,
    /// Size of the stored content in bytes.
    pub size_bytes: u64,
    /// Stable storage key or path of the content.
    pub content_key: String,
    /// When the resource was stored.
    pub stored_at: DateTime<Utc>,
}

impl ResourceHandle {
    /// Creates a handle for freshly stored content.
    pub fn new(name: impl Into<String>, size_bytes: u64, content_key: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(),
            name: name.into(),
            size_bytes,
            content_key: content_key.into(),
            stored_at: Utc::now(),
        }
    }
}
