//! Chat message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sharehub_core::types::id::{ResourceId, UserId};

/// What a chat message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Plain user text.
    Text,
    /// A notice generated by the system.
    System,
    /// A reference to an uploaded file.
    Attachment {
        /// The attached resource.
        resource_id: ResourceId,
    },
}

impl MessageKind {
    /// Whether this is a system notice.
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

/// One chat event. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Log-assigned, strictly increasing identifier.
    pub id: u64,
    /// Author, absent for system notices.
    pub author_id: Option<UserId>,
    /// Display name of the author.
    pub author_name: String,
    /// Message text.
    pub body: String,
    /// Message kind.
    pub kind: MessageKind,
    /// When the message was appended.
    pub created_at: DateTime<Utc>,
}
